//! # 系统信息处理器

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::api::server::AppState;
use crate::simulation::Product;

#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub service: &'static str,
    pub version: &'static str,
    pub api_prefix: String,
    pub products: Vec<&'static str>,
    pub test_mode: bool,
    pub gate_enabled: bool,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<ServiceBanner> {
    Json(ServiceBanner {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api_prefix: state.config.server.api_prefix.clone(),
        products: Product::ALL.iter().map(|p| p.as_str()).collect(),
        test_mode: state.config.simulation.test_mode,
        gate_enabled: state.config.auth.gate.enabled,
    })
}

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}
