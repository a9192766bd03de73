//! # HTTP 服务器
//!
//! 基于 Axum 的产品 API 服务器实现

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{CALLBACK_URL_HEADER, REFERENCE_ID_HEADER, TARGET_ENVIRONMENT_HEADER, system};
use super::middleware::request_id_middleware;
use super::routes::create_routes;
use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{Context, Result, SandboxError};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 产品 API 服务器
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    /// 创建新的服务器
    pub fn new(context: Arc<AppContext>) -> Self {
        let config = context.config.server.clone();
        let router = Self::create_router(AppState::new(context));
        Self { config, router }
    }

    /// 创建路由
    ///
    /// Product routes are nested under `server.api_prefix`; `/ping` and `/`
    /// always stay at the root.
    pub fn create_router(state: AppState) -> Router {
        let config = state.config.server.clone();
        let api_routes = create_routes(state.clone());

        let mut app = Router::new()
            .route("/ping", get(system::ping))
            .route("/", get(system::root))
            .with_state(state);

        app = if config.api_prefix.is_empty() {
            app.merge(api_routes)
        } else {
            app.nest(&config.api_prefix, api_routes)
        };

        let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

        if config.enable_cors {
            let cors_layer = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::HeaderName::from_static(REFERENCE_ID_HEADER),
                    header::HeaderName::from_static(TARGET_ENVIRONMENT_HEADER),
                    header::HeaderName::from_static(CALLBACK_URL_HEADER),
                ]);
            app = app.layer(service_builder.layer(cors_layer));
        } else {
            app = app.layer(service_builder);
        }

        // 最外层：保证认证门和处理器都能拿到请求ID
        app.layer(axum::middleware::from_fn(request_id_middleware))
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let bind_address = self.config.bind_address();
        bind_address
            .parse::<SocketAddr>()
            .map_err(|e| SandboxError::config(format!("Invalid bind address '{bind_address}': {e}")))
    }

    /// 启动服务器
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("Starting momo sandbox on {addr}"),
            api_prefix = %self.config.api_prefix
        );

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| SandboxError::server_start_with_source("HTTP server terminated", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "HTTP server stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "shutdown_signal",
            "Received Ctrl+C, shutting down"
        );
    }
}
