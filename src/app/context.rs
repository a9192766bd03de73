//! 应用上下文
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthService, Clock, SystemClock};
use crate::config::AppConfig;
use crate::simulation::{ResponseSimulator, simulator_from_config};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthService>,
    pub simulator: Arc<dyn ResponseSimulator>,
}

impl AppContext {
    /// Wires services from configuration using the wall clock.
    pub fn new(config: Arc<AppConfig>, db: Arc<DatabaseConnection>) -> Self {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let auth = Arc::new(AuthService::from_database(Arc::clone(&db), clock, &config.auth));
        let simulator = simulator_from_config(&config.simulation);
        Self::from_parts(config, db, auth, simulator)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        simulator: Arc<dyn ResponseSimulator>,
    ) -> Self {
        Self {
            config,
            db,
            auth,
            simulator,
        }
    }
}
