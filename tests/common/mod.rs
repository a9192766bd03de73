//! 集成测试公共设施：内存数据库与路由构建

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use momo_sandbox::{
    ApiServer, AppConfig, AppContext, AppState,
    auth::ManualClock,
    config::DatabaseConfig,
    database::{ensure_seed_subjects, init_database, run_migrations},
};
use sea_orm::DatabaseConnection;

/// 测试时钟起点
pub const START_MS: i64 = 1_746_000_000_000;

/// 种子数据中的联系人
pub const SEEDED_CONTACT: &str = "0241234567";

/// 已迁移并写入默认种子联系人的内存数据库
pub async fn seeded_db() -> Arc<DatabaseConnection> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    let db = init_database(&config).await.expect("connect test db");
    run_migrations(&db).await.expect("run migrations");
    ensure_seed_subjects(&db, &AppConfig::default().seed.contacts)
        .await
        .expect("seed subjects");
    Arc::new(db)
}

/// 按给定配置构建完整路由（含中间件），时钟由测试控制
pub async fn test_app(config: AppConfig) -> (Router, Arc<ManualClock>) {
    let db = seeded_db().await;
    let clock = Arc::new(ManualClock::new(START_MS));
    let context = AppContext::with_clock(Arc::new(config), db, clock.clone());
    let router = ApiServer::create_router(AppState::new(Arc::new(context)));
    (router, clock)
}
