//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod database;
mod manager;

pub use app_config::{
    AccessCredentialFormat, AppConfig, AuthConfig, GateConfig, GateMode, SeedConfig,
    ServerConfig, SimulationConfig, TokenStoreKind,
};
pub use database::DatabaseConfig;
pub use manager::ConfigManager;

use axum::http::{HeaderName, StatusCode};

use crate::ensure_config;

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    // 服务器
    ensure_config!(config.server.port != 0, "无效的服务器端口: 0");
    ensure_config!(!config.server.host.trim().is_empty(), "监听地址不能为空");
    ensure_config!(
        config.server.api_prefix.is_empty()
            || (config.server.api_prefix.starts_with('/') && !config.server.api_prefix.ends_with('/')),
        "api_prefix 必须以 '/' 开头且不能以 '/' 结尾: {}",
        config.server.api_prefix
    );

    // 数据库
    ensure_config!(!config.database.url.is_empty(), "数据库URL不能为空");
    ensure_config!(config.database.max_connections > 0, "数据库最大连接数必须大于0");

    // 认证
    let auth = &config.auth;
    ensure_config!(
        HeaderName::from_bytes(auth.header_name.as_bytes()).is_ok(),
        "无效的凭证请求头名称: {}",
        auth.header_name
    );
    let needs_signing =
        auth.access_credential == AccessCredentialFormat::Signed || auth.gate.mode == GateMode::Signature;
    ensure_config!(
        !needs_signing || !auth.signing_secret.is_empty(),
        "签名访问凭证需要配置 auth.signing_secret"
    );
    ensure_config!(
        auth.gate.mode != GateMode::Signature || auth.access_credential == AccessCredentialFormat::Signed,
        "auth.gate.mode = \"signature\" 需要 auth.access_credential = \"signed\""
    );
    ensure_config!(!auth.gate.unauthorized_code.is_empty(), "auth.gate.unauthorized_code 不能为空");

    // 模拟
    let simulation = &config.simulation;
    ensure_config!(
        simulation.currency.len() == 3 && simulation.currency.chars().all(|c| c.is_ascii_uppercase()),
        "无效的币种代码: {}",
        simulation.currency
    );
    ensure_config!(
        StatusCode::from_u16(simulation.unsupported_currency_status)
            .is_ok_and(|status| status.is_client_error() || status.is_server_error()),
        "unsupported_currency_status 必须是 4xx 或 5xx: {}",
        simulation.unsupported_currency_status
    );

    Ok(())
}
