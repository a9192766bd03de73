//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use crate::auth::BearerConvention;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 令牌与认证门配置
    pub auth: AuthConfig,
    /// 响应模拟配置
    pub simulation: SimulationConfig,
    /// 种子数据
    pub seed: SeedConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 产品接口前缀
    pub api_prefix: String,
    /// 是否启用 CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: "/api".to_string(),
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// 监听地址字符串
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 授权令牌存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// `auth_tokens` 表
    #[default]
    Database,
    /// 进程内存
    Memory,
}

/// 访问凭证格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessCredentialFormat {
    /// 32 位十六进制随机值
    #[default]
    Opaque,
    /// HS256 JWT
    Signed,
}

/// 认证门校验方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// 查询令牌存储
    #[default]
    Store,
    /// 只校验签名访问凭证
    Signature,
}

/// 认证门配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub enabled: bool,
    pub mode: GateMode,
    /// 拒绝时返回的错误码
    pub unauthorized_code: String,
    /// 拒绝时返回的错误信息
    pub unauthorized_message: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: GateMode::Store,
            unauthorized_code: "PAYEE_NOT_FOUND".to_string(),
            unauthorized_message: "Invalid or expired token".to_string(),
        }
    }
}

/// 令牌与认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_store: TokenStoreKind,
    pub access_credential: AccessCredentialFormat,
    /// 签名访问凭证的 HMAC 密钥
    pub signing_secret: String,
    /// 签名访问凭证的 `iss`
    pub issuer: String,
    pub bearer_convention: BearerConvention,
    /// 承载凭证所在的请求头
    pub header_name: String,
    pub gate: GateConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_store: TokenStoreKind::Database,
            access_credential: AccessCredentialFormat::Opaque,
            signing_secret: "momo-sandbox-dev-secret".to_string(),
            issuer: "momo-sandbox".to_string(),
            bearer_convention: BearerConvention::Either,
            header_name: "Authorization".to_string(),
            gate: GateConfig::default(),
        }
    }
}

/// 响应模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 启用哨兵值触发的错误模拟
    pub test_mode: bool,
    /// 唯一支持的币种
    pub currency: String,
    /// `INVALID_CURRENCY` 的 HTTP 状态码
    pub unsupported_currency_status: u16,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            test_mode: true,
            currency: "GHS".to_string(),
            unsupported_currency_status: 500,
        }
    }
}

/// 启动时写入 `users` 表的联系人
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub contacts: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let contacts = [
            "0123456789",
            "0241234567",
            "0559876543",
            "0274567890",
            "0591239876",
            "0267891234",
            "0506543210",
            "0573216547",
            "0298765432",
            "0547894561",
            "0209871234",
        ];
        Self {
            contacts: contacts.iter().map(ToString::to_string).collect(),
        }
    }
}
