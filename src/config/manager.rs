//! # 配置管理器
//!
//! 配置文件加载与 `MOMO_` 环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{AccessCredentialFormat, AppConfig, GateMode, TokenStoreKind};
use crate::auth::BearerConvention;
use crate::error::{Result, SandboxError};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "MOMO_SANDBOX_CONFIG_PATH";
/// 覆盖配置项的环境变量前缀
pub const ENV_PREFIX: &str = "MOMO_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<AppConfig>,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 从 `MOMO_SANDBOX_CONFIG_PATH` 或 `config/config.{RUST_ENV}.toml` 加载
    ///
    /// 默认路径下没有文件时使用内置默认配置。
    pub fn new() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let config_file = PathBuf::from(format!("config/config.{env}.toml"));
        if config_file.exists() {
            Self::from_file(config_file)
        } else {
            info!("配置文件不存在: {}，使用默认配置", config_file.display());
            Self::from_config(AppConfig::default(), None)
        }
    }

    /// 从指定文件创建配置管理器，文件必须存在
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = Self::load_config_file(config_path)?;
        Self::from_config(config, Some(config_path.to_path_buf()))
    }

    fn from_config(mut config: AppConfig, source: Option<PathBuf>) -> Result<Self> {
        let env_overrides = Self::build_env_overrides();
        Self::apply_env_overrides(&mut config, &env_overrides)?;
        super::validate_config(&config)?;

        info!(
            "配置加载完成 - 来源: {}, 环境变量覆盖: {} 个",
            source
                .as_ref()
                .map_or_else(|| "默认配置".to_string(), |p| p.display().to_string()),
            env_overrides.len()
        );

        Ok(Self {
            config: Arc::new(config),
            source,
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// 配置文件路径，使用默认配置时为 `None`
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(SandboxError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            SandboxError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&config_content).map_err(|e| {
            SandboxError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}, 详细错误: {e}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    fn build_env_overrides() -> HashMap<String, String> {
        let mut overrides = HashMap::new();

        for (key, value) in env::vars() {
            if key == CONFIG_PATH_ENV {
                continue;
            }
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                // 例如: MOMO_SERVER_PORT -> server.port
                let config_path = config_key.to_lowercase().replace('_', ".");
                overrides.insert(config_path, value);
            }
        }

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!(
                "应用环境变量覆盖: {} = {}",
                path,
                if path.contains("secret") { "***" } else { value }
            );
            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将单个覆盖项应用到配置对象
    pub(crate) fn apply_override_to_config(
        config: &mut AppConfig,
        path: &str,
        value: &str,
    ) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_value(path, value)?,
            ["server", "api", "prefix"] | ["server", "apiprefix"] => {
                config.server.api_prefix = value.to_string();
            }
            ["server", "enable", "cors"] | ["server", "enablecors"] => {
                config.server.enable_cors = parse_value(path, value)?;
            }
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] | ["database", "maxconnections"] => {
                config.database.max_connections = parse_value(path, value)?;
            }
            ["auth", "token", "store"] | ["auth", "tokenstore"] => {
                config.auth.token_store = match value.to_lowercase().as_str() {
                    "database" => TokenStoreKind::Database,
                    "memory" => TokenStoreKind::Memory,
                    _ => return Err(invalid_value(path, value)),
                };
            }
            ["auth", "access", "credential"] | ["auth", "accesscredential"] => {
                config.auth.access_credential = match value.to_lowercase().as_str() {
                    "opaque" => AccessCredentialFormat::Opaque,
                    "signed" => AccessCredentialFormat::Signed,
                    _ => return Err(invalid_value(path, value)),
                };
            }
            ["auth", "signing", "secret"] | ["auth", "signingsecret"] => {
                config.auth.signing_secret = value.to_string();
            }
            ["auth", "issuer"] => config.auth.issuer = value.to_string(),
            ["auth", "bearer", "convention"] | ["auth", "bearerconvention"] => {
                config.auth.bearer_convention = match value.to_lowercase().as_str() {
                    "bare" => BearerConvention::Bare,
                    "prefixed" => BearerConvention::Prefixed,
                    "either" => BearerConvention::Either,
                    _ => return Err(invalid_value(path, value)),
                };
            }
            ["auth", "header", "name"] | ["auth", "headername"] => {
                config.auth.header_name = value.to_string();
            }
            ["auth", "gate", "enabled"] => config.auth.gate.enabled = parse_value(path, value)?,
            ["auth", "gate", "mode"] => {
                config.auth.gate.mode = match value.to_lowercase().as_str() {
                    "store" => GateMode::Store,
                    "signature" => GateMode::Signature,
                    _ => return Err(invalid_value(path, value)),
                };
            }
            ["simulation", "test", "mode"] | ["simulation", "testmode"] => {
                config.simulation.test_mode = parse_value(path, value)?;
            }
            ["simulation", "currency"] => config.simulation.currency = value.to_uppercase(),
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        SandboxError::config_with_source(format!("无效的配置值 {path}: {value}"), e)
    })
}

fn invalid_value(path: &str, value: &str) -> SandboxError {
    SandboxError::config(format!("无效的配置值 {path}: {value}"))
}
