//! # Momo Sandbox 主程序
//!
//! 模拟移动支付服务商 API 的 HTTP 服务

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use momo_sandbox::{
    ApiServer, AppConfig, AppContext, Result,
    config::{ConfigManager, validate_config},
    database::{ensure_seed_subjects, init_database, run_migrations},
    error::Context,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "momo-sandbox")]
#[command(about = "Mock mobile-money provider API with a backchannel token flow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// 配置文件路径，优先于 MOMO_SANDBOX_CONFIG_PATH
    #[arg(short, long, env = "MOMO_SANDBOX_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// 覆盖 server.port
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    logging::init_logging(Some(&args.log_level));

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            lerror!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "config_load_failed",
                &format!("配置加载失败: {e}")
            );
            return Err(e);
        }
    };

    // 执行数据初始化（数据库迁移与种子数据）
    let db = run_data_initialization(&config).await?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::ServerSetup,
        "service_starting",
        "服务启动",
        gate_enabled = config.auth.gate.enabled,
        test_mode = config.simulation.test_mode
    );

    let context = Arc::new(AppContext::new(config, Arc::new(db)));
    if let Err(e) = ApiServer::new(context).serve().await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "service_start_failed",
            &format!("服务启动失败: {e:?}")
        );
        std::process::exit(1);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::ServerSetup,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

/// 加载配置并应用命令行覆盖
fn load_config(args: &Args) -> Result<Arc<AppConfig>> {
    let manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };

    let Some(port) = args.port else {
        return Ok(manager.get_config());
    };

    let mut config = (*manager.get_config()).clone();
    config.server.port = port;
    validate_config(&config)?;
    Ok(Arc::new(config))
}

/// 连接数据库、执行迁移并写入种子联系人
async fn run_data_initialization(config: &AppConfig) -> Result<sea_orm::DatabaseConnection> {
    let db = init_database(&config.database).await?;
    run_migrations(&db).await.context("数据库迁移失败")?;

    let seeded = ensure_seed_subjects(&db, &config.seed.contacts).await?;
    linfo!(
        "system",
        LogStage::Db,
        LogComponent::Database,
        "data_init_complete",
        "数据初始化完成",
        seeded_subjects = seeded
    );
    Ok(db)
}
