//! # 数据库模块
//!
//! 数据库连接、迁移和种子数据管理

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::Utc;
use entity::{Users, users};
use regex::Regex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{Result, SandboxError};

static CONTACT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid contact pattern"));

/// 联系人是否为 10 位数字电话号码
#[must_use]
pub fn is_valid_contact(contact: &str) -> bool {
    CONTACT_PATTERN.is_match(contact)
}

/// 初始化数据库连接
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!(
        "正在连接数据库: {}",
        config.url.chars().take(50).collect::<String>()
    );

    config.ensure_database_path()?;

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);
    if config.is_in_memory() {
        // 内存库随最后一个连接消失
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(config.max_connections);
    }

    let db = Database::connect(options)
        .await
        .map_err(|e| SandboxError::database_with_source("数据库连接失败", e))?;

    info!("数据库连接成功");
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    info!("开始运行数据库迁移...");

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            info!("数据库迁移完成");
            Ok(())
        }
        Err(e) => {
            error!("数据库迁移失败: {}", e);
            Err(e)
        }
    }
}

/// 确保 `users` 表有种子联系人
///
/// 仅在表为空时写入；无效或重复的号码会被跳过。返回写入条数。
pub async fn ensure_seed_subjects(db: &DatabaseConnection, contacts: &[String]) -> Result<usize> {
    let existing = Users::find()
        .count(db)
        .await
        .map_err(|e| SandboxError::database_with_source("查询用户数量失败", e))?;

    if existing > 0 {
        debug!("用户数据已存在 ({} 条记录)，跳过种子数据", existing);
        return Ok(0);
    }

    let mut seen = HashSet::new();
    let mut models = Vec::with_capacity(contacts.len());
    for contact in contacts {
        let contact = contact.trim();
        if !is_valid_contact(contact) {
            warn!("跳过无效的种子联系人: {}", contact);
            continue;
        }
        if !seen.insert(contact.to_string()) {
            continue;
        }
        models.push(users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            tel: Set(contact.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        });
    }

    if models.is_empty() {
        warn!("没有可写入的种子联系人");
        return Ok(0);
    }

    let inserted = models.len();
    Users::insert_many(models)
        .exec_without_returning(db)
        .await
        .map_err(|e| SandboxError::database_with_source("写入种子用户失败", e))?;

    info!("✅ 种子用户写入完成 ({} 条记录)", inserted);
    Ok(inserted)
}
