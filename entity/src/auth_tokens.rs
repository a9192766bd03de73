//! # 授权令牌实体定义
//!
//! One row per issued backchannel authorization grant. Rows are never updated or
//! deleted; expiry is evaluated by readers against `expires_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 授权令牌实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_tokens")]
pub struct Model {
    /// Canonical hyphenated UUID text, presented verbatim as the bearer value.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    /// Polling interval hint in seconds.
    pub interval: i32,
    /// Creation instant, UTC milliseconds since the epoch.
    pub created_at: i64,
    /// Absolute expiry, UTC milliseconds since the epoch.
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
