//! # 用户实体定义
//!
//! A provisioned subject. Rows are written by the seeding step only and are
//! read-only from the authorization flow's point of view.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Canonical hyphenated UUID text.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Ten digit telephone number used to resolve `login_hint`.
    #[sea_orm(unique)]
    pub tel: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::auth_tokens::Entity")]
    AuthTokens,
}

impl Related<super::auth_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
