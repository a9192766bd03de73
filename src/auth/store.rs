//! Subject directory and token store collaborators.
//!
//! The database implementations read `users` and read/append `auth_tokens`.
//! Neither performs a read-modify-write, so no transaction is needed.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use entity::{AuthTokens, Users, auth_tokens, users};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::types::{AuthorizationToken, Subject};
use crate::error::AuthResult;

/// Resolves contact keys to provisioned subjects.
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    async fn find_subject_by_contact(&self, contact: &str) -> AuthResult<Option<Subject>>;
}

/// Persistent mapping from token identifier to token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert(&self, token: &AuthorizationToken) -> AuthResult<()>;

    async fn find_by_id(&self, id: &Uuid) -> AuthResult<Option<AuthorizationToken>>;
}

/// `users` table lookup.
#[derive(Debug, Clone)]
pub struct DbSubjectDirectory {
    db: Arc<DatabaseConnection>,
}

impl DbSubjectDirectory {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubjectDirectory for DbSubjectDirectory {
    async fn find_subject_by_contact(&self, contact: &str) -> AuthResult<Option<Subject>> {
        let user = Users::find()
            .filter(users::Column::Tel.eq(contact))
            .one(self.db.as_ref())
            .await?;

        Ok(user.map(|user| Subject {
            id: user.id,
            contact: user.tel,
        }))
    }
}

/// `auth_tokens` table store.
#[derive(Debug, Clone)]
pub struct DbTokenStore {
    db: Arc<DatabaseConnection>,
}

impl DbTokenStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for DbTokenStore {
    async fn insert(&self, token: &AuthorizationToken) -> AuthResult<()> {
        let model = auth_tokens::ActiveModel {
            id: Set(token.id.to_string()),
            user_id: Set(token.subject_id.clone()),
            interval: Set(token.interval),
            created_at: Set(token.created_at_ms),
            expires_at: Set(token.expires_at_ms),
        };

        AuthTokens::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> AuthResult<Option<AuthorizationToken>> {
        let Some(model) = AuthTokens::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(token_from_model(model)?))
    }
}

fn token_from_model(model: auth_tokens::Model) -> Result<AuthorizationToken, DbErr> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|e| DbErr::Custom(format!("auth_tokens.id is not a UUID: {} ({e})", model.id)))?;

    Ok(AuthorizationToken {
        id,
        subject_id: model.user_id,
        interval: model.interval,
        created_at_ms: model.created_at,
        expires_at_ms: model.expires_at,
    })
}

/// Process-local token store. Tokens vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<Uuid, AuthorizationToken>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, token: &AuthorizationToken) -> AuthResult<()> {
        self.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> AuthResult<Option<AuthorizationToken>> {
        Ok(self.tokens.get(id).map(|entry| entry.value().clone()))
    }
}
