//! # 认证服务
//!
//! The three token lifecycle operations exposed to the HTTP layer.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::clock::Clock;
use super::exchanger::{AccessClaims, AccessCredentialExchanger};
use super::issuer::TokenIssuer;
use super::store::{DbSubjectDirectory, DbTokenStore, MemoryTokenStore, SubjectDirectory, TokenStore};
use super::types::{AccessCredential, AuthorizationGrant, ValidatedCredential};
use super::validator::TokenValidator;
use crate::config::{AuthConfig, TokenStoreKind};
use crate::error::AuthResult;

pub struct AuthService {
    issuer: TokenIssuer,
    validator: Arc<TokenValidator>,
    exchanger: AccessCredentialExchanger,
}

impl AuthService {
    /// Wires the service over explicit collaborators.
    pub fn new(
        subjects: Arc<dyn SubjectDirectory>,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        let issuer = TokenIssuer::new(subjects, Arc::clone(&store), Arc::clone(&clock));
        let validator = Arc::new(TokenValidator::new(store, Arc::clone(&clock)));
        let exchanger =
            AccessCredentialExchanger::from_config(Arc::clone(&validator), clock, config);

        Self {
            issuer,
            validator,
            exchanger,
        }
    }

    /// Database-backed subjects, token store chosen by `auth.token_store`.
    pub fn from_database(
        db: Arc<DatabaseConnection>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        let subjects: Arc<dyn SubjectDirectory> = Arc::new(DbSubjectDirectory::new(Arc::clone(&db)));
        let store: Arc<dyn TokenStore> = match config.token_store {
            TokenStoreKind::Database => Arc::new(DbTokenStore::new(db)),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };

        Self::new(subjects, store, clock, config)
    }

    pub async fn issue_authorization(&self, contact_key: &str) -> AuthResult<AuthorizationGrant> {
        self.issuer.issue(contact_key).await
    }

    pub async fn validate_credential(&self, raw: &str) -> AuthResult<ValidatedCredential> {
        self.validator.validate(raw).await
    }

    pub async fn exchange_for_access_credential(&self, raw: &str) -> AuthResult<AccessCredential> {
        self.exchanger.exchange(raw).await
    }

    /// Mints an access credential without checking any grant.
    pub fn mint_access_credential(&self) -> AuthResult<AccessCredential> {
        self.exchanger.mint()
    }

    /// Signature-only check of a signed access credential.
    pub fn verify_access_credential(&self, raw: &str) -> AuthResult<AccessClaims> {
        self.exchanger.verify(raw)
    }
}
