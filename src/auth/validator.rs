//! Token validator: resolve a presented credential to a live token.

use std::sync::Arc;

use uuid::Uuid;

use super::clock::Clock;
use super::store::TokenStore;
use super::types::{TokenState, ValidatedCredential};
use crate::error::{AuthError, AuthResult};

/// Parses a presented credential into a token identifier.
///
/// Accepts every textual UUID form (hyphenated, simple, braced, URN) after
/// trimming surrounding whitespace.
pub fn parse_credential(raw: &str) -> AuthResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AuthError::MalformedCredential)
}

pub struct TokenValidator {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Read-only: the token stays valid for further calls until it expires.
    pub async fn validate(&self, raw: &str) -> AuthResult<ValidatedCredential> {
        let id = parse_credential(raw)?;

        let token = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AuthError::CredentialNotFound(id.to_string()))?;

        match token.state(self.clock.now_utc_millis()) {
            TokenState::Expired => Err(AuthError::CredentialExpired {
                id: id.to_string(),
                expired_at_ms: token.expires_at_ms,
            }),
            TokenState::Issued => Ok(ValidatedCredential {
                token_id: token.id,
                subject_id: token.subject_id,
                expires_at_ms: token.expires_at_ms,
            }),
        }
    }
}
