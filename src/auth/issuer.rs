//! Token issuer: resolve a subject and persist a fresh authorization token.

use std::sync::Arc;

use uuid::Uuid;

use super::clock::Clock;
use super::store::{SubjectDirectory, TokenStore};
use super::types::{AuthorizationGrant, AuthorizationToken};
use crate::error::{AuthError, AuthResult};

/// Polling interval hint handed to clients, in seconds.
pub const POLL_INTERVAL_SECS: i32 = 5;

/// Lifetime of an authorization token: five minutes.
pub const AUTHORIZATION_TTL_MS: i64 = 300_000;

pub struct TokenIssuer {
    subjects: Arc<dyn SubjectDirectory>,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(
        subjects: Arc<dyn SubjectDirectory>,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subjects,
            store,
            clock,
        }
    }

    /// Issues a token for the subject owning `contact`, looked up as given.
    ///
    /// Multiple outstanding tokens per subject are allowed; each call appends
    /// one row and nothing else.
    pub async fn issue(&self, contact: &str) -> AuthResult<AuthorizationGrant> {
        if contact.trim().is_empty() {
            return Err(AuthError::SubjectNotFound(String::new()));
        }

        let subject = self
            .subjects
            .find_subject_by_contact(contact)
            .await?
            .ok_or_else(|| AuthError::SubjectNotFound(contact.to_string()))?;

        let now_ms = self.clock.now_utc_millis();
        let token = AuthorizationToken {
            id: Uuid::new_v4(),
            subject_id: subject.id,
            interval: POLL_INTERVAL_SECS,
            created_at_ms: now_ms,
            expires_at_ms: now_ms + AUTHORIZATION_TTL_MS,
        };
        self.store.insert(&token).await?;

        tracing::debug!(
            token_id = %token.id,
            subject_id = %token.subject_id,
            expires_at_ms = token.expires_at_ms,
            "issued authorization token"
        );

        Ok(token.grant())
    }
}
