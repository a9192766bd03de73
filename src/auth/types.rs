//! Token lifecycle data types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identity an authorization grant is issued on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    /// Telephone number used to resolve authorization requests.
    pub contact: String,
}

/// Derived lifecycle state of an [`AuthorizationToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Issued,
    Expired,
}

/// A pending backchannel authorization grant.
///
/// Never mutated after creation. Expiry is evaluated lazily against the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationToken {
    /// Also the bearer value the client presents.
    pub id: Uuid,
    pub subject_id: String,
    /// Polling interval hint in seconds.
    pub interval: i32,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

impl AuthorizationToken {
    /// A token is live up to and including its expiry instant.
    #[must_use]
    pub const fn state(&self, now_ms: i64) -> TokenState {
        if now_ms > self.expires_at_ms {
            TokenState::Expired
        } else {
            TokenState::Issued
        }
    }

    /// The caller-facing view returned by the issuer.
    #[must_use]
    pub fn grant(&self) -> AuthorizationGrant {
        AuthorizationGrant {
            auth_req_id: self.id.to_string(),
            interval: self.interval,
            expires_in: self.expires_at_ms,
        }
    }
}

/// Result of a successful authorization request.
///
/// `expires_in` carries the absolute expiry in epoch milliseconds, matching the
/// provider's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    pub auth_req_id: String,
    pub interval: i32,
    pub expires_in: i64,
}

/// A presented credential that resolved to a live token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCredential {
    pub token_id: Uuid,
    pub subject_id: String,
    pub expires_at_ms: i64,
}

/// Short-lived bearer credential handed out by the exchanger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
