//! Errors of the authorization token lifecycle (issue, validate, exchange).

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// Why a presented credential was rejected.
///
/// Carried by [`AuthError::Unauthorized`] so the gate and the exchanger keep the
/// original failure kind visible to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialFault {
    /// Nothing was presented in the credential slot.
    Missing,
    /// The value is not a token identifier.
    Malformed,
    /// Well-formed identifier with no stored token.
    NotFound,
    /// The token exists but its expiry has passed.
    Expired,
    /// A signed access credential failed verification.
    BadSignature,
}

impl CredentialFault {
    /// Machine readable code returned to callers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing => "MISSING_CREDENTIAL",
            Self::Malformed => "MALFORMED_CREDENTIAL",
            Self::NotFound => "CREDENTIAL_NOT_FOUND",
            Self::Expired => "CREDENTIAL_EXPIRED",
            Self::BadSignature => "INVALID_CREDENTIAL_SIGNATURE",
        }
    }

    /// Human readable message returned to callers.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "Authorization credential is missing.",
            Self::Malformed => "Authorization credential is malformed.",
            Self::NotFound => "Authorization credential was not found.",
            Self::Expired => "Authorization credential has expired.",
            Self::BadSignature => "Access credential signature is invalid.",
        }
    }
}

impl fmt::Display for CredentialFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Missing => "missing credential",
            Self::Malformed => "malformed credential",
            Self::NotFound => "credential not found",
            Self::Expired => "credential expired",
            Self::BadSignature => "bad signature",
        };
        f.write_str(label)
    }
}

/// The error type of every token lifecycle operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No subject matches contact '{0}'")]
    SubjectNotFound(String),

    #[error("Credential is not a well-formed token identifier")]
    MalformedCredential,

    #[error("No authorization token with id {0}")]
    CredentialNotFound(String),

    #[error("Authorization token {id} expired at {expired_at_ms}")]
    CredentialExpired { id: String, expired_at_ms: i64 },

    #[error("Unauthorized: {cause}")]
    Unauthorized { cause: CredentialFault },

    #[error("Token store failure: {0}")]
    Store(#[from] sea_orm::DbErr),

    #[error("Failed to sign access credential: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// The credential fault behind a validator failure, if this is one.
    #[must_use]
    pub const fn fault(&self) -> Option<CredentialFault> {
        match self {
            Self::MalformedCredential => Some(CredentialFault::Malformed),
            Self::CredentialNotFound(_) => Some(CredentialFault::NotFound),
            Self::CredentialExpired { .. } => Some(CredentialFault::Expired),
            Self::Unauthorized { cause } => Some(*cause),
            _ => None,
        }
    }

    /// Folds validator failures into [`AuthError::Unauthorized`], keeping the kind.
    /// Infrastructure failures pass through unchanged.
    #[must_use]
    pub fn into_unauthorized(self) -> Self {
        match self.fault() {
            Some(cause) => Self::Unauthorized { cause },
            None => self,
        }
    }

    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub const fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::SubjectNotFound(_) => (StatusCode::NOT_FOUND, "PAYEE_NOT_FOUND"),
            Self::MalformedCredential => {
                (StatusCode::UNAUTHORIZED, CredentialFault::Malformed.code())
            }
            Self::CredentialNotFound(_) => {
                (StatusCode::UNAUTHORIZED, CredentialFault::NotFound.code())
            }
            Self::CredentialExpired { .. } => {
                (StatusCode::UNAUTHORIZED, CredentialFault::Expired.code())
            }
            Self::Unauthorized { cause } => (StatusCode::UNAUTHORIZED, cause.code()),
            Self::Store(_) | Self::Signing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_PROCESSING_ERROR")
            }
        }
    }

    /// Message safe to show to API callers.
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::SubjectNotFound(_) => "User not found.",
            Self::Store(_) | Self::Signing(_) => "An internal error occurred while processing.",
            other => other
                .fault()
                .map_or("Unauthorized.", CredentialFault::message),
        }
    }
}
