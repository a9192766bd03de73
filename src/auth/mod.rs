//! # 认证授权模块
//!
//! Backchannel authorization token lifecycle: a subject is resolved from a
//! contact key and issued a short-lived [`AuthorizationToken`], the token
//! identifier is presented as a bearer credential, validated against the token
//! store, and exchanged for an [`AccessCredential`].
//!
//! [`AuthService`] is the entry point used by the HTTP layer; the collaborators
//! (clock, subject directory, token store) are trait objects so tests can
//! swap them.

pub mod clock;
pub mod exchanger;
pub mod header;
pub mod issuer;
pub mod service;
pub mod store;
pub mod types;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use exchanger::{ACCESS_CREDENTIAL_TTL_SECS, AccessClaims, AccessCredentialExchanger, TOKEN_TYPE};
pub use header::{BearerConvention, credential_from_headers};
pub use issuer::{AUTHORIZATION_TTL_MS, POLL_INTERVAL_SECS, TokenIssuer};
pub use service::AuthService;
pub use store::{
    DbSubjectDirectory, DbTokenStore, MemoryTokenStore, SubjectDirectory, TokenStore,
};
pub use types::{
    AccessCredential, AuthorizationGrant, AuthorizationToken, Subject, TokenState,
    ValidatedCredential,
};
pub use validator::TokenValidator;
