//! # 承载凭证解析
//!
//! Extracts the presented credential from a request header. Deployments of the
//! provider disagree on whether the value carries a `Bearer ` scheme, so the
//! convention is configurable.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::CredentialFault;

const BEARER_SCHEME: &str = "bearer";

/// How the credential is laid out in the header value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BearerConvention {
    /// The whole value is the credential.
    Bare,
    /// `Bearer <credential>`, scheme matched case-insensitively.
    Prefixed,
    /// Strip a `Bearer` scheme when present, otherwise take the value as is.
    #[default]
    Either,
}

impl BearerConvention {
    /// Returns the credential inside `value`, `None` when the convention is not met.
    #[must_use]
    pub fn extract(self, value: &str) -> Option<&str> {
        let value = value.trim();
        let stripped = strip_scheme(value);

        let credential = match (self, stripped) {
            (Self::Bare, _) => value,
            (Self::Prefixed | Self::Either, Some(rest)) => rest,
            (Self::Prefixed, None) => return None,
            (Self::Either, None) => value,
        };

        (!credential.is_empty()).then_some(credential)
    }
}

fn strip_scheme(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    scheme
        .eq_ignore_ascii_case(BEARER_SCHEME)
        .then(|| rest.trim_start())
}

/// Reads the credential from `header_name`.
///
/// Absent or blank headers are [`CredentialFault::Missing`]; values that are not
/// UTF-8 or break the convention are [`CredentialFault::Malformed`].
pub fn credential_from_headers<'a>(
    headers: &'a HeaderMap,
    header_name: &str,
    convention: BearerConvention,
) -> Result<&'a str, CredentialFault> {
    let value = headers
        .get(header_name)
        .ok_or(CredentialFault::Missing)?
        .to_str()
        .map_err(|_| CredentialFault::Malformed)?;

    if value.trim().is_empty() {
        return Err(CredentialFault::Missing);
    }

    convention.extract(value).ok_or(CredentialFault::Malformed)
}
