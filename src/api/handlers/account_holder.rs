//! # 账户持有人状态处理器

use std::sync::LazyLock;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use regex::Regex;

use super::{TARGET_ENVIRONMENT_HEADER, header_str};
use crate::api::response::{ApiError, ApiResult};
use crate::api::server::AppState;

/// ITU-T E.164: `+` followed by 1 to 15 digits
static MSISDN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{1,15}$").expect("Invalid MSISDN pattern"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email pattern"));

/// Longest accepted free-form identifier.
pub const MAX_FREE_FORM_ID_LEN: usize = 100;

/// Identifier kinds of an account holder, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountHolderIdType {
    Msisdn,
    Email,
    Alias,
    Id,
    PartyCode,
}

impl AccountHolderIdType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        const KINDS: [(&str, AccountHolderIdType); 5] = [
            ("msisdn", AccountHolderIdType::Msisdn),
            ("email", AccountHolderIdType::Email),
            ("alias", AccountHolderIdType::Alias),
            ("id", AccountHolderIdType::Id),
            ("party_code", AccountHolderIdType::PartyCode),
        ];

        let value = value.trim();
        KINDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Msisdn => "msisdn",
            Self::Email => "email",
            Self::Alias => "alias",
            Self::Id => "id",
            Self::PartyCode => "party_code",
        }
    }

    /// Checks `id` against the format of this kind.
    pub fn check(self, id: &str) -> ApiResult<()> {
        match self {
            Self::Msisdn if !MSISDN_PATTERN.is_match(id) => Err(ApiError::bad_request(
                "INVALID_MSISDN",
                "accountHolderId must be a valid MSISDN (e.g., +1234567890).",
            )),
            Self::Email if !EMAIL_PATTERN.is_match(id) => Err(ApiError::bad_request(
                "INVALID_EMAIL",
                "accountHolderId must be a valid email address.",
            )),
            Self::Alias | Self::Id | Self::PartyCode if id.chars().count() > MAX_FREE_FORM_ID_LEN => {
                Err(ApiError::bad_request(
                    "INVALID_ACCOUNT_HOLDER_ID",
                    format!("accountHolderId is too long for type '{}'.", self.as_str()),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// GET /{product}/v1_0/accountholder/{id_type}/{id}/active
pub async fn validate_account_holder_status(
    State(state): State<AppState>,
    Path((id_type, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<bool>> {
    let kind = AccountHolderIdType::parse(&id_type).ok_or_else(|| {
        ApiError::bad_request(
            "INVALID_ACCOUNT_HOLDER_ID_TYPE",
            "accountHolderIdType must be one of 'msisdn', 'email', 'alias', 'id' or 'party_code'.",
        )
    })?;

    if id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "INVALID_ACCOUNT_HOLDER_ID",
            "accountHolderId is required and must not be empty.",
        ));
    }
    kind.check(&id)?;

    state
        .simulator
        .on_account_holder(header_str(&headers, TARGET_ENVIRONMENT_HEADER), &id)
        .map(Json)
        .map_err(ApiError::from)
}
