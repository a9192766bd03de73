//! # 授权处理器
//!
//! Backchannel authorization (`bc-authorize`), exchange of the resulting
//! `auth_req_id` for an access credential (`token`) and the canned
//! `oauth2/token` endpoint.

use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TARGET_ENVIRONMENT_HEADER, header_str, non_blank};
use crate::api::middleware::RequestId;
use crate::api::response::{ApiError, ApiResult};
use crate::api::server::AppState;
use crate::auth::{AccessCredential, AuthorizationGrant, credential_from_headers};
use crate::error::AuthError;
use crate::logging::{LogComponent, LogStage};
use crate::simulation::Product;
use crate::{linfo, lwarn};

/// Lifetime of the refresh token advertised by `oauth2/token`.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 86_400;

const ACCESS_TYPES: [&str; 2] = ["online", "offline"];

/// `application/x-www-form-urlencoded` body of `bc-authorize`.
#[derive(Debug, Default, Deserialize)]
pub struct BcAuthorizeForm {
    pub scope: Option<String>,
    pub login_hint: Option<String>,
    pub access_type: Option<String>,
    pub consent_valid_in: Option<i32>,
    pub client_notification_token: Option<String>,
    pub scope_instruction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OAuth2TokenForm {
    pub grant_type: Option<String>,
    pub auth_req_id: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2TokenResponse {
    #[serde(flatten)]
    pub credential: AccessCredential,
    pub scope: String,
    pub refresh_token: String,
    pub refresh_token_expired_in: u64,
}

/// POST /{product}/v1_0/bc-authorize
pub async fn bc_authorize(
    State(state): State<AppState>,
    Extension(product): Extension<Product>,
    Extension(request_id): Extension<RequestId>,
    form: Result<Form<BcAuthorizeForm>, FormRejection>,
) -> ApiResult<Json<AuthorizationGrant>> {
    const MISSING: &str = "Invalid or missing scope or login_hint in request body.";

    let Form(form) = form.map_err(|_| ApiError::invalid_request(MISSING))?;
    let login_hint = non_blank(form.scope.as_deref())
        .and_then(|_| non_blank(form.login_hint.as_deref()))
        .ok_or_else(|| ApiError::invalid_request(MISSING))?;

    if let Some(access_type) = non_blank(form.access_type.as_deref()) {
        if !ACCESS_TYPES.contains(&access_type) {
            return Err(ApiError::bad_request(
                "INVALID_ACCESS_TYPE",
                "access_type must be 'online' or 'offline'.",
            ));
        }
    }

    match state.auth.issue_authorization(login_hint).await {
        Ok(grant) => {
            linfo!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "bc_authorize",
                "Authorization grant issued",
                product = %product,
                auth_req_id = %grant.auth_req_id,
                expires_at_ms = grant.expires_in
            );
            Ok(Json(grant))
        }
        Err(err) => {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "bc_authorize_fail",
                &format!("Authorization request refused: {err}"),
                product = %product
            );
            Err(err.into())
        }
    }
}

/// POST /{product}/token
///
/// Exchanges the `auth_req_id` presented as bearer credential.
pub async fn create_access_token(
    State(state): State<AppState>,
    Extension(product): Extension<Product>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> ApiResult<Json<AccessCredential>> {
    let auth = &state.config.auth;
    let result = match credential_from_headers(&headers, &auth.header_name, auth.bearer_convention)
    {
        Ok(raw) => state.auth.exchange_for_access_credential(raw).await,
        Err(cause) => Err(AuthError::Unauthorized { cause }),
    };

    match result {
        Ok(credential) => {
            linfo!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "token_exchange",
                "Access credential issued",
                product = %product
            );
            Ok(Json(credential))
        }
        Err(err) => {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Auth,
                "token_exchange_fail",
                &format!("Exchange refused: {err}"),
                product = %product
            );
            Err(err.into())
        }
    }
}

/// POST /{product}/oauth2/token
///
/// Canned grant: any non-empty `grant_type` succeeds.
pub async fn create_oauth2_token(
    State(state): State<AppState>,
    Extension(product): Extension<Product>,
    headers: HeaderMap,
    form: Result<Form<OAuth2TokenForm>, FormRejection>,
) -> ApiResult<Json<OAuth2TokenResponse>> {
    const MISSING: &str = "Invalid or missing grant_type in request body.";

    if non_blank(header_str(&headers, TARGET_ENVIRONMENT_HEADER)).is_none() {
        return Err(ApiError::bad_request(
            "INVALID_TARGET_ENVIRONMENT",
            "Missing X-Target-Environment header.",
        ));
    }

    let Form(form) = form.map_err(|_| ApiError::invalid_request(MISSING))?;
    if non_blank(form.grant_type.as_deref()).is_none() {
        return Err(ApiError::invalid_request(MISSING));
    }

    let credential = state.auth.mint_access_credential()?;
    Ok(Json(OAuth2TokenResponse {
        credential,
        scope: product.as_str().to_string(),
        refresh_token: Uuid::new_v4().simple().to_string(),
        refresh_token_expired_in: REFRESH_TOKEN_TTL_SECS,
    }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_oauth2_response_is_flat() {
        let response = OAuth2TokenResponse {
            credential: AccessCredential {
                access_token: "abc".into(),
                token_type: "Bearer".into(),
                expires_in: 3600,
            },
            scope: "collection".into(),
            refresh_token: "def".into(),
            refresh_token_expired_in: REFRESH_TOKEN_TTL_SECS,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "access_token": "abc",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "collection",
                "refresh_token": "def",
                "refresh_token_expired_in": 86400
            })
        );
    }
}
