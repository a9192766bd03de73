//! # 认证门中间件
//!
//! 从配置的请求头中提取承载凭证并校验。`store` 模式对照令牌存储校验授权令牌，
//! `signature` 模式只校验签名访问凭证。校验失败统一返回配置的 401 错误体。

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::request_id::RequestId;
use crate::api::response::ApiError;
use crate::api::server::AppState;
use crate::app::AppContext;
use crate::auth::{ValidatedCredential, credential_from_headers};
use crate::config::GateMode;
use crate::error::{AuthError, AuthResult};
use crate::logging::{LogComponent, LogStage};
use crate::simulation::ErrorReason;
use crate::{ldebug, lwarn};

/// Axum 认证门
///
/// Disabled gates pass every request through.
pub async fn gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let gate = &state.config.auth.gate;
    if !gate.enabled {
        return next.run(request).await;
    }

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_default();

    let outcome = authenticate(&state, request.headers()).await;
    match outcome {
        Ok(validated) => {
            ldebug!(
                request_id,
                LogStage::Authentication,
                LogComponent::Gate,
                "gate_pass",
                "Credential accepted",
                path = %request.uri().path()
            );
            if let Some(validated) = validated {
                request.extensions_mut().insert(validated);
            }
            next.run(request).await
        }
        Err(err) if err.fault().is_some() => {
            lwarn!(
                request_id,
                LogStage::Authentication,
                LogComponent::Gate,
                "gate_reject",
                &format!("Request rejected: {err}"),
                path = %request.uri().path()
            );
            let body = ErrorReason::new(
                gate.unauthorized_code.clone(),
                gate.unauthorized_message.clone(),
            );
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Runs the configured check; store mode yields the resolved token.
async fn authenticate(
    context: &AppContext,
    headers: &HeaderMap,
) -> AuthResult<Option<ValidatedCredential>> {
    let auth = &context.config.auth;
    let raw = credential_from_headers(headers, &auth.header_name, auth.bearer_convention)
        .map_err(|cause| AuthError::Unauthorized { cause })?;

    match auth.gate.mode {
        GateMode::Store => context.auth.validate_credential(raw).await.map(Some),
        GateMode::Signature => context.auth.verify_access_credential(raw).map(|_| None),
    }
}
