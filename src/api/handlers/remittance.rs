//! # Remittance 处理器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};

use super::{TransferBody, payee_request, transaction_status};
use crate::api::middleware::RequestId;
use crate::api::response::ApiResult;
use crate::api::server::AppState;
use crate::simulation::{Product, TransactionStatus};

/// POST /remittance/v2_0/cashtransfer
///
/// The body also carries originating country and payer identity fields; only
/// the transfer core is validated.
pub async fn cash_transfer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payee_request(
        Product::Remittance,
        &state,
        &request_id,
        &headers,
        body,
        "cash_transfer",
    )
}

/// GET /remittance/v2_0/cashtransfer/{reference_id}
pub async fn cash_transfer_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> ApiResult<Json<TransactionStatus>> {
    transaction_status(&state, Product::Remittance, &reference_id)
}

/// POST /remittance/v1_0/transfer
pub async fn transfer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payee_request(
        Product::Remittance,
        &state,
        &request_id,
        &headers,
        body,
        "remittance_transfer",
    )
}

/// GET /remittance/v1_0/transfer/{reference_id}
pub async fn transfer_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> ApiResult<Json<TransactionStatus>> {
    transaction_status(&state, Product::Remittance, &reference_id)
}
