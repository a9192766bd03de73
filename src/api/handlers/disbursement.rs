//! # Disbursement 处理器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};

use super::{TransferBody, payee_request, transaction_status};
use crate::api::middleware::RequestId;
use crate::api::response::ApiResult;
use crate::api::server::AppState;
use crate::simulation::{Product, TransactionStatus};

/// POST /disbursement/v1_0/deposit and v2_0/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payee_request(
        Product::Disbursement,
        &state,
        &request_id,
        &headers,
        body,
        "deposit",
    )
}

/// POST /disbursement/v1_0/transfer
pub async fn transfer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payee_request(
        Product::Disbursement,
        &state,
        &request_id,
        &headers,
        body,
        "disbursement_transfer",
    )
}

/// GET /disbursement/v1_0/transfer/{reference_id}
pub async fn transfer_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> ApiResult<Json<TransactionStatus>> {
    transaction_status(&state, Product::Disbursement, &reference_id)
}
