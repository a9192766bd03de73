//! # Collection 处理器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::{
    Counterparty, REFERENCE_ID_HEADER, TARGET_ENVIRONMENT_HEADER, TransferBody, header_str,
    json_body, non_blank, simulate_create, transaction_status, transfer_body,
};
use crate::api::middleware::RequestId;
use crate::api::response::{ApiError, ApiResult};
use crate::api::server::AppState;
use crate::simulation::{Balance, CreateRequest, Product, TransactionStatus};

#[derive(Debug, Default, Deserialize)]
pub struct Money {
    pub amount: Option<String>,
    pub currency: Option<String>,
}

/// Body of `v2_0/payment`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody {
    pub external_transaction_id: Option<String>,
    pub money: Option<Money>,
    pub customer_reference: Option<String>,
    pub receiver_message: Option<String>,
    pub sender_note: Option<String>,
}

impl CreatePaymentBody {
    fn has_money(&self) -> bool {
        self.money.as_ref().is_some_and(|money| {
            non_blank(money.amount.as_deref()).is_some()
                && non_blank(money.currency.as_deref()).is_some()
        })
    }
}

/// POST /collection/v2_0/payment
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<CreatePaymentBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    const MISSING: &str =
        "Invalid or missing required fields in request body (money.amount, money.currency).";

    let body = json_body(body, MISSING)?;
    if !body.has_money() {
        return Err(ApiError::invalid_request(MISSING));
    }

    let request = CreateRequest {
        reference_id: header_str(&headers, REFERENCE_ID_HEADER),
        customer_reference: body.customer_reference.as_deref(),
        ..CreateRequest::default()
    };
    simulate_create(&state, &request_id, Product::Collection, "create_payment", &request)
}

/// GET /collection/v1_0/account/balance
pub async fn get_account_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Balance>> {
    let target_environment = non_blank(header_str(&headers, TARGET_ENVIRONMENT_HEADER))
        .ok_or_else(|| {
            ApiError::invalid_request("X-Target-Environment is required and must not be empty.")
        })?;

    state
        .simulator
        .on_balance(target_environment)
        .map(Json)
        .map_err(ApiError::from)
}

/// POST /collection/v1_0/requesttopay
pub async fn request_to_pay(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payer_request(&state, &request_id, &headers, body, "request_to_pay")
}

/// POST /collection/v1_0/requesttowithdraw and v2_0/requesttowithdraw
pub async fn request_to_withdraw(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    payer_request(&state, &request_id, &headers, body, "request_to_withdraw")
}

fn payer_request(
    state: &AppState,
    request_id: &RequestId,
    headers: &HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
    operation: &'static str,
) -> ApiResult<StatusCode> {
    let body = transfer_body(body, Counterparty::Payer)?;
    let fields = body.require(Counterparty::Payer)?;

    let request = CreateRequest {
        reference_id: header_str(headers, REFERENCE_ID_HEADER),
        party_id: Some(fields.party_id),
        ..CreateRequest::default()
    };
    simulate_create(state, request_id, Product::Collection, operation, &request)
}

/// GET /collection/v1_0/requesttopay/{reference_id}
pub async fn request_to_pay_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> ApiResult<Json<TransactionStatus>> {
    transaction_status(&state, Product::Collection, &reference_id)
}

/// GET /collection/v1_0/requesttowithdraw/{reference_id}
pub async fn request_to_withdraw_status(
    State(state): State<AppState>,
    Path(reference_id): Path<String>,
) -> ApiResult<Json<TransactionStatus>> {
    transaction_status(&state, Product::Collection, &reference_id)
}
