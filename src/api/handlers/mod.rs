//! # 处理器模块
//!
//! One canonical handler per capability. Product-specific handlers live in their
//! product module; handlers shared by all products read the current
//! [`Product`] from the request extensions.

pub mod account_holder;
pub mod auth;
pub mod collection;
pub mod disbursement;
pub mod remittance;
pub mod system;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use super::middleware::RequestId;
use super::response::{ApiError, ApiResult};
use super::server::AppState;
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};
use crate::simulation::{CreateRequest, Product, TransactionStatus};

pub const REFERENCE_ID_HEADER: &str = "x-reference-id";
pub const TARGET_ENVIRONMENT_HEADER: &str = "x-target-environment";
pub const CALLBACK_URL_HEADER: &str = "x-callback-url";

/// 读取请求头，非 UTF-8 视为缺失
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unwraps a JSON body, mapping any extractor rejection to `INVALID_REQUEST`.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>, message: &str) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|_| ApiError::invalid_request(message))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBody {
    pub party_id_type: Option<String>,
    pub party_id: Option<String>,
}

impl PartyBody {
    fn party_id(&self) -> Option<&str> {
        let complete = non_blank(self.party_id_type.as_deref()).is_some();
        non_blank(self.party_id.as_deref()).filter(|_| complete)
    }
}

/// Which side of a transfer the request body names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterparty {
    Payer,
    Payee,
}

impl Counterparty {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Payer => "payer",
            Self::Payee => "payee",
        }
    }
}

/// Body shared by request-to-pay, withdrawals, deposits and transfers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub external_id: Option<String>,
    pub payer: Option<PartyBody>,
    pub payee: Option<PartyBody>,
}

/// Required fields of a validated [`TransferBody`].
#[derive(Debug, Clone, Copy)]
pub struct TransferFields<'a> {
    pub currency: &'a str,
    pub party_id: &'a str,
}

impl TransferBody {
    /// `amount`, `currency` and the counterparty's id and id type must all be present.
    pub fn require(&self, counterparty: Counterparty) -> ApiResult<TransferFields<'_>> {
        let party = match counterparty {
            Counterparty::Payer => self.payer.as_ref(),
            Counterparty::Payee => self.payee.as_ref(),
        };

        let fields = non_blank(self.amount.as_deref()).and_then(|_| {
            Some(TransferFields {
                currency: non_blank(self.currency.as_deref())?,
                party_id: party?.party_id()?,
            })
        });

        fields.ok_or_else(|| ApiError::invalid_request(missing_fields_message(counterparty)))
    }
}

pub(crate) fn missing_fields_message(counterparty: Counterparty) -> String {
    format!(
        "Invalid or missing required fields in request body (amount, currency, {}).",
        counterparty.as_str()
    )
}

/// Parses a transfer body; field checks are left to [`TransferBody::require`].
pub(crate) fn transfer_body(
    body: Result<Json<TransferBody>, JsonRejection>,
    counterparty: Counterparty,
) -> ApiResult<TransferBody> {
    json_body(body, &missing_fields_message(counterparty))
}

/// Runs the simulator on a validated create request: `202 Accepted` with an empty body.
pub(crate) fn simulate_create(
    state: &AppState,
    request_id: &RequestId,
    product: Product,
    operation: &'static str,
    request: &CreateRequest<'_>,
) -> ApiResult<StatusCode> {
    state.simulator.on_create(request).map_err(|rejection| {
        ldebug!(
            request_id,
            LogStage::Simulation,
            LogComponent::Simulator,
            operation,
            "Create request rejected",
            product = %product,
            code = %rejection.reason.code
        );
        ApiError::from(rejection)
    })?;

    ldebug!(
        request_id,
        LogStage::Response,
        LogComponent::Api,
        operation,
        "Create request accepted",
        product = %product
    );
    Ok(StatusCode::ACCEPTED)
}

/// Payee-side create of the disbursement and remittance products.
pub(crate) fn payee_request(
    product: Product,
    state: &AppState,
    request_id: &RequestId,
    headers: &HeaderMap,
    body: Result<Json<TransferBody>, JsonRejection>,
    operation: &'static str,
) -> ApiResult<StatusCode> {
    let body = transfer_body(body, Counterparty::Payee)?;
    let fields = body.require(Counterparty::Payee)?;

    let request = CreateRequest {
        reference_id: header_str(headers, REFERENCE_ID_HEADER),
        currency: Some(fields.currency),
        ..CreateRequest::default()
    };
    simulate_create(state, request_id, product, operation, &request)
}

/// Canned transaction status for `reference_id`.
pub(crate) fn transaction_status(
    state: &AppState,
    product: Product,
    reference_id: &str,
) -> ApiResult<Json<TransactionStatus>> {
    if reference_id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "INVALID_REFERENCE_ID",
            "referenceId is required and must not be empty.",
        ));
    }

    state
        .simulator
        .on_status(product, reference_id)
        .map(Json)
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> TransferBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_complete_transfer_body() {
        let body = body(serde_json::json!({
            "amount": "10",
            "currency": "GHS",
            "externalId": "ext-1",
            "payee": {"partyIdType": "MSISDN", "partyId": "233241234567"}
        }));
        let fields = body.require(Counterparty::Payee).unwrap();
        assert_eq!(fields.currency, "GHS");
        assert_eq!(fields.party_id, "233241234567");
    }

    #[test]
    fn test_wrong_counterparty_is_missing() {
        let body = body(serde_json::json!({
            "amount": "10",
            "currency": "GHS",
            "payee": {"partyIdType": "MSISDN", "partyId": "233241234567"}
        }));
        let err = body.require(Counterparty::Payer).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.reason.message.contains("payer"));
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let blank_amount = body(serde_json::json!({
            "amount": " ",
            "currency": "GHS",
            "payer": {"partyIdType": "MSISDN", "partyId": "1"}
        }));
        assert!(blank_amount.require(Counterparty::Payer).is_err());

        let no_id_type = body(serde_json::json!({
            "amount": "1",
            "currency": "GHS",
            "payer": {"partyId": "1"}
        }));
        assert!(no_id_type.require(Counterparty::Payer).is_err());
    }
}
