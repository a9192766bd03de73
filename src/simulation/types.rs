//! Wire types shared by the simulators and the HTTP layer.

use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReason {
    pub code: String,
    pub message: String,
}

impl ErrorReason {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A simulated failure: HTTP status plus error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub reason: ErrorReason,
}

impl Rejection {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            reason: ErrorReason::new(code, message),
        }
    }

    #[must_use]
    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_PROCESSING_ERROR",
            "An internal error occurred while processing.",
        )
    }
}

/// Provider product an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Collection,
    Disbursement,
    Remittance,
}

impl Product {
    pub const ALL: [Self; 3] = [Self::Collection, Self::Disbursement, Self::Remittance];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Disbursement => "disbursement",
            Self::Remittance => "remittance",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a create request that simulation looks at.
///
/// Handlers fill only the fields the provider checks for that operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRequest<'a> {
    /// `X-Reference-Id` header.
    pub reference_id: Option<&'a str>,
    /// Checked against the supported currency when present.
    pub currency: Option<&'a str>,
    /// Payer party id.
    pub party_id: Option<&'a str>,
    pub customer_reference: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub party_id_type: String,
    pub party_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    Pending,
    Successful,
    Failed,
}

/// Result object of the transaction status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub amount: String,
    pub currency: String,
    pub financial_transaction_id: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Party>,
    pub payer_message: String,
    pub payee_note: String,
    pub status: TransactionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorReason>,
}

impl TransactionStatus {
    /// The canned transaction every status lookup of `product` is based on.
    #[must_use]
    pub fn base(product: Product, currency: &str) -> Self {
        let (external_id, party_id) = match product {
            Product::Collection => ("947354", "4656473839"),
            Product::Disbursement | Product::Remittance => ("83453", "4609274685"),
        };
        let party = Party {
            party_id_type: "MSISDN".to_string(),
            party_id: party_id.to_string(),
        };
        let (payer, payee) = match product {
            Product::Collection => (Some(party), None),
            Product::Disbursement | Product::Remittance => (None, Some(party)),
        };

        Self {
            amount: "100".to_string(),
            currency: currency.to_string(),
            financial_transaction_id: String::new(),
            external_id: external_id.to_string(),
            payer,
            payee,
            payer_message: String::new(),
            payee_note: String::new(),
            status: TransactionState::Pending,
            reason: None,
        }
    }

    #[must_use]
    pub fn successful(product: Product, currency: &str) -> Self {
        let financial_transaction_id = match product {
            Product::Collection => "23503452",
            Product::Disbursement | Product::Remittance => "363440463",
        };
        Self {
            financial_transaction_id: financial_transaction_id.to_string(),
            status: TransactionState::Successful,
            ..Self::base(product, currency)
        }
    }

    #[must_use]
    pub fn failed(product: Product, currency: &str, code: &str, message: &str) -> Self {
        Self {
            status: TransactionState::Failed,
            reason: Some(ErrorReason::new(code, message)),
            ..Self::base(product, currency)
        }
    }

    #[must_use]
    pub fn pending(product: Product, currency: &str) -> Self {
        let (payer_message, payee_note, message) = match product {
            Product::Collection => (
                "Pending authorization",
                "Awaiting payer approval",
                "Payee not found, transaction pending.",
            ),
            Product::Disbursement | Product::Remittance => (
                "Pending transfer",
                "Awaiting processing",
                "Payee not found, transfer pending.",
            ),
        };
        Self {
            payer_message: payer_message.to_string(),
            payee_note: payee_note.to_string(),
            reason: Some(ErrorReason::new("PAYEE_NOT_FOUND", message)),
            ..Self::base(product, currency)
        }
    }
}

/// Body of the account balance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub available_balance: String,
    pub currency: String,
}
