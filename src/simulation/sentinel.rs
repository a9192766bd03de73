//! Magic-value driven outcomes, for exercising client error handling.

use axum::http::StatusCode;

use super::ResponseSimulator;
use super::types::{Balance, CreateRequest, Product, Rejection, TransactionStatus};
use crate::config::SimulationConfig;

const DUPLICATE: &str = "duplicate";
const ERROR: &str = "error";
const INVALID: &str = "invalid";

#[derive(Debug, Clone)]
pub struct SentinelSimulator {
    currency: String,
    unsupported_currency_status: StatusCode,
}

impl SentinelSimulator {
    #[must_use]
    pub const fn new(currency: String, unsupported_currency_status: StatusCode) -> Self {
        Self {
            currency,
            unsupported_currency_status,
        }
    }

    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        let status = StatusCode::from_u16(config.unsupported_currency_status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(config.currency.clone(), status)
    }
}

impl ResponseSimulator for SentinelSimulator {
    fn on_create(&self, request: &CreateRequest<'_>) -> Result<(), Rejection> {
        match request.reference_id {
            Some(DUPLICATE) => {
                return Err(Rejection::new(
                    StatusCode::CONFLICT,
                    "RESOURCE_ALREADY_EXIST",
                    "Duplicated reference id. Creation of resource failed.",
                ));
            }
            Some(ERROR) => return Err(Rejection::internal()),
            _ => {}
        }

        if request.customer_reference == Some(INVALID) {
            return Err(Rejection::bad_request(
                "INVALID_CUSTOMER_REFERENCE",
                "Invalid customer reference provided.",
            ));
        }

        if request.party_id == Some(INVALID) {
            return Err(Rejection::bad_request("PAYEE_NOT_FOUND", "Payer not found."));
        }

        if let Some(currency) = request.currency {
            if currency != self.currency {
                return Err(Rejection::new(
                    self.unsupported_currency_status,
                    "INVALID_CURRENCY",
                    "Currency not supported.",
                ));
            }
        }

        Ok(())
    }

    fn on_status(&self, product: Product, reference_id: &str) -> Result<TransactionStatus, Rejection> {
        let currency = self.currency.as_str();
        let status = match reference_id {
            ERROR => return Err(Rejection::internal()),
            "notfound" | "not-found" => {
                return Err(Rejection::new(
                    StatusCode::NOT_FOUND,
                    "RESOURCE_NOT_FOUND",
                    "Requested resource was not found.",
                ));
            }
            "success" => TransactionStatus::successful(product, currency),
            "payernotfound" if product == Product::Collection => {
                TransactionStatus::failed(product, currency, "PAYER_NOT_FOUND", "Payee does not exist")
            }
            "limitbreached" | "limit-breached" if product != Product::Collection => {
                TransactionStatus::failed(
                    product,
                    currency,
                    "PAYER_LIMIT_REACHED",
                    "The payer's limit has been breached.",
                )
            }
            "insufficient" | "insufficient-balance" if product != Product::Collection => {
                TransactionStatus::failed(
                    product,
                    currency,
                    "NOT_ENOUGH_FUNDS",
                    "The payer does not have enough funds.",
                )
            }
            // remittances settle immediately
            _ if product == Product::Remittance => TransactionStatus::successful(product, currency),
            _ => TransactionStatus::pending(product, currency),
        };
        Ok(status)
    }

    fn on_balance(&self, target_environment: &str) -> Result<Balance, Rejection> {
        match target_environment {
            INVALID => Err(not_allowed_target_environment()),
            ERROR => Err(Rejection::internal()),
            _ => Ok(Balance {
                available_balance: "1000.00".to_string(),
                currency: self.currency.clone(),
            }),
        }
    }

    fn on_account_holder(
        &self,
        target_environment: Option<&str>,
        account_holder_id: &str,
    ) -> Result<bool, Rejection> {
        if target_environment == Some(INVALID) {
            return Err(not_allowed_target_environment());
        }
        match account_holder_id {
            ERROR => Err(Rejection::internal()),
            "inactive" | "notfound" => Ok(false),
            _ => Ok(true),
        }
    }
}

fn not_allowed_target_environment() -> Rejection {
    Rejection::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "NOT_ALLOWED_TARGET_ENVIRONMENT",
        "Access to target environment is forbidden.",
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::simulation::TransactionState;

    fn simulator() -> SentinelSimulator {
        SentinelSimulator::from_config(&SimulationConfig::default())
    }

    fn create(reference_id: &str) -> CreateRequest<'_> {
        CreateRequest {
            reference_id: Some(reference_id),
            ..CreateRequest::default()
        }
    }

    #[rstest]
    #[case("duplicate", StatusCode::CONFLICT, "RESOURCE_ALREADY_EXIST")]
    #[case("error", StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_PROCESSING_ERROR")]
    fn reference_id_sentinels(#[case] reference_id: &str, #[case] status: StatusCode, #[case] code: &str) {
        let rejection = simulator().on_create(&create(reference_id)).unwrap_err();
        assert_eq!(rejection.status, status);
        assert_eq!(rejection.reason.code, code);
    }

    #[test]
    fn duplicate_wins_over_currency() {
        let request = CreateRequest {
            reference_id: Some("duplicate"),
            currency: Some("EUR"),
            ..CreateRequest::default()
        };
        assert_eq!(simulator().on_create(&request).unwrap_err().status, StatusCode::CONFLICT);
    }

    #[test]
    fn unsupported_currency_uses_configured_status() {
        let request = CreateRequest {
            reference_id: Some("ref-1"),
            currency: Some("EUR"),
            ..CreateRequest::default()
        };
        let rejection = simulator().on_create(&request).unwrap_err();
        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection.reason.code, "INVALID_CURRENCY");

        let strict = SentinelSimulator::new("GHS".to_string(), StatusCode::BAD_REQUEST);
        assert_eq!(strict.on_create(&request).unwrap_err().status, StatusCode::BAD_REQUEST);

        let ghs = CreateRequest {
            currency: Some("GHS"),
            ..request
        };
        assert!(simulator().on_create(&ghs).is_ok());
    }

    #[test]
    fn invalid_party_and_customer_reference() {
        let party = CreateRequest {
            party_id: Some("invalid"),
            ..CreateRequest::default()
        };
        assert_eq!(simulator().on_create(&party).unwrap_err().reason.code, "PAYEE_NOT_FOUND");

        let customer = CreateRequest {
            customer_reference: Some("invalid"),
            ..CreateRequest::default()
        };
        assert_eq!(
            simulator().on_create(&customer).unwrap_err().reason.code,
            "INVALID_CUSTOMER_REFERENCE"
        );
    }

    #[rstest]
    #[case(Product::Collection, "success", TransactionState::Successful)]
    #[case(Product::Collection, "payernotfound", TransactionState::Failed)]
    #[case(Product::Collection, "anything", TransactionState::Pending)]
    #[case(Product::Disbursement, "limitbreached", TransactionState::Failed)]
    #[case(Product::Disbursement, "insufficient", TransactionState::Failed)]
    #[case(Product::Disbursement, "anything", TransactionState::Pending)]
    #[case(Product::Remittance, "limit-breached", TransactionState::Failed)]
    #[case(Product::Remittance, "insufficient-balance", TransactionState::Failed)]
    #[case(Product::Remittance, "anything", TransactionState::Successful)]
    #[case(Product::Collection, "insufficient", TransactionState::Pending)]
    #[case(Product::Collection, "limit-breached", TransactionState::Pending)]
    #[case(Product::Disbursement, "payernotfound", TransactionState::Pending)]
    #[case(Product::Remittance, "payernotfound", TransactionState::Successful)]
    fn status_outcomes(#[case] product: Product, #[case] reference_id: &str, #[case] expected: TransactionState) {
        let status = simulator().on_status(product, reference_id).unwrap();
        assert_eq!(status.status, expected);
    }

    #[test]
    fn status_lookup_errors() {
        for reference_id in ["notfound", "not-found"] {
            let rejection = simulator().on_status(Product::Remittance, reference_id).unwrap_err();
            assert_eq!(rejection.status, StatusCode::NOT_FOUND);
        }
        let rejection = simulator().on_status(Product::Collection, "error").unwrap_err();
        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn collection_success_carries_payer() {
        let status = simulator().on_status(Product::Collection, "success").unwrap();
        assert_eq!(status.financial_transaction_id, "23503452");
        assert_eq!(status.payer.unwrap().party_id, "4656473839");
        assert!(status.payee.is_none());
    }

    #[test]
    fn balance_and_account_holder() {
        let simulator = simulator();
        assert_eq!(simulator.on_balance("sandbox").unwrap().available_balance, "1000.00");
        assert_eq!(
            simulator.on_balance("invalid").unwrap_err().reason.code,
            "NOT_ALLOWED_TARGET_ENVIRONMENT"
        );

        assert!(simulator.on_account_holder(Some("sandbox"), "someone").unwrap());
        assert!(!simulator.on_account_holder(None, "inactive").unwrap());
        assert!(!simulator.on_account_holder(None, "notfound").unwrap());
        assert!(simulator.on_account_holder(None, "error").is_err());
        assert!(simulator.on_account_holder(Some("invalid"), "someone").is_err());
    }
}
