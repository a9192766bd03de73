//! Happy-path outcomes only.

use super::ResponseSimulator;
use super::types::{Balance, CreateRequest, Product, Rejection, TransactionStatus};

#[derive(Debug, Clone)]
pub struct NominalSimulator {
    currency: String,
}

impl NominalSimulator {
    #[must_use]
    pub const fn new(currency: String) -> Self {
        Self { currency }
    }
}

impl ResponseSimulator for NominalSimulator {
    fn on_create(&self, _request: &CreateRequest<'_>) -> Result<(), Rejection> {
        Ok(())
    }

    fn on_status(&self, product: Product, _reference_id: &str) -> Result<TransactionStatus, Rejection> {
        Ok(TransactionStatus::successful(product, &self.currency))
    }

    fn on_balance(&self, _target_environment: &str) -> Result<Balance, Rejection> {
        Ok(Balance {
            available_balance: "1000.00".to_string(),
            currency: self.currency.clone(),
        })
    }

    fn on_account_holder(
        &self,
        _target_environment: Option<&str>,
        _account_holder_id: &str,
    ) -> Result<bool, Rejection> {
        Ok(true)
    }
}
