//! # 响应模拟模块
//!
//! Decides the simulated outcome of product requests once their shape has been
//! validated. With test mode on, magic values in request fields trigger the
//! provider's documented error responses; with it off every request succeeds.

mod nominal;
mod sentinel;
mod types;

use std::sync::Arc;

pub use nominal::NominalSimulator;
pub use sentinel::SentinelSimulator;
pub use types::{
    Balance, CreateRequest, ErrorReason, Party, Product, Rejection, TransactionState,
    TransactionStatus,
};

use crate::config::SimulationConfig;

/// Pluggable outcome strategy for the product endpoints.
pub trait ResponseSimulator: Send + Sync {
    /// Outcome of a create request (payment, transfer, deposit, ...).
    fn on_create(&self, request: &CreateRequest<'_>) -> Result<(), Rejection>;

    /// Transaction status lookup by reference id.
    fn on_status(&self, product: Product, reference_id: &str) -> Result<TransactionStatus, Rejection>;

    /// Account balance for a non-empty target environment.
    fn on_balance(&self, target_environment: &str) -> Result<Balance, Rejection>;

    /// Whether a well-formed account holder is active.
    fn on_account_holder(
        &self,
        target_environment: Option<&str>,
        account_holder_id: &str,
    ) -> Result<bool, Rejection>;
}

/// Builds the simulator selected by `simulation.test_mode`.
#[must_use]
pub fn simulator_from_config(config: &SimulationConfig) -> Arc<dyn ResponseSimulator> {
    if config.test_mode {
        Arc::new(SentinelSimulator::from_config(config))
    } else {
        Arc::new(NominalSimulator::new(config.currency.clone()))
    }
}
