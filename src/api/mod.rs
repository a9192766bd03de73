//! # 产品 API 模块
//!
//! HTTP surface of the sandbox: authorization, collection, disbursement and
//! remittance endpoints for every product, plus liveness probes.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use response::{ApiError, ApiResult};
pub use routes::create_routes;
pub use server::{ApiServer, AppState};
