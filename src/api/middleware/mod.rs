//! # 中间件模块

pub mod auth;
pub mod request_id;

pub use auth::gate;
pub use request_id::{RequestId, request_id_middleware};
