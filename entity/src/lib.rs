//! # Entity 模块
//!
//! Sea-ORM entity definitions for the sandbox's two tables: provisioned subjects
//! (`users`) and backchannel authorization grants (`auth_tokens`).

pub mod auth_tokens;
pub mod users;

pub use auth_tokens::Entity as AuthTokens;
pub use users::Entity as Users;
