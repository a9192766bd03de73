//! # 路由配置
//!
//! Every product gets the authorization endpoints and the account holder check;
//! the remaining routes are product specific. All product operations except the
//! authorization endpoints sit behind the authentication gate.

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers::{account_holder, auth, collection, disbursement, remittance};
use super::middleware::gate;
use super::server::AppState;
use crate::simulation::Product;

/// 创建所有产品路由
pub fn create_routes(state: AppState) -> Router {
    Product::ALL
        .into_iter()
        .fold(Router::new(), |router, product| {
            router.nest(&format!("/{product}"), product_routes(product, &state))
        })
        .with_state(state)
}

fn product_routes(product: Product, state: &AppState) -> Router<AppState> {
    let protected = match product {
        Product::Collection => collection_routes(),
        Product::Disbursement => disbursement_routes(),
        Product::Remittance => remittance_routes(),
    }
    .route(
        "/v1_0/accountholder/{id_type}/{id}/active",
        get(account_holder::validate_account_holder_status),
    )
    .route_layer(axum::middleware::from_fn_with_state(state.clone(), gate));

    authorization_routes()
        .merge(protected)
        .layer(Extension(product))
}

/// 授权路由（不经过认证门）
fn authorization_routes() -> Router<AppState> {
    Router::new()
        .route("/v1_0/bc-authorize", post(auth::bc_authorize))
        .route("/token", post(auth::create_access_token))
        .route("/oauth2/token", post(auth::create_oauth2_token))
}

fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/v2_0/payment", post(collection::create_payment))
        .route("/v1_0/account/balance", get(collection::get_account_balance))
        .route("/v1_0/requesttopay", post(collection::request_to_pay))
        .route(
            "/v1_0/requesttopay/{reference_id}",
            get(collection::request_to_pay_status),
        )
        .route("/v1_0/requesttowithdraw", post(collection::request_to_withdraw))
        .route("/v2_0/requesttowithdraw", post(collection::request_to_withdraw))
        .route(
            "/v1_0/requesttowithdraw/{reference_id}",
            get(collection::request_to_withdraw_status),
        )
}

fn disbursement_routes() -> Router<AppState> {
    Router::new()
        .route("/v1_0/deposit", post(disbursement::deposit))
        .route("/v2_0/deposit", post(disbursement::deposit))
        .route("/v1_0/transfer", post(disbursement::transfer))
        .route(
            "/v1_0/transfer/{reference_id}",
            get(disbursement::transfer_status),
        )
}

fn remittance_routes() -> Router<AppState> {
    Router::new()
        .route("/v2_0/cashtransfer", post(remittance::cash_transfer))
        .route(
            "/v2_0/cashtransfer/{reference_id}",
            get(remittance::cash_transfer_status),
        )
        .route("/v1_0/transfer", post(remittance::transfer))
        .route("/v1_0/transfer/{reference_id}", get(remittance::transfer_status))
}
