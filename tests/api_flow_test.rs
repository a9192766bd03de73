//! # 产品 API 流程测试
//!
//! Drives the full router (middleware included) with `oneshot` requests:
//! 1. 授权流程 bc-authorize → token
//! 2. 认证门的开启与关闭
//! 3. 哨兵值模拟与账户持有人校验

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{SEEDED_CONTACT, START_MS, seeded_db, test_app};
use momo_sandbox::auth::{
    AuthService, AuthorizationToken, DbSubjectDirectory, ManualClock, TokenStore,
};
use momo_sandbox::config::{AccessCredentialFormat, GateMode};
use momo_sandbox::error::AuthResult;
use momo_sandbox::simulation::simulator_from_config;
use momo_sandbox::{ApiServer, AppConfig, AppContext, AppState, AuthError};
use sea_orm::DbErr;
use uuid::Uuid;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn form_post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, FORM)
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn json_post(uri: &str, reference_id: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Reference-Id", reference_id)
        .header("X-Target-Environment", "sandbox")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Target-Environment", "sandbox")
        .body(Body::empty())
        .unwrap()
}

fn with_credential(mut request: Request<Body>, credential: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        credential.parse().unwrap(),
    );
    request
}

async fn authorize(router: &Router, product: &str) -> String {
    let (status, body) = send(
        router,
        form_post(
            &format!("/api/{product}/v1_0/bc-authorize"),
            &format!("scope=profile&login_hint={SEEDED_CONTACT}&access_type=offline"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["auth_req_id"].as_str().unwrap().to_string()
}

fn transfer_body(counterparty: &str, currency: &str, party_id: &str) -> Value {
    json!({
        "amount": "100",
        "currency": currency,
        "externalId": "ext-1",
        (counterparty): {"partyIdType": "MSISDN", "partyId": party_id},
        "payerMessage": "thanks",
        "payeeNote": "thanks"
    })
}

#[tokio::test]
async fn liveness_and_banner() {
    let (router, _) = test_app(AppConfig::default()).await;

    let response = router.clone().oneshot(get("/ping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "momo-sandbox");
    assert_eq!(body["products"], json!(["collection", "disbursement", "remittance"]));
    assert_eq!(body["gate_enabled"], false);
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let (router, _) = test_app(AppConfig::default()).await;

    let mut request = get("/ping");
    request
        .headers_mut()
        .insert("x-request-id", "trace-abc".parse().unwrap());
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc");
}

#[tokio::test]
async fn authorize_then_exchange() {
    let (router, _) = test_app(AppConfig::default()).await;

    let (status, grant) = send(
        &router,
        form_post(
            "/api/collection/v1_0/bc-authorize",
            &format!("scope=profile&login_hint={SEEDED_CONTACT}"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grant["interval"], 5);
    assert_eq!(grant["expires_in"], START_MS + 300_000);
    let auth_req_id = grant["auth_req_id"].as_str().unwrap();

    for credential in [format!("Bearer {auth_req_id}"), auth_req_id.to_string()] {
        let request = with_credential(form_post("/api/collection/token", ""), &credential);
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
        assert_eq!(body["access_token"].as_str().unwrap().len(), 32);
    }
}

#[tokio::test]
async fn bc_authorize_rejections() {
    let (router, _) = test_app(AppConfig::default()).await;
    let uri = "/api/remittance/v1_0/bc-authorize";

    let (status, body) = send(&router, form_post(uri, "scope=profile")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = send(
        &router,
        form_post(
            uri,
            &format!("scope=profile&login_hint={SEEDED_CONTACT}&access_type=sometimes"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ACCESS_TYPE");

    let (status, body) =
        send(&router, form_post(uri, "scope=profile&login_hint=notfound-contact")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"code": "PAYEE_NOT_FOUND", "message": "User not found."})
    );
}

#[tokio::test]
async fn token_endpoint_reports_failure_kind() {
    let (router, clock) = test_app(AppConfig::default()).await;

    let (status, body) = send(&router, form_post("/api/disbursement/token", "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_CREDENTIAL");

    let request = with_credential(form_post("/api/disbursement/token", ""), "Bearer nope");
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MALFORMED_CREDENTIAL");

    let auth_req_id = authorize(&router, "disbursement").await;
    clock.advance(300_001);
    let request = with_credential(form_post("/api/disbursement/token", ""), &auth_req_id);
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "CREDENTIAL_EXPIRED");
}

#[tokio::test]
async fn oauth2_token_is_canned() {
    let (router, _) = test_app(AppConfig::default()).await;
    let uri = "/api/disbursement/oauth2/token";

    let (status, body) = send(&router, form_post(uri, "grant_type=urn:openid:params:grant-type:ciba")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TARGET_ENVIRONMENT");

    let mut request = form_post(uri, "auth_req_id=abc");
    request
        .headers_mut()
        .insert("x-target-environment", "sandbox".parse().unwrap());
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let mut request = form_post(uri, "grant_type=urn:openid:params:grant-type:ciba");
    request
        .headers_mut()
        .insert("x-target-environment", "sandbox".parse().unwrap());
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "disbursement");
    assert_eq!(body["refresh_token_expired_in"], 86400);
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn gate_disabled_lets_everything_through() {
    let (router, _) = test_app(AppConfig::default()).await;

    let (status, body) = send(&router, get("/api/collection/v1_0/account/balance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"availableBalance": "1000.00", "currency": "GHS"}));
}

#[tokio::test]
async fn store_gate_requires_a_live_authorization() {
    let mut config = AppConfig::default();
    config.auth.gate.enabled = true;
    let (router, clock) = test_app(config).await;
    let uri = "/api/collection/v1_0/account/balance";

    let (status, body) = send(&router, get(uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"code": "PAYEE_NOT_FOUND", "message": "Invalid or expired token"})
    );

    // 授权端点不经过认证门
    let auth_req_id = authorize(&router, "collection").await;

    let (status, _) = send(&router, with_credential(get(uri), &auth_req_id)).await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(300_001);
    let (status, body) = send(&router, with_credential(get(uri), &auth_req_id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "PAYEE_NOT_FOUND");
}

#[tokio::test]
async fn signature_gate_accepts_exchanged_credentials_only() {
    let mut config = AppConfig::default();
    config.auth.access_credential = AccessCredentialFormat::Signed;
    config.auth.gate.enabled = true;
    config.auth.gate.mode = GateMode::Signature;
    config.auth.gate.unauthorized_code = "UNAUTHORIZED".to_string();
    let (router, _) = test_app(config).await;
    let uri = "/api/remittance/v1_0/transfer/success";

    let auth_req_id = authorize(&router, "remittance").await;
    let (status, body) = send(&router, with_credential(get(uri), &auth_req_id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = with_credential(form_post("/api/remittance/token", ""), &auth_req_id);
    let (status, credential) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    let access_token = credential["access_token"].as_str().unwrap();

    let (status, body) = send(
        &router,
        with_credential(get(uri), &format!("Bearer {access_token}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESSFUL");
}

#[tokio::test]
async fn collection_create_sentinels() {
    let (router, _) = test_app(AppConfig::default()).await;
    let uri = "/api/collection/v1_0/requesttopay";

    let body = transfer_body("payer", "GHS", "233241234567");
    let (status, response) = send(&router, json_post(uri, "ref-1", &body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(response, Value::Null);

    let (status, response) = send(&router, json_post(uri, "duplicate", &body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["code"], "RESOURCE_ALREADY_EXIST");

    let (status, response) = send(&router, json_post(uri, "error", &body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["code"], "INTERNAL_PROCESSING_ERROR");

    let invalid_payer = transfer_body("payer", "GHS", "invalid");
    let (status, response) = send(&router, json_post(uri, "ref-2", &invalid_payer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "PAYEE_NOT_FOUND");

    // payee instead of payer
    let wrong_side = transfer_body("payee", "GHS", "233241234567");
    let (status, response) = send(&router, json_post(uri, "ref-3", &wrong_side)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_REQUEST");

    let payment = json!({"money": {"amount": "5", "currency": "GHS"}, "customerReference": "invalid"});
    let (status, response) = send(
        &router,
        json_post("/api/collection/v2_0/payment", "ref-4", &payment),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_CUSTOMER_REFERENCE");
}

#[tokio::test]
async fn malformed_json_is_invalid_request() {
    let (router, _) = test_app(AppConfig::default()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/disbursement/v1_0/deposit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn unsupported_currency_uses_configured_status() {
    let (router, _) = test_app(AppConfig::default()).await;
    let usd = transfer_body("payee", "USD", "233241234567");

    let (status, body) = send(
        &router,
        json_post("/api/disbursement/v2_0/deposit", "ref-1", &usd),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INVALID_CURRENCY");

    let mut config = AppConfig::default();
    config.simulation.unsupported_currency_status = 400;
    let (router, _) = test_app(config).await;
    let (status, _) = send(
        &router,
        json_post("/api/remittance/v2_0/cashtransfer", "ref-1", &usd),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_lookups() {
    let (router, _) = test_app(AppConfig::default()).await;

    let (status, body) = send(&router, get("/api/collection/v1_0/requesttopay/success")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESSFUL");
    assert_eq!(body["financialTransactionId"], "23503452");
    assert_eq!(body["payer"]["partyIdType"], "MSISDN");

    let (status, body) = send(&router, get("/api/collection/v1_0/requesttowithdraw/ref-9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["reason"]["code"], "PAYEE_NOT_FOUND");

    let (status, body) = send(&router, get("/api/disbursement/v1_0/transfer/not-found")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");

    let (status, body) = send(&router, get("/api/disbursement/v1_0/transfer/insufficient")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["reason"]["code"], "NOT_ENOUGH_FUNDS");

    let (status, body) = send(&router, get("/api/remittance/v2_0/cashtransfer/ref-9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESSFUL");
    assert_eq!(body["payee"]["partyId"], "4609274685");
}

#[tokio::test]
async fn account_holder_checks() {
    let (router, _) = test_app(AppConfig::default()).await;

    let (status, body) = send(
        &router,
        get("/api/collection/v1_0/accountholder/msisdn/%2B233241234567/active"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(true));

    let (status, body) = send(
        &router,
        get("/api/disbursement/v1_0/accountholder/ALIAS/inactive/active"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(false));

    let (status, body) = send(
        &router,
        get("/api/remittance/v1_0/accountholder/msisdn/0241234567/active"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_MSISDN");

    let (status, body) = send(
        &router,
        get("/api/remittance/v1_0/accountholder/phone/0241234567/active"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ACCOUNT_HOLDER_ID_TYPE");

    let mut request = get("/api/collection/v1_0/accountholder/id/12345/active");
    request
        .headers_mut()
        .insert("x-target-environment", "invalid".parse().unwrap());
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "NOT_ALLOWED_TARGET_ENVIRONMENT");
}

#[tokio::test]
async fn nominal_simulation_ignores_sentinels() {
    let mut config = AppConfig::default();
    config.simulation.test_mode = false;
    let (router, _) = test_app(config).await;

    let body = transfer_body("payer", "GHS", "invalid");
    let (status, _) = send(
        &router,
        json_post("/api/collection/v1_0/requesttopay", "duplicate", &body),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn empty_prefix_mounts_products_at_root() {
    let mut config = AppConfig::default();
    config.server.api_prefix = String::new();
    let (router, _) = test_app(config).await;

    let (status, _) = send(&router, get("/collection/v1_0/account/balance")).await;
    assert_eq!(status, StatusCode::OK);
}

/// 始终失败的令牌存储
struct UnavailableStore;

#[async_trait]
impl TokenStore for UnavailableStore {
    async fn insert(&self, _token: &AuthorizationToken) -> AuthResult<()> {
        Err(AuthError::Store(DbErr::Custom("token store offline".into())))
    }

    async fn find_by_id(&self, _id: &Uuid) -> AuthResult<Option<AuthorizationToken>> {
        Err(AuthError::Store(DbErr::Custom("token store offline".into())))
    }
}

async fn app_with_unavailable_store(config: AppConfig) -> Router {
    let db = seeded_db().await;
    let auth = AuthService::new(
        Arc::new(DbSubjectDirectory::new(Arc::clone(&db))),
        Arc::new(UnavailableStore),
        Arc::new(ManualClock::new(START_MS)),
        &config.auth,
    );
    let simulator = simulator_from_config(&config.simulation);
    let context = AppContext::from_parts(Arc::new(config), db, Arc::new(auth), simulator);
    ApiServer::create_router(AppState::new(Arc::new(context)))
}

#[tokio::test]
async fn token_store_outage_is_a_server_error() {
    let mut config = AppConfig::default();
    config.auth.gate.enabled = true;
    let router = app_with_unavailable_store(config).await;
    let credential = Uuid::new_v4().to_string();

    // 存储故障不会被折叠成认证门的 401
    let uri = "/api/collection/v1_0/account/balance";
    let (status, body) = send(&router, with_credential(get(uri), &credential)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_PROCESSING_ERROR");

    let (status, body) = send(
        &router,
        form_post(
            "/api/collection/v1_0/bc-authorize",
            &format!("scope=profile&login_hint={SEEDED_CONTACT}"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_PROCESSING_ERROR");

    let request = with_credential(form_post("/api/collection/token", ""), &credential);
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_PROCESSING_ERROR");

    // 凭证缺失在访问存储之前就被拒绝
    let (status, body) = send(&router, get(uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "PAYEE_NOT_FOUND");
}
