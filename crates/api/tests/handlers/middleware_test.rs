use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    routing::get,
};
use axum_test::TestServer;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use scheduling_api::{
    identity::AccessClaims, middleware::error_handling::map_error, with_request_timeout,
};
use scheduling_core::{
    errors::{SchedulingError, StoreError},
    models::identity::Role,
};
use serde_json::Value;

use crate::test_utils::{PATIENT_ID, TestContext, patient, token};

#[rstest]
#[case(SchedulingError::InvalidInput("x".into()), StatusCode::BAD_REQUEST)]
#[case(SchedulingError::InvalidTimeRange("x".into()), StatusCode::BAD_REQUEST)]
#[case(SchedulingError::TimeSlotTaken("x".into()), StatusCode::CONFLICT)]
#[case(SchedulingError::TimetableInUse("x".into()), StatusCode::CONFLICT)]
#[case(SchedulingError::NotFound("x".into()), StatusCode::NOT_FOUND)]
#[case(SchedulingError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED)]
#[case(SchedulingError::Forbidden("x".into()), StatusCode::FORBIDDEN)]
#[case(
    SchedulingError::StoreUnavailable(StoreError::Timeout { operation: "get_timetable" }),
    StatusCode::SERVICE_UNAVAILABLE
)]
#[case(SchedulingError::IdentityUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE)]
#[case(SchedulingError::RequestTimeout("x".into()), StatusCode::REQUEST_TIMEOUT)]
#[case(SchedulingError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn errors_map_to_status_codes(#[case] error: SchedulingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn missing_credential_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/v1/timetables").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "unauthorized");
    assert!(body["error"].as_str().unwrap().starts_with("Authentication error"));
}

#[tokio::test]
async fn forged_credential_is_unauthorized() {
    let ctx = TestContext::new();
    let claims = AccessClaims {
        user_id: PATIENT_ID,
        roles: vec![Role::Admin],
        exp: Utc::now().timestamp() + 3600,
    };
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"not-the-shared-secret"),
    )
    .unwrap();

    let response = ctx
        .server
        .get("/api/v1/timetables")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {forged}")).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bare_token_is_accepted() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/v1/timetables")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&token(PATIENT_ID, &[Role::User])).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn non_numeric_id_is_invalid_input() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/v1/timetables/first")
        .add_header(AUTHORIZATION, patient())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_input");
}

#[tokio::test]
async fn health_and_version_need_no_credential() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    let version = ctx.server.get("/version").await;

    assert_eq!(health.status_code(), StatusCode::OK);
    let health: Value = health.json();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["delete_policy"], "cascade");
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.json::<Value>()["name"], "scheduling-api");
}

#[tokio::test]
async fn slow_request_times_out_with_error_body() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }),
    );
    let server = TestServer::new(with_request_timeout(app, Duration::from_millis(20))).unwrap();

    let response = server.get("/slow").await;

    assert_eq!(response.status_code(), StatusCode::REQUEST_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["code"], "request_timeout");
    assert!(body["error"].as_str().unwrap().starts_with("Request timed out"));
}
