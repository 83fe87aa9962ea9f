use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use fake::Fake;
use jsonwebtoken::{EncodingKey, Header, encode};
use scheduling_api::{ApiState, identity::AccessClaims, identity::jwt::JwtVerifier, router};
use scheduling_core::{DeletePolicy, EngineConfig, SchedulingEngine, models::identity::Role};
use scheduling_db::MemoryStore;
use serde_json::{Value, json};

pub const SECRET: &str = "integration-test-secret";

pub const ADMIN_ID: i64 = 1;
pub const PATIENT_ID: i64 = 100;
pub const OTHER_PATIENT_ID: i64 = 200;

pub struct TestContext {
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(DeletePolicy::Cascade)
    }

    pub fn with_policy(delete_policy: DeletePolicy) -> Self {
        let engine = SchedulingEngine::new(
            Arc::new(MemoryStore::new()),
            EngineConfig {
                store_timeout: Duration::from_secs(5),
                delete_policy,
            },
        );
        let state = Arc::new(ApiState::new(engine, Arc::new(JwtVerifier::new(SECRET))));

        Self {
            server: TestServer::new(router(state)).unwrap(),
        }
    }

    /// Creates a timetable as the admin and returns its id.
    pub async fn create_timetable(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        let response = self
            .server
            .post("/api/v1/timetables")
            .add_header(AUTHORIZATION, admin())
            .json(&timetable_body(from, to))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    /// Books `time` on a timetable as `user_id` and returns the appointment id.
    pub async fn book(&self, timetable_id: i64, user_id: i64, time: DateTime<Utc>) -> i64 {
        let response = self
            .server
            .post(&format!("/api/v1/appointments/{timetable_id}"))
            .add_header(AUTHORIZATION, bearer(user_id, &[Role::User]))
            .json(&json!({ "time": time }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
}

pub fn token(user_id: i64, roles: &[Role]) -> String {
    let claims = AccessClaims {
        user_id,
        roles: roles.to_vec(),
        exp: Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(user_id: i64, roles: &[Role]) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token(user_id, roles))).unwrap()
}

pub fn admin() -> HeaderValue {
    bearer(ADMIN_ID, &[Role::Admin])
}

pub fn patient() -> HeaderValue {
    bearer(PATIENT_ID, &[Role::User])
}

pub fn timetable_body(from: DateTime<Utc>, to: DateTime<Utc>) -> Value {
    let room: u16 = (100..999).fake();
    json!({
        "hospital_id": (1..50).fake::<i64>(),
        "doctor_id": (1..500).fake::<i64>(),
        "from": from,
        "to": to,
        "room": format!("Room {room}"),
    })
}
