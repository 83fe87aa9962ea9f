use axum::http::{StatusCode, header::AUTHORIZATION};
use pretty_assertions::assert_eq;
use scheduling_core::{
    DeletePolicy,
    models::{
        appointment::Appointment,
        identity::Role,
        timetable::Timetable,
    },
};
use serde_json::{Value, json};

use crate::test_utils::{
    PATIENT_ID, TestContext, admin, at, bearer, patient, timetable_body,
};

#[tokio::test]
async fn admin_creates_and_reads_timetable() {
    let ctx = TestContext::new();
    let body = timetable_body(at(9, 0), at(12, 0));

    let response = ctx
        .server
        .post("/api/v1/timetables")
        .add_header(AUTHORIZATION, admin())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Timetable = response.json();
    assert_eq!(created.from, at(9, 0));
    assert_eq!(created.to, at(12, 0));
    assert_eq!(created.room, body["room"].as_str().unwrap());

    let fetched: Timetable = ctx
        .server
        .get(&format!("/api/v1/timetables/{}", created.id))
        .add_header(AUTHORIZATION, patient())
        .await
        .json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn non_admin_cannot_create_timetable() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/v1/timetables")
        .add_header(AUTHORIZATION, bearer(PATIENT_ID, &[Role::Doctor, Role::User]))
        .json(&timetable_body(at(9, 0), at(12, 0)))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["code"], "forbidden");
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/v1/timetables")
        .add_header(AUTHORIZATION, admin())
        .json(&timetable_body(at(12, 0), at(9, 0)))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_time_range");
}

#[tokio::test]
async fn blank_room_is_invalid_input() {
    let ctx = TestContext::new();
    let mut body = timetable_body(at(9, 0), at(12, 0));
    body["room"] = json!("   ");

    let response = ctx
        .server
        .post("/api/v1/timetables")
        .add_header(AUTHORIZATION, admin())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_input");
}

#[tokio::test]
async fn missing_timetable_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/v1/timetables/999")
        .add_header(AUTHORIZATION, patient())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "not_found");
}

#[tokio::test]
async fn update_overwrites_all_fields() {
    let ctx = TestContext::new();
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;
    let replacement = json!({
        "hospital_id": 7,
        "doctor_id": 8,
        "from": at(13, 0),
        "to": at(17, 0),
        "room": "B-204",
    });

    let response = ctx
        .server
        .put(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .json(&replacement)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Timetable = response.json();
    assert_eq!(updated.id, id);
    assert_eq!(updated.hospital_id, 7);
    assert_eq!(updated.doctor_id, 8);
    assert_eq!(updated.from, at(13, 0));
    assert_eq!(updated.to, at(17, 0));
    assert_eq!(updated.room, "B-204");
}

#[tokio::test]
async fn update_with_inverted_range_leaves_timetable_unchanged() {
    let ctx = TestContext::new();
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;
    let before: Value = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await
        .json();

    let response = ctx
        .server
        .put(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .json(&timetable_body(at(15, 0), at(11, 0)))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_time_range");

    let after: Value = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await
        .json();
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_of_missing_timetable_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put("/api/v1/timetables/41")
        .add_header(AUTHORIZATION, admin())
        .json(&timetable_body(at(9, 0), at(12, 0)))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_paginated_in_creation_order() {
    let ctx = TestContext::new();
    let mut ids = Vec::new();
    for hour in 1..=5 {
        ids.push(ctx.create_timetable(at(hour, 0), at(hour, 30)).await);
    }

    let page: Vec<Timetable> = ctx
        .server
        .get("/api/v1/timetables")
        .add_query_param("offset", 1)
        .add_query_param("limit", 2)
        .add_header(AUTHORIZATION, patient())
        .await
        .json();

    assert_eq!(
        page.iter().map(|t| t.id).collect::<Vec<_>>(),
        ids[1..3].to_vec()
    );
}

#[tokio::test]
async fn list_defaults_to_first_ten() {
    let ctx = TestContext::new();
    for minute in 0..12 {
        ctx.create_timetable(at(8, minute), at(9, minute)).await;
    }

    let page: Vec<Timetable> = ctx
        .server
        .get("/api/v1/timetables")
        .add_header(AUTHORIZATION, patient())
        .await
        .json();

    assert_eq!(page.len(), 10);
}

#[tokio::test]
async fn list_rejects_zero_limit_and_bad_numbers() {
    let ctx = TestContext::new();

    let zero = ctx
        .server
        .get("/api/v1/timetables")
        .add_query_param("limit", 0)
        .add_header(AUTHORIZATION, patient())
        .await;
    let negative = ctx
        .server
        .get("/api/v1/timetables")
        .add_query_param("offset", -3)
        .add_header(AUTHORIZATION, patient())
        .await;

    assert_eq!(zero.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(negative.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cascade_delete_removes_appointments() {
    let ctx = TestContext::with_policy(DeletePolicy::Cascade);
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;
    ctx.book(id, PATIENT_ID, at(10, 0)).await;

    let response = ctx
        .server
        .delete(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let appointments: Vec<Appointment> = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}/appointments"))
        .add_header(AUTHORIZATION, admin())
        .await
        .json();
    assert!(appointments.is_empty());

    let gone = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_policy_refuses_timetable_with_bookings() {
    let ctx = TestContext::with_policy(DeletePolicy::Reject);
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;
    ctx.book(id, PATIENT_ID, at(10, 0)).await;

    let response = ctx
        .server
        .delete(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "timetable_in_use");

    let still_there = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await;
    assert_eq!(still_there.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn orphan_policy_keeps_appointments_visible() {
    let ctx = TestContext::with_policy(DeletePolicy::Orphan);
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;
    let appointment_id = ctx.book(id, PATIENT_ID, at(10, 0)).await;

    let response = ctx
        .server
        .delete(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let appointments: Vec<Appointment> = ctx
        .server
        .get(&format!("/api/v1/timetables/{id}/appointments"))
        .add_header(AUTHORIZATION, admin())
        .await
        .json();
    assert_eq!(
        appointments.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![appointment_id]
    );
}

#[tokio::test]
async fn delete_of_missing_timetable_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .delete("/api/v1/timetables/12")
        .add_header(AUTHORIZATION, admin())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_admin_cannot_delete_timetable() {
    let ctx = TestContext::new();
    let id = ctx.create_timetable(at(9, 0), at(12, 0)).await;

    let response = ctx
        .server
        .delete(&format!("/api/v1/timetables/{id}"))
        .add_header(AUTHORIZATION, patient())
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
