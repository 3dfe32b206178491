mod common;

use assistant::Unconfigured;
use axum::http::StatusCode;
use common::{Canned, TestApp};
use models::enums::UserRole;
use serde_json::json;

const ADMIN: &str = "admin-sub";
const STUDENT: &str = "student-sub";

const DRAFT: &str = r#"Sure, here is a draft:
```json
[{"day":"MONDAY","period":1,"startTime":"09:00","endTime":"09:50","subjectName":"Operating Systems",
  "subjectCode":"OS","teacherName":"Prof. Rao","roomName":"C101","className":"BTech CE 2024"}]
```"#;

async fn seed_catalog(app: &TestApp) -> String {
    let class = app
        .create(
            "/classes",
            ADMIN,
            json!({"name": "BTech CE 2024", "program": "BTech CE", "year": 2, "semester": 3}),
        )
        .await;
    app.create(
        "/subjects",
        ADMIN,
        json!({"code": "OS", "name": "Operating Systems"}),
    )
    .await;
    app.create(
        "/teachers",
        ADMIN,
        json!({"employeeId": "EMP1", "name": "Prof. Rao", "email": "rao@college.edu"}),
    )
    .await;
    app.create("/rooms", ADMIN, json!({"name": "C101", "capacity": 60}))
        .await;
    app.create(
        "/timeslots",
        ADMIN,
        json!({"day": "MONDAY", "period": 1, "startTime": "09:00", "endTime": "09:50"}),
    )
    .await;
    class
}

#[tokio::test]
async fn test_chat_replies() {
    let app = TestApp::new(Canned("Monday is fully booked.")).await;

    let (status, body) = app
        .post(
            "/ai/chat",
            STUDENT,
            json!({"message": "Is Monday busy?", "includeContext": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Monday is fully booked.");

    let (status, body) = app.post("/ai/chat", STUDENT, json!({"message": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn test_assistant_failure_is_generic() {
    let app = TestApp::new(Unconfigured).await;

    let (status, body) = app
        .post("/ai/chat", STUDENT, json!({"message": "hello"}))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process chat request");
}

#[tokio::test]
async fn test_generate_requires_admin_and_data() {
    let app = TestApp::new(Canned(DRAFT)).await;
    app.user(ADMIN, UserRole::Admin).await;

    let (status, body) = app
        .post("/ai/generate", STUDENT, json!({"classId": "00000000-0000-0000-0000-000000000000"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only administrators can generate timetables");

    let (status, body) = app
        .post("/ai/generate", ADMIN, json!({"classId": "00000000-0000-0000-0000-000000000000"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Class not found");

    let class = app
        .create(
            "/classes",
            ADMIN,
            json!({"name": "BTech CE 2024", "program": "BTech CE", "year": 2, "semester": 3}),
        )
        .await;
    let (status, body) = app
        .post("/ai/generate", ADMIN, json!({"classId": class}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No subjects found. Add subjects first.");
}

#[tokio::test]
async fn test_generate_returns_draft() {
    let app = TestApp::new(Canned(DRAFT)).await;
    app.user(ADMIN, UserRole::Admin).await;
    let class = seed_catalog(&app).await;

    let (status, body) = app
        .post(
            "/ai/generate",
            ADMIN,
            json!({"classId": class, "constraints": {"maxClassesPerDay": 4}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Generated 1 timetable entries for BTech CE 2024"
    );
    assert_eq!(body["timetable"][0]["subjectCode"], "OS");

    // Drafts are never saved
    let (_, entries) = app.get("/timetable", ADMIN).await;
    assert_eq!(entries, json!([]));

    let (status, body) = app
        .post(
            "/ai/generate",
            ADMIN,
            json!({"classId": class, "constraints": {"maxClassesPerDay": 11}}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Max classes per day must be between 1 and 10");
}

#[tokio::test]
async fn test_optimize_without_entries_warns() {
    // An unconfigured assistant proves the model is never asked
    let app = TestApp::new(Unconfigured).await;
    app.user(ADMIN, UserRole::Admin).await;

    let (status, body) = app.post("/ai/optimize", STUDENT, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Only administrators can use optimization features"
    );

    let (status, body) = app.post("/ai/optimize", ADMIN, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"][0]["type"], "warning");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_optimize_parses_suggestions() {
    let app = TestApp::new(Canned(
        r#"[{"type":"improvement","message":"Move OS to the afternoon","suggestedAction":"Swap periods 1 and 5"}]"#,
    ))
    .await;
    app.user(ADMIN, UserRole::Admin).await;
    let class = seed_catalog(&app).await;

    let (_, subjects) = app.get("/subjects", ADMIN).await;
    let (_, teachers) = app.get("/teachers", ADMIN).await;
    let (_, rooms) = app.get("/rooms", ADMIN).await;
    let (_, slots) = app.get("/timeslots", ADMIN).await;
    app.create(
        "/timetable",
        ADMIN,
        json!({
            "classId": class,
            "subjectId": subjects[0]["id"],
            "teacherId": teachers[0]["id"],
            "roomId": rooms[0]["id"],
            "timeSlotId": slots[0]["id"]
        }),
    )
    .await;

    let (status, body) = app
        .post("/ai/optimize", ADMIN, json!({"classId": class}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"][0]["type"], "improvement");
    assert_eq!(
        body["suggestions"][0]["suggestedAction"],
        "Swap periods 1 and 5"
    );
}
