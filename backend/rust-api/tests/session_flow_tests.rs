use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_test_app, request_json};

async fn create_session(
    app: &common::TestApp,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request_json(&app.router, "POST", "/api/v1/sessions/", Some(body)).await
}

#[tokio::test]
async fn create_session_returns_the_prompt_view() {
    let app = create_test_app().await;

    let (status, body) = create_session(
        &app,
        json!({
            "student_id": "stu-1",
            "subject": "mathsGame",
            "game": "operations",
            "period": 1,
            "operation": "addition",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["session_id"].is_string());
    assert_eq!(body["session"]["phase"], "awaiting_input");
    assert_eq!(body["session"]["prompt"]["display"]["kind"], "arithmetic");
    assert_eq!(body["session"]["prompt"]["display"]["operation"], "addition");
    // The draft starts with an empty result slot.
    assert_eq!(body["session"]["draft"]["texts"]["result"], "");
}

#[tokio::test]
async fn out_of_range_period_is_rejected_as_invalid_configuration() {
    let app = create_test_app().await;

    let (status, body) = create_session(
        &app,
        json!({
            "student_id": "stu-1",
            "subject": "mathsGame",
            "game": "operations",
            "period": 4,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("invalid configuration"));
}

#[tokio::test]
async fn unknown_session_is_404() {
    let app = create_test_app().await;
    let (status, _) = request_json(&app.router, "GET", "/api/v1/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn arithmetic_round_trip_counts_attempts_and_celebrates_once() {
    let app = create_test_app().await;

    let (_, created) = create_session(
        &app,
        json!({
            "student_id": "stu-2",
            "subject": "mathsGame",
            "game": "operations",
            "period": 1,
            "operation": "soustraction",
        }),
    )
    .await;
    let session_id = created["session_id"].as_str().unwrap().to_string();

    let left = created["session"]["prompt"]["display"]["left"].as_i64().unwrap();
    let right = created["session"]["prompt"]["display"]["right"]
        .as_i64()
        .unwrap();
    let answer = left - right;

    // Wrong on purpose first.
    let (status, _) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/text"),
        Some(json!({ "slot": "result", "text": (answer + 1).to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, verdict) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/submit"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verdict["correct"], false);
    assert_eq!(verdict["celebrate"], false);
    assert_eq!(app.celebrations.load(Ordering::SeqCst), 0);

    // Then the right answer.
    request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/text"),
        Some(json!({ "slot": "result", "text": answer.to_string() })),
    )
    .await;
    let (_, verdict) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/submit"),
        None,
    )
    .await;
    assert_eq!(verdict["correct"], true);
    assert_eq!(verdict["celebrate"], true);
    assert_eq!(app.celebrations.load(Ordering::SeqCst), 1);

    // The dashboard read path sees one correct and one incorrect submit.
    let (status, stats) = request_json(
        &app.router,
        "GET",
        "/stats/students/stu-2?period=1&subject=mathsGame",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["operations"]["correctCount"], 1);
    assert_eq!(stats["operations"]["incorrectCount"], 1);

    // Same numbers straight from the store.
    let key = ecole_api::models::answer::AttemptKey {
        student_id: "stu-2".to_string(),
        period: 1,
        subject: ecole_api::models::content::Subject::Maths,
        game: ecole_api::models::content::GameKind::Operations,
    };
    let counters = app.stats.counters(&key);
    assert_eq!(counters.correct_count, 1);
    assert_eq!(counters.incorrect_count, 1);
}

#[tokio::test]
async fn malformed_number_is_a_400_and_records_nothing() {
    let app = create_test_app().await;

    let (_, created) = create_session(
        &app,
        json!({
            "student_id": "stu-3",
            "subject": "mathsGame",
            "game": "operations",
            "period": 1,
        }),
    )
    .await;
    let session_id = created["session_id"].as_str().unwrap();

    request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/text"),
        Some(json!({ "slot": "result", "text": "douze" })),
    )
    .await;
    let (status, body) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/submit"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Veuillez entrer un nombre valide.");

    let (_, stats) = request_json(
        &app.router,
        "GET",
        "/stats/students/stu-3?period=1&subject=mathsGame",
        None,
    )
    .await;
    assert_eq!(stats, json!({}));
    assert_eq!(app.celebrations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ordering_game_is_solvable_through_moves() {
    let app = create_test_app().await;

    let (_, created) = create_session(
        &app,
        json!({
            "student_id": "stu-4",
            "subject": "mathsGame",
            "game": "ordre",
            "period": 2,
        }),
    )
    .await;
    let session_id = created["session_id"].as_str().unwrap().to_string();
    let display = &created["session"]["prompt"]["display"];
    assert_eq!(display["kind"], "ordering");

    let mut cards: Vec<(String, i64)> = display["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| {
            (
                card["id"].as_str().unwrap().to_string(),
                card["value"].as_i64().unwrap(),
            )
        })
        .collect();
    cards.sort_by_key(|(_, value)| *value);
    if display["direction"] == "desc" {
        cards.reverse();
    }

    // Walk the sorted order into the sequence slot position by position.
    for (position, (id, _)) in cards.iter().enumerate() {
        let (status, _) = request_json(
            &app.router,
            "POST",
            &format!("/api/v1/sessions/{session_id}/moves"),
            Some(json!({
                "source": "sequence",
                "dest": "sequence",
                "item": id,
                "position": position,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, verdict) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/submit"),
        None,
    )
    .await;
    assert_eq!(verdict["correct"], true);
}

#[tokio::test]
async fn celebration_window_locks_out_moves_then_a_fresh_round_arrives() {
    let app = create_test_app().await;

    let (_, created) = create_session(
        &app,
        json!({
            "student_id": "stu-5",
            "subject": "mathsGame",
            "game": "operations",
            "period": 1,
        }),
    )
    .await;
    let session_id = created["session_id"].as_str().unwrap().to_string();
    let first_prompt_id = created["session"]["prompt"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let left = created["session"]["prompt"]["display"]["left"].as_i64().unwrap();
    let right = created["session"]["prompt"]["display"]["right"]
        .as_i64()
        .unwrap();

    request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/text"),
        Some(json!({ "slot": "result", "text": (left + right).to_string() })),
    )
    .await;
    let (_, verdict) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/submit"),
        None,
    )
    .await;
    assert_eq!(verdict["correct"], true);

    // Still celebrating: interaction and resubmits are refused.
    let (status, _) = request_json(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{session_id}/text"),
        Some(json!({ "slot": "result", "text": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // After the delay the session is back on a brand-new prompt.
    let mut fresh = serde_json::Value::Null;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let (_, view) = request_json(
            &app.router,
            "GET",
            &format!("/api/v1/sessions/{session_id}"),
            None,
        )
        .await;
        if view["phase"] == "awaiting_input" {
            fresh = view;
            break;
        }
    }
    assert_eq!(fresh["phase"], "awaiting_input");
    assert_ne!(fresh["prompt"]["id"].as_str().unwrap(), first_prompt_id);
    assert_eq!(fresh["draft"]["texts"]["result"], "");
}

#[tokio::test]
async fn abandoned_sessions_disappear() {
    let app = create_test_app().await;

    let (_, created) = create_session(
        &app,
        json!({
            "student_id": "stu-6",
            "subject": "englishGame",
            "game": "relier",
            "period": 1,
        }),
    )
    .await;
    let session_id = created["session_id"].as_str().unwrap();
    assert_eq!(created["session"]["prompt"]["display"]["kind"], "pairing");

    let (status, _) = request_json(
        &app.router,
        "DELETE",
        &format!("/api/v1/sessions/{session_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request_json(
        &app.router,
        "GET",
        &format!("/api/v1/sessions/{session_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
