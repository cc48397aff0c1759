//! Integration tests for the voice-platform webhook and the health check.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use voicelink_server::config::Config;

const REQUIRED_PHRASES: &str = "\
welcome_message=Welcome\n\
resume_message=Back again\n\
processing_message=Working on it\n\
followup_question=Anything else?\n\
help_message=Ask me anything\n\
exit_messages=Bye\n\
error_message=Something went wrong\n\
timeout_message=The backend took too long\n";

fn test_app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    let locale_dir = dir.path().join("locale");
    std::fs::create_dir(&locale_dir).unwrap();
    std::fs::write(locale_dir.join("en-US.lang"), REQUIRED_PHRASES).unwrap();

    let mut config = Config::default();
    config.skill.locale_dir = locale_dir.to_str().unwrap().to_string();

    let state = voicelink_server::build_state(&config).unwrap();
    (dir, voicelink_server::app(state))
}

fn skill_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/skill")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn launch_envelope(user: &str) -> Value {
    json!({
        "version": "1.0",
        "session": {"sessionId": "sess-1", "new": true},
        "context": {"system": {"user": {"userId": user, "accessToken": "tok"}}},
        "request": {"type": "LaunchRequest", "locale": "en-US"}
    })
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn launch_webhook_speaks_the_welcome_phrase() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(skill_request(launch_envelope("user-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["version"], "1.0");
    assert_eq!(body["response"]["outputSpeech"]["type"], "PlainText");
    assert_eq!(body["response"]["outputSpeech"]["text"], "Welcome");
    assert_eq!(body["response"]["shouldEndSession"], false);

    // Same user, same day: the resume phrase.
    let response = app
        .oneshot(skill_request(launch_envelope("user-1")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["response"]["outputSpeech"]["text"], "Back again");
}

#[tokio::test]
async fn stop_intent_ends_the_session_over_http() {
    let (_dir, app) = test_app();

    let envelope = json!({
        "version": "1.0",
        "context": {"system": {"user": {"userId": "user-1", "accessToken": "tok"}}},
        "request": {
            "type": "IntentRequest",
            "locale": "en-US",
            "intent": {"name": "AMAZON.StopIntent"}
        }
    });
    let response = app.oneshot(skill_request(envelope)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"]["outputSpeech"]["text"], "Bye");
    assert_eq!(body["response"]["shouldEndSession"], true);
}
