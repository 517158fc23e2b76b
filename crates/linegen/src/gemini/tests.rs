use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use rizzroast_model::RoastLevel;
use serde_json::{json, Value};

use super::*;

const OK_RESPONSE: &str = r#"{
    "candidates": [
        {
            "content": {
                "parts": [{ "text": "You're the *reason* the sun sets early.\n" }],
                "role": "model"
            },
            "finishReason": "STOP"
        }
    ]
}"#;

#[test]
fn extract_first_candidate() {
    assert_eq!(
        extract_line(OK_RESPONSE).unwrap(),
        "You're the *reason* the sun sets early."
    );
}

#[test]
fn extract_missing_candidate() {
    for body in [
        r#"{}"#,
        r#"{"candidates": []}"#,
        r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
        r#"{"candidates": [{"content": {"parts": []}}]}"#,
        r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
    ] {
        assert!(
            matches!(extract_line(body), Err(GenerationError::MissingCandidate)),
            "{body}"
        );
    }
}

#[test]
fn extract_malformed() {
    assert!(matches!(
        extract_line("<html>502</html>"),
        Err(GenerationError::MalformedResponse(_))
    ));
}

async fn fake_gemini(
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    if query.contains_key("key") {
        return (StatusCode::BAD_REQUEST, "key in url".into());
    }
    if headers.get("x-goog-api-key").map(|v| v.as_bytes()) != Some(b"secret".as_slice()) {
        return (StatusCode::FORBIDDEN, "bad key".into());
    }
    if call != "gemini-test:generateContent" {
        return (StatusCode::NOT_FOUND, call);
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let text = if prompt.contains("Roast level: Savage") {
        "savage roast"
    } else {
        "smooth line"
    };
    let response = json!({"candidates": [{"content": {"parts": [{"text": text}]}}]});
    (StatusCode::OK, response.to_string())
}

async fn spawn_fake_gemini() -> String {
    let app = Router::new().route("/models/{call}", post(fake_gemini));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}/")
}

fn client(endpoint: String, api_key: &str) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        endpoint,
        model: "gemini-test".into(),
        api_key: api_key.into(),
    })
}

#[tokio::test]
async fn generate_against_fake_endpoint() {
    let endpoint = spawn_fake_gemini().await;
    let gemini = client(endpoint, "secret");
    assert_eq!(
        gemini.generate(GenerationMode::Pickup, "cats").await.unwrap(),
        "smooth line"
    );
    assert_eq!(
        gemini
            .generate(GenerationMode::Roast(RoastLevel::Savage), "cats")
            .await
            .unwrap(),
        "savage roast"
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let endpoint = spawn_fake_gemini().await;
    let gemini = client(endpoint, "wrong");
    match gemini.generate(GenerationMode::Pickup, "cats").await {
        Err(GenerationError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "bad key");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_skips_request() {
    let gemini = client("http://127.0.0.1:9".into(), "");
    assert!(matches!(
        gemini.generate(GenerationMode::Pickup, "cats").await,
        Err(GenerationError::MissingApiKey)
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let gemini = client(format!("http://{addr}"), "secret");
    assert!(matches!(
        gemini.generate(GenerationMode::Pickup, "cats").await,
        Err(GenerationError::Transport(_))
    ));
}

#[tokio::test]
async fn transport_error_does_not_reveal_api_key() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let gemini = client(format!("http://{addr}"), "TOPSECRETKEY");
    let err = gemini
        .generate(GenerationMode::Pickup, "cats")
        .await
        .unwrap_err();
    assert!(!err.to_string().contains("TOPSECRETKEY"), "{err}");
    assert!(!format!("{err:?}").contains("TOPSECRETKEY"), "{err:?}");
}
