//! Integration tests for the description generator.
//!
//! Covers both entry points: the JSON relay at `/api/generate-description`
//! and the server-rendered form at `/ai`.

use reqwest::StatusCode;
use serde_json::{Value, json};
use shop_copilot_integration_tests::{OPENAI_KEY, Reply, TestApp, completion_reply};

fn unused_shopify() -> Reply {
    Reply::ok(json!({ "data": null }))
}

// ============================================================================
// JSON relay
// ============================================================================

#[tokio::test]
async fn test_generate_description_returns_first_choice() {
    let app = TestApp::start(unused_shopify(), completion_reply("Stay hydrated sustainably.")).await;

    let resp = app
        .client
        .post(app.url("/api/generate-description"))
        .json(&json!({ "prompt": "eco-friendly water bottle" }))
        .send()
        .await
        .expect("Failed to call generate-description");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({ "result": "Stay hydrated sustainably." }));
}

#[tokio::test]
async fn test_generate_description_forwards_prompt_and_model() {
    let app = TestApp::start(unused_shopify(), completion_reply("ok")).await;

    app.client
        .post(app.url("/api/generate-description"))
        .json(&json!({ "prompt": "eco-friendly water bottle" }))
        .send()
        .await
        .expect("Failed to call generate-description");

    let requests = app.openai.requests();
    assert_eq!(requests.len(), 1);
    let sent = requests.first().expect("one request");
    assert_eq!(
        sent.body,
        json!({
            "model": "gpt-4",
            "messages": [{ "role": "user", "content": "eco-friendly water bottle" }]
        })
    );
    assert_eq!(
        sent.headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some(format!("Bearer {OPENAI_KEY}").as_str())
    );
}

#[tokio::test]
async fn test_generate_description_missing_choices_omits_result() {
    let app = TestApp::start(unused_shopify(), Reply::ok(json!({ "id": "chatcmpl-test" }))).await;

    let resp = app
        .client
        .post(app.url("/api/generate-description"))
        .json(&json!({ "prompt": "Describe a candle" }))
        .send()
        .await
        .expect("Failed to call generate-description");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({}));
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_generate_description_upstream_error_omits_result() {
    let app = TestApp::start(
        unused_shopify(),
        Reply::status(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "message": "The server had an error", "type": "server_error" } }),
        ),
    )
    .await;

    let resp = app
        .client
        .post(app.url("/api/generate-description"))
        .json(&json!({ "prompt": "Describe a candle" }))
        .send()
        .await
        .expect("Failed to call generate-description");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({}));
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_generate_description_requires_prompt() {
    let app = TestApp::start(unused_shopify(), completion_reply("unused")).await;

    let resp = app
        .client
        .post(app.url("/api/generate-description"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to call generate-description");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.openai.requests().is_empty());
}

// ============================================================================
// Generator page
// ============================================================================

#[tokio::test]
async fn test_ai_page_renders_form() {
    let app = TestApp::start(unused_shopify(), completion_reply("unused")).await;

    let resp = app
        .client
        .get(app.url("/ai"))
        .send()
        .await
        .expect("Failed to get /ai");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains(r#"name="prompt""#));
    assert!(body.contains("AI Generator"));
    assert!(!body.contains("Generated Description"));
}

#[tokio::test]
async fn test_ai_page_shows_generated_text() {
    let app = TestApp::start(unused_shopify(), completion_reply("Stay hydrated sustainably.")).await;

    let resp = app
        .client
        .post(app.url("/ai"))
        .form(&[("prompt", "eco-friendly water bottle")])
        .send()
        .await
        .expect("Failed to post /ai");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Generated Description"));
    assert!(body.contains("Stay hydrated sustainably."));
    assert!(body.contains("eco-friendly water bottle"));
}

#[tokio::test]
async fn test_ai_page_notice_when_no_text() {
    let app = TestApp::start(
        unused_shopify(),
        Reply::ok(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] })),
    )
    .await;

    let resp = app
        .client
        .post(app.url("/ai"))
        .form(&[("prompt", "Describe a candle")])
        .send()
        .await
        .expect("Failed to post /ai");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("returned no text"));
    assert!(!body.contains("Generated Description"));
}

#[tokio::test]
async fn test_ai_page_upstream_error_is_bad_gateway() {
    let app = TestApp::start(
        unused_shopify(),
        Reply::status(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }),
        ),
    )
    .await;

    let resp = app
        .client
        .post(app.url("/ai"))
        .form(&[("prompt", "Describe a candle")])
        .send()
        .await
        .expect("Failed to post /ai");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.expect("body");
    assert!(body.contains("could not be generated"));
    assert!(!body.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_ai_page_requires_prompt() {
    let app = TestApp::start(unused_shopify(), completion_reply("unused")).await;

    let resp = app
        .client
        .post(app.url("/ai"))
        .form(&[("other", "value")])
        .send()
        .await
        .expect("Failed to post /ai");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.openai.requests().is_empty());
}
