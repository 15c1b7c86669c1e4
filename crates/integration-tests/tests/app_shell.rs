//! Integration tests for the app shell and embedding headers.

use reqwest::StatusCode;
use serde_json::json;
use shop_copilot_integration_tests::{
    API_SECRET, CUSTOM_DOMAIN, Reply, STORE_DOMAIN, TestApp, completion_reply,
    signed_launch_query,
};

async fn start() -> TestApp {
    TestApp::start(Reply::ok(json!({ "data": null })), completion_reply("unused")).await
}

#[tokio::test]
async fn test_health() {
    let app = start().await;

    let resp = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to get /health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_root_redirects_to_app_with_query() {
    let app = start().await;
    let query = signed_launch_query(STORE_DOMAIN, API_SECRET);

    let resp = app
        .client
        .get(app.url(&format!("/?{query}")))
        .send()
        .await
        .expect("Failed to get /");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    assert_eq!(location, format!("/app?{query}"));
}

#[tokio::test]
async fn test_app_home_renders_navigation() {
    let app = start().await;
    let query = signed_launch_query(STORE_DOMAIN, API_SECRET);

    let resp = app
        .client
        .get(app.url(&format!("/app?{query}")))
        .send()
        .await
        .expect("Failed to get /app");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains(r#"href="/ai""#));
    assert!(body.contains(r#"href="/products""#));
    assert!(body.contains(r#"name="shopify-api-key" content="test-client-id""#));
    assert!(body.contains(STORE_DOMAIN));
}

#[tokio::test]
async fn test_app_home_rejects_bad_signature() {
    let app = start().await;
    let query = signed_launch_query(STORE_DOMAIN, "wrong-secret");

    let resp = app
        .client
        .get(app.url(&format!("/app?{query}")))
        .send()
        .await
        .expect("Failed to get /app");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_documents_allow_shopify_framing() {
    let app = start().await;

    for path in ["/app", "/ai", "/health"] {
        let resp = app
            .client
            .get(app.url(path))
            .send()
            .await
            .expect("Failed to get page");

        let csp = resp
            .headers()
            .get("content-security-policy")
            .and_then(|v| v.to_str().ok())
            .expect("csp header")
            .to_string();
        assert_eq!(
            csp,
            format!(
                "frame-ancestors https://{STORE_DOMAIN} https://{CUSTOM_DOMAIN} https://admin.shopify.com;"
            ),
            "path {path}"
        );
        assert_eq!(
            resp.headers()
                .get("x-content-type-options")
                .and_then(|v| v.to_str().ok()),
            Some("nosniff")
        );
    }
}
