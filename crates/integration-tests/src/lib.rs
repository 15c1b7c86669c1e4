//! Integration test harness for Shop Copilot.
//!
//! Each test starts the real admin router on an ephemeral port, wired to
//! two in-process stand-ins:
//! - a Shopify Admin GraphQL endpoint
//! - a chat completion endpoint
//!
//! Both stand-ins answer every POST with a canned reply and record what they
//! received, so tests can assert on the exact upstream traffic.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-copilot-integration-tests
//! ```

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde_json::Value;
use shop_copilot_admin::{
    completion::CompletionClient,
    config::{AppConfig, OpenAIConfig, ShopifyAdminConfig, ShopifyAppConfig},
    shopify::AdminClient,
    state::AppState,
};
use sha2::Sha256;
use url::Url;

pub const STORE_DOMAIN: &str = "hydra-goods.myshopify.com";
pub const CUSTOM_DOMAIN: &str = "shop.hydragoods.com";
pub const API_SECRET: &str = "test-app-secret";
pub const ACCESS_TOKEN: &str = "shpat_integration_test";
pub const OPENAI_KEY: &str = "sk-integration-test";

const GRAPHQL_PATH: &str = "/admin/api/2025-01/graphql.json";

/// A canned upstream reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    #[must_use]
    pub const fn status(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

/// A request received by a stand-in upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct UpstreamState {
    reply: Reply,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A running stand-in upstream.
pub struct FakeUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeUpstream {
    /// Start a stand-in answering POST `path` with `reply`.
    pub async fn start(path: &str, reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(path, post(record_and_reply))
            .with_state(UpstreamState {
                reply,
                requests: Arc::clone(&requests),
            });

        let addr = serve(router).await;
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }
}

async fn record_and_reply(
    State(state): State<UpstreamState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(Recorded { headers, body });
    (state.reply.status, Json(state.reply.body))
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

/// The admin app under test plus its upstream stand-ins.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub shopify: FakeUpstream,
    pub openai: FakeUpstream,
}

impl TestApp {
    /// Start the app with the given canned upstream replies.
    pub async fn start(shopify_reply: Reply, openai_reply: Reply) -> Self {
        shop_copilot_admin::install_crypto_provider();

        let shopify = FakeUpstream::start(GRAPHQL_PATH, shopify_reply).await;
        let openai = FakeUpstream::start("/chat/completions", openai_reply).await;

        let config = test_config(&openai.base_url);
        let admin_client = AdminClient::with_endpoint(
            format!("{}{GRAPHQL_PATH}", shopify.base_url),
            SecretString::from(ACCESS_TOKEN),
        );
        let completion_client =
            CompletionClient::new(&config.openai).expect("Failed to build completion client");
        let state = AppState::from_parts(config, admin_client, completion_client);

        let addr = serve(shop_copilot_admin::app(state)).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            shopify,
            openai,
        }
    }

    /// Absolute URL for a path on the app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn test_config(openai_base_url: &str) -> AppConfig {
    AppConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        app: ShopifyAppConfig {
            api_key: "test-client-id".to_string(),
            api_secret: SecretString::from(API_SECRET),
            scopes: vec!["read_products".to_string(), "write_products".to_string()],
            app_url: Url::parse("https://copilot.example.com").expect("app url"),
            custom_domain: Some(CUSTOM_DOMAIN.to_string()),
        },
        shopify: ShopifyAdminConfig {
            store_domain: STORE_DOMAIN.to_string(),
            api_version: "2025-01".to_string(),
            access_token: SecretString::from(ACCESS_TOKEN),
        },
        openai: OpenAIConfig {
            api_key: SecretString::from(OPENAI_KEY),
            model: "gpt-4".to_string(),
            base_url: openai_base_url.to_string(),
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build a launch query string signed the way Shopify signs it.
#[must_use]
pub fn signed_launch_query(shop: &str, secret: &str) -> String {
    signed_launch_query_at(shop, secret, unix_now())
}

/// Like [`signed_launch_query`], signed at an explicit Unix `timestamp`.
#[must_use]
pub fn signed_launch_query_at(shop: &str, secret: &str, timestamp: u64) -> String {
    let message = format!("host=YWRtaW4uc2hvcGlmeS5jb20&shop={shop}&timestamp={timestamp}");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(message.as_bytes());
    let hmac = hex::encode(mac.finalize().into_bytes());
    format!("{message}&hmac={hmac}")
}

/// Current Unix time in seconds.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs()
}

/// A GraphQL `products` reply with the given `(id, title, vendor)` nodes.
#[must_use]
pub fn products_reply(products: &[(&str, &str, &str)]) -> Reply {
    let edges: Vec<Value> = products
        .iter()
        .map(|(id, title, vendor)| {
            serde_json::json!({
                "node": {
                    "id": id,
                    "title": title,
                    "vendor": vendor,
                    "handle": title.to_lowercase().replace(' ', "-"),
                    "tags": [],
                }
            })
        })
        .collect();
    Reply::ok(serde_json::json!({ "data": { "products": { "edges": edges } } }))
}

/// A chat completion reply whose first choice says `content`.
#[must_use]
pub fn completion_reply(content: &str) -> Reply {
    Reply::ok(serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}
