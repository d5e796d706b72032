#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use ttobak_billing::{PolarClient, PolarConfig};
use ttobak_entitlement::{EntitlementEvaluator, EntitlementPolicy};
use ttobak_server::{build_router, AppState, SupabaseAuth, SupabaseConfig, DEVICE_ID_HEADER};
use ttobak_store::RecordDb;
use ttobak_transform::{GeneratorConfig, OpenAiGenerator, Transformer};
use ttobak_types::{DeviceId, UserId};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GOOD_TOKEN: &str = "good-token";
pub const USER_ID: &str = "00000000-0000-4000-8000-000000000042";

/// A running API server with every upstream mocked.
pub struct TestServer {
    pub base: String,
    pub db: RecordDb,
    pub client: reqwest::Client,
    pub openai: MockServer,
    pub polar: MockServer,
    pub supabase: MockServer,
}

pub fn user_id() -> UserId {
    UserId::parse(USER_ID).unwrap()
}

/// Spin up the HTTP server on an OS-assigned port with the default policy.
pub async fn spawn_test_server() -> TestServer {
    spawn_with_policy(EntitlementPolicy::default()).await
}

pub async fn spawn_with_policy(policy: EntitlementPolicy) -> TestServer {
    spawn_with(policy, RecordDb::open_in_memory().unwrap()).await
}

/// Spin up the HTTP server over an already opened record database.
pub async fn spawn_with(policy: EntitlementPolicy, db: RecordDb) -> TestServer {
    let openai = MockServer::start().await;
    let polar = MockServer::start().await;
    let supabase = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {GOOD_TOKEN}").as_str()))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "user@example.com",
            "aud": "authenticated"
        })))
        .mount(&supabase)
        .await;

    let generator = OpenAiGenerator::new(GeneratorConfig {
        base_url: format!("{}/v1", openai.uri()),
        api_key: "sk-test".to_string(),
        ..Default::default()
    })
    .unwrap();
    let billing = PolarClient::new(PolarConfig {
        api_base_url: polar.uri(),
        access_token: Some("polar_oat_test".to_string()),
        product_id: Some("prod_123".to_string()),
        discount_code: None,
        app_base_url: "https://ttobak.example".to_string(),
    });
    let auth = SupabaseAuth::new(SupabaseConfig {
        url: Some(supabase.uri()),
        anon_key: Some("anon-key".to_string()),
    });

    let state = Arc::new(AppState::new(
        db.clone(),
        EntitlementEvaluator::new(policy),
        Transformer::new(Arc::new(generator)),
        billing,
        auth,
    ));
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        db,
        client: reqwest::Client::new(),
        openai,
        polar,
        supabase,
    }
}

/// Mounts a completion reply, expected exactly `times` times.
pub async fn mock_completion(server: &TestServer, content: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .expect(times)
        .mount(&server.openai)
        .await;
}

/// Who a request is sent as.
#[derive(Clone, Copy)]
pub enum Caller<'a> {
    Nobody,
    Device(&'a DeviceId),
    Token(&'a str),
}

impl TestServer {
    fn with_caller(&self, req: reqwest::RequestBuilder, caller: Caller<'_>) -> reqwest::RequestBuilder {
        match caller {
            Caller::Nobody => req,
            Caller::Device(id) => req.header(DEVICE_ID_HEADER, id.to_string()),
            Caller::Token(token) => req.bearer_auth(token),
        }
    }

    pub async fn get(&self, route: &str, caller: Caller<'_>) -> (u16, Value) {
        let req = self.client.get(format!("{}{}", self.base, route));
        send(self.with_caller(req, caller)).await
    }

    pub async fn post(&self, route: &str, caller: Caller<'_>, body: Value) -> (u16, Value) {
        let req = self.client.post(format!("{}{}", self.base, route)).json(&body);
        send(self.with_caller(req, caller)).await
    }

    pub async fn transform(&self, caller: Caller<'_>, text: &str, mode: &str) -> (u16, Value) {
        self.post("/api/transform", caller, json!({ "text": text, "mode": mode }))
            .await
    }
}

async fn send(req: reqwest::RequestBuilder) -> (u16, Value) {
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}
