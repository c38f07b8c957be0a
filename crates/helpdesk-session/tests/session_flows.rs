use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_api::{
    ApiError, ApiGateway, ApiRequest, ApiResponse, HttpMethod, HttpTransport, MemoryTokenStore,
    SignUpRequest, TokenStore, UpdateProfileRequest,
};
use helpdesk_core::Role;
use helpdesk_session::SessionStore;
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct StubTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl StubTransport {
    async fn push_response(&self, status: u16, body: serde_json::Value) {
        self.responses.lock().await.push_back(ApiResponse {
            status,
            body: body.to_string(),
        });
    }

    async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        responses.pop_front().ok_or_else(|| {
            ApiError::Transport("stub transport has no more queued responses".to_owned())
        })
    }
}

struct Harness {
    transport: Arc<StubTransport>,
    tokens: Arc<MemoryTokenStore>,
    store: SessionStore,
}

fn harness() -> Harness {
    let transport = Arc::new(StubTransport::default());
    let tokens = Arc::new(MemoryTokenStore::default());
    let gateway = ApiGateway::with_parts(
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
    );
    Harness {
        transport,
        tokens,
        store: SessionStore::new(Arc::new(gateway)),
    }
}

fn user_json(name: &str) -> serde_json::Value {
    json!({
        "id": "u1",
        "email": "ana@hospital.example",
        "name": name,
        "role": "usuario",
        "sector": "Enfermagem"
    })
}

#[tokio::test]
async fn sign_in_resolves_the_identity_through_the_fresh_token() {
    let harness = harness();
    harness
        .transport
        .push_response(200, json!({ "token": "jwt-1", "user": user_json("Ana") }))
        .await;
    harness.transport.push_response(200, user_json("Ana")).await;

    let mut watcher = harness.store.subscribe();
    let user = harness
        .store
        .sign_in("ana@hospital.example", "pw", None)
        .await
        .expect("sign in");
    assert_eq!(user.as_ref().map(|user| user.name.as_str()), Some("Ana"));
    assert_eq!(harness.store.current(), user);

    assert!(watcher.has_changed().expect("watch channel open"));
    assert_eq!(
        watcher
            .borrow_and_update()
            .as_ref()
            .map(|user| user.id.clone()),
        Some("u1".to_owned())
    );

    let requests = harness.transport.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/auth/login");
    assert_eq!(requests[0].token, None);
    assert_eq!(requests[1].path, "/auth/me");
    assert_eq!(requests[1].method, HttpMethod::Get);
    assert_eq!(requests[1].token, Some("jwt-1".to_owned()));
}

#[tokio::test]
async fn sign_up_signs_in_without_repeating_the_role_hint() {
    let harness = harness();
    harness.transport.push_response(201, json!({})).await;
    harness
        .transport
        .push_response(200, json!({ "token": "jwt-1", "user": user_json("Ana") }))
        .await;
    harness.transport.push_response(200, user_json("Ana")).await;

    let user = harness
        .store
        .sign_up(SignUpRequest {
            email: "ana@hospital.example".to_owned(),
            password: "pw".to_owned(),
            name: "Ana".to_owned(),
            role: Role::Requester,
            sector: Some("Enfermagem".to_owned()),
        })
        .await
        .expect("sign up");
    assert!(user.is_some());

    let requests = harness.transport.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].path, "/auth/signup");
    assert_eq!(requests[1].path, "/auth/login");
    let login_body = requests[1].body.as_ref().expect("login body");
    assert!(login_body.get("role").is_none());
    assert_eq!(requests[2].path, "/auth/me");
}

#[tokio::test]
async fn refresh_treats_a_rejected_token_as_signed_out_but_keeps_it() {
    let harness = harness();
    harness.tokens.save("jwt-stale").expect("seed token");
    harness
        .transport
        .push_response(401, json!({ "error": "Não autenticado" }))
        .await;

    let user = harness.store.refresh().await.expect("401 is signed out");
    assert_eq!(user, None);
    assert_eq!(harness.store.current(), None);
    assert_eq!(
        harness.tokens.load().expect("load token"),
        Some("jwt-stale".to_owned())
    );
}

#[tokio::test]
async fn refresh_failure_broadcasts_signed_out_and_propagates() {
    let harness = harness();
    harness
        .transport
        .push_response(200, json!({ "token": "jwt-1", "user": user_json("Ana") }))
        .await;
    harness.transport.push_response(200, user_json("Ana")).await;
    harness
        .store
        .sign_in("ana@hospital.example", "pw", None)
        .await
        .expect("sign in");
    assert!(harness.store.current().is_some());

    harness
        .transport
        .push_response(500, json!({ "error": "Falha interna" }))
        .await;
    let error = harness
        .store
        .refresh()
        .await
        .expect_err("server failure propagates");
    assert_eq!(error, ApiError::server(500, "Falha interna"));
    assert_eq!(harness.store.current(), None);
}

#[tokio::test]
async fn sign_out_clears_the_token_and_the_broadcast_identity() {
    let harness = harness();
    harness
        .transport
        .push_response(200, json!({ "token": "jwt-1", "user": user_json("Ana") }))
        .await;
    harness.transport.push_response(200, user_json("Ana")).await;
    harness
        .store
        .sign_in("ana@hospital.example", "pw", None)
        .await
        .expect("sign in");

    harness.store.sign_out().await.expect("sign out");
    assert_eq!(harness.store.current(), None);
    assert_eq!(harness.tokens.load().expect("load token"), None);
    assert_eq!(harness.transport.requests().await.len(), 2);
}

#[tokio::test]
async fn update_profile_broadcasts_updated_claims_and_rotated_token() {
    let harness = harness();
    harness.tokens.save("jwt-old").expect("seed token");
    harness
        .transport
        .push_response(
            200,
            json!({ "token": "jwt-new", "user": user_json("Ana Souza") }),
        )
        .await;

    let updated = harness
        .store
        .update_profile(UpdateProfileRequest {
            name: Some("Ana Souza".to_owned()),
            sector: None,
        })
        .await
        .expect("update profile");
    assert_eq!(updated.name, "Ana Souza");
    assert_eq!(
        harness.store.current().map(|user| user.name),
        Some("Ana Souza".to_owned())
    );
    assert_eq!(
        harness.tokens.load().expect("load token"),
        Some("jwt-new".to_owned())
    );
}

#[tokio::test]
async fn initialize_swallows_startup_failures() {
    let harness = harness();
    harness
        .transport
        .push_response(500, json!({ "error": "Falha interna" }))
        .await;

    harness.store.initialize().await;
    assert_eq!(harness.store.current(), None);
}
