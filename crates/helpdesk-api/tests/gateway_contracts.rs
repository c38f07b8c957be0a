use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::{Role, TicketDraft};
use helpdesk_api::{
    ApiError, ApiGateway, ApiRequest, ApiResponse, HttpTransport, MemoryTokenStore,
    SignUpRequest, TokenStore,
};

/// Transport that fails every call; contract checks below must reject
/// invalid input before anything reaches the wire.
#[derive(Debug, Default)]
struct UnreachableTransport;

#[async_trait]
impl HttpTransport for UnreachableTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        panic!("request should not have been dispatched: {request:?}");
    }
}

fn offline_gateway(tokens: Arc<MemoryTokenStore>) -> ApiGateway {
    ApiGateway::with_parts(Arc::new(UnreachableTransport), tokens as Arc<dyn TokenStore>)
}

#[tokio::test]
async fn gateway_rejects_invalid_input_before_dispatch() {
    let gateway = offline_gateway(Arc::new(MemoryTokenStore::default()));

    let blank_credentials = gateway
        .sign_in("   ", "", None)
        .await
        .expect_err("blank credentials should be rejected");
    assert!(matches!(blank_credentials, ApiError::Validation(_)));

    let blank_name = gateway
        .sign_up(SignUpRequest {
            email: "ana@hospital.example".to_owned(),
            password: "pw".to_owned(),
            name: "   ".to_owned(),
            role: Role::Requester,
            sector: None,
        })
        .await
        .expect_err("blank name should be rejected");
    assert!(matches!(blank_name, ApiError::Validation(_)));

    let blank_description = gateway
        .create_ticket(TicketDraft {
            description: "   \n  ".to_owned(),
            ..TicketDraft::default()
        })
        .await
        .expect_err("blank description should be rejected");
    assert!(matches!(blank_description, ApiError::Validation(_)));

    let blank_ticket_id = gateway
        .update_ticket_status("  ", helpdesk_core::Status::Resolved)
        .await
        .expect_err("blank ticket id should be rejected");
    assert!(matches!(blank_ticket_id, ApiError::Validation(_)));
}

#[tokio::test]
async fn sign_out_never_touches_the_network_and_is_idempotent() {
    let tokens = Arc::new(MemoryTokenStore::default());
    tokens.save("jwt-token").expect("seed token");
    let gateway = offline_gateway(Arc::clone(&tokens));

    gateway.sign_out().await.expect("sign out");
    assert_eq!(tokens.load().expect("load token"), None);

    gateway.sign_out().await.expect("second sign out");
    assert_eq!(tokens.load().expect("load token"), None);
}
