use std::path::PathBuf;
use std::sync::Arc;

use helpdesk_core::{Role, Status, Ticket, TicketDraft, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::interface::{
    ApiError, LoginResponse, ProfileResponse, SignUpRequest, UpdateProfileRequest,
    GENERIC_API_ERROR,
};
use crate::token::{FileTokenStore, TokenStore, TOKEN_STORAGE_KEY};
use crate::transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestHttpTransport};

const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const ENV_API_URL: &str = "HELPDESK_API_URL";
pub const ENV_TOKEN_PATH: &str = "HELPDESK_TOKEN_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_url: String,
    pub token_path: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token_path: PathBuf::from(TOKEN_STORAGE_KEY),
        }
    }
}

impl GatewayConfig {
    pub fn from_settings(
        api_url: impl Into<String>,
        token_path: impl Into<PathBuf>,
    ) -> Result<Self, ApiError> {
        let api_url = api_url.into().trim().to_owned();
        let api_url = if api_url.is_empty() {
            DEFAULT_API_URL.to_owned()
        } else {
            api_url
        };
        let token_path = token_path.into();
        if token_path.as_os_str().is_empty() {
            return Err(ApiError::Configuration(
                "helpdesk token path cannot be empty.".to_owned(),
            ));
        }
        Ok(Self {
            api_url,
            token_path,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let api_url = std::env::var(ENV_API_URL).unwrap_or_default();
        let token_path = std::env::var(ENV_TOKEN_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(TOKEN_STORAGE_KEY));
        Self::from_settings(api_url, token_path)
    }
}

/// Stateless translation layer between typed operations and the remote
/// helpdesk HTTP API. Every authenticated call reads the token store;
/// tokens are written only on sign-in and profile rotation and cleared
/// on sign-out.
pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, ApiError> {
        let transport = ReqwestHttpTransport::new(config.api_url.as_str())?;
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(FileTokenStore::new(config.token_path)),
        ))
    }

    pub fn with_parts(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// Registers a new identity. Registration alone does not
    /// authenticate; callers follow up with `sign_in`.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<(), ApiError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::Validation(
                "Email e senha são obrigatórios".to_owned(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("Nome é obrigatório".to_owned()));
        }

        let body = serde_json::to_value(&request).map_err(|error| {
            ApiError::Transport(format!("failed to encode signup payload: {error}"))
        })?;
        let response = self
            .transport
            .execute(ApiRequest {
                method: HttpMethod::Post,
                path: "/auth/signup".to_owned(),
                token: None,
                body: Some(body),
            })
            .await?;
        ensure_success(&response)?;
        Ok(())
    }

    /// Exchanges credentials for a token, persists it, and returns the
    /// authenticated user. The optional role hint lets the server
    /// reject a requester logging in through the technician form.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email e senha são obrigatórios".to_owned(),
            ));
        }

        let mut body = json!({ "email": email, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        let response = self
            .transport
            .execute(ApiRequest {
                method: HttpMethod::Post,
                path: "/auth/login".to_owned(),
                token: None,
                body: Some(body),
            })
            .await?;
        let login: LoginResponse = decode_success(&response)?;
        self.tokens.save(&login.token)?;
        Ok(login.user)
    }

    /// Discards the persisted token. Succeeds even when no session
    /// exists.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.tokens.clear()
    }

    /// Resolves the current identity. A 401 means "no session", not an
    /// error; everything else propagates.
    pub async fn get_me(&self) -> Result<Option<User>, ApiError> {
        let response = self.authorized(HttpMethod::Get, "/auth/me", None).await?;
        if response.status == 401 {
            return Ok(None);
        }
        decode_success(&response).map(Some)
    }

    /// Updates the current user's profile. The server may rotate the
    /// token alongside the updated claims; the rotated token is
    /// persisted when present.
    pub async fn update_me(&self, request: UpdateProfileRequest) -> Result<User, ApiError> {
        let body = serde_json::to_value(&request).map_err(|error| {
            ApiError::Transport(format!("failed to encode profile payload: {error}"))
        })?;
        let response = self
            .authorized(HttpMethod::Put, "/auth/me", Some(body))
            .await?;
        let profile: ProfileResponse = decode_success(&response)?;
        if let Some(token) = profile
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            self.tokens.save(token)?;
        }
        Ok(profile.user)
    }

    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        let response = self.authorized(HttpMethod::Get, "/tickets", None).await?;
        decode_success(&response)
    }

    /// Creates a ticket from a draft. The title is derived client-side
    /// and the status is always forced to open; the returned entity is
    /// the server's confirmation, never a local echo.
    pub async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, ApiError> {
        if draft.description.trim().is_empty() {
            return Err(ApiError::Validation(
                "Informe a descrição do chamado".to_owned(),
            ));
        }

        let mut payload = json!({
            "title": draft.derived_title(),
            "description": draft.description,
            "category": draft.category,
            "priority": draft.priority,
            "location": draft.location,
            "requester_name": draft.requester_name,
            "status": Status::Open,
        });
        if let Some(sector) = draft
            .requester_sector
            .as_deref()
            .map(str::trim)
            .filter(|sector| !sector.is_empty())
        {
            payload["requester_sector"] = json!(sector);
        }
        if let Some(responsible) = draft.responsible_name.as_deref() {
            payload["responsible_name"] = json!(responsible);
        }

        let response = self
            .authorized(HttpMethod::Post, "/tickets", Some(payload))
            .await?;
        decode_success(&response)
    }

    /// Technician-only on the server side; the client performs no
    /// transition precondition check of its own.
    pub async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: Status,
    ) -> Result<Ticket, ApiError> {
        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return Err(ApiError::Validation(
                "Informe o identificador do chamado".to_owned(),
            ));
        }

        let response = self
            .authorized(
                HttpMethod::Patch,
                &format!("/ticket/{ticket_id}/status"),
                Some(json!({ "status": status })),
            )
            .await?;
        decode_success(&response)
    }

    async fn authorized(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.tokens.load()?;
        self.transport
            .execute(ApiRequest {
                method,
                path: path.to_owned(),
                token,
                body,
            })
            .await
    }
}

fn ensure_success(response: &ApiResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::server(
        response.status,
        server_message(&response.body),
    ))
}

fn decode_success<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    ensure_success(response)?;
    serde_json::from_str(&response.body).map_err(|error| {
        ApiError::Transport(format!("helpdesk API response was malformed JSON: {error}"))
    })
}

/// Server messages arrive as structured `{"error": ...}` JSON, plain
/// text, or nothing at all; each shape degrades to the next.
fn server_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed
            .error
            .map(|message| message.trim().to_owned())
            .filter(|message| !message.is_empty())
        {
            return message;
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        GENERIC_API_ERROR.to_owned()
    } else {
        raw.to_owned()
    }
}
