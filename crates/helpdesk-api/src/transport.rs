use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

use crate::interface::ApiError;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestHttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim().to_owned();
        if base_url.is_empty() {
            return Err(ApiError::Configuration(
                "helpdesk API base URL cannot be empty.".to_owned(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .user_agent("helpdesk/api-gateway")
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|error| {
                ApiError::Configuration(format!("failed to build helpdesk HTTP client: {error}"))
            })?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let suffix = path.trim_start_matches('/');
        format!("{base}/{suffix}")
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, self.endpoint(&request.path));
        if let Some(token) = request.token.as_deref() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|error| {
            ApiError::Transport(format!(
                "{} {} failed: {error}",
                request.method.as_str(),
                request.path
            ))
        })?;

        let status = response.status().as_u16();
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            status,
            "helpdesk API call completed"
        );
        let body = response.text().await.map_err(|error| {
            ApiError::Transport(format!(
                "{} {} response read failed: {error}",
                request.method.as_str(),
                request.path
            ))
        })?;

        Ok(ApiResponse { status, body })
    }
}
