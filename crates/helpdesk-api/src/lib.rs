//! Typed client for the hospital helpdesk HTTP API.

pub mod gateway;
pub mod interface;
pub mod token;
pub mod transport;

pub use gateway::{ApiGateway, GatewayConfig, ENV_API_URL, ENV_TOKEN_PATH};
pub use interface::{
    ApiError, LoginResponse, ProfileResponse, SignUpRequest, UpdateProfileRequest,
    GENERIC_API_ERROR,
};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_STORAGE_KEY};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestHttpTransport};
