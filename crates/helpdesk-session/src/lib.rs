//! Session state shared between the gateway and the user-facing app.
//!
//! Holds the authenticated user behind a watch channel so callers can
//! read the current identity or observe sign-in and sign-out
//! transitions without polling the API.

use std::sync::Arc;

use helpdesk_api::{ApiError, ApiGateway, SignUpRequest, UpdateProfileRequest};
use helpdesk_core::{Role, User};
use tokio::sync::watch;
use tracing::warn;

pub struct SessionStore {
    api: Arc<ApiGateway>,
    current: watch::Sender<Option<User>>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiGateway>) -> Self {
        let (current, _) = watch::channel(None);
        Self { api, current }
    }

    pub fn api(&self) -> &ApiGateway {
        &self.api
    }

    /// Restores a previously persisted session at startup. Failures are
    /// logged and leave the store signed out; the persisted token is
    /// kept so a later `refresh` can retry.
    pub async fn initialize(&self) {
        if let Err(error) = self.refresh().await {
            warn!(error = %error, "failed to restore helpdesk session");
        }
    }

    /// Re-resolves the current identity from the server and broadcasts
    /// the outcome. An expired or missing token resolves to a signed-out
    /// state, not an error.
    pub async fn refresh(&self) -> Result<Option<User>, ApiError> {
        match self.api.get_me().await {
            Ok(user) => {
                self.current.send_replace(user.clone());
                Ok(user)
            }
            Err(error) => {
                self.current.send_replace(None);
                Err(error)
            }
        }
    }

    /// Signs in and re-resolves the identity through the freshly
    /// persisted token before broadcasting it.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Option<User>, ApiError> {
        self.api.sign_in(email, password, role).await?;
        self.refresh().await
    }

    /// Registers and immediately signs in with the same credentials.
    /// The follow-up sign-in carries no role hint; the server already
    /// knows the role it just stored.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<Option<User>, ApiError> {
        let email = request.email.clone();
        let password = request.password.clone();
        self.api.sign_up(request).await?;
        self.sign_in(&email, &password, None).await
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.api.sign_out().await?;
        self.current.send_replace(None);
        Ok(())
    }

    /// Updates the profile and broadcasts the server's updated claims.
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, ApiError> {
        let user = self.api.update_me(request).await?;
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    pub fn current(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}
