//! Authentication against the audio list backend

use crate::error::ClientResult;
use crate::http::Backend;
use callscribe_core::types::User;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: User,
}

/// An authenticated backend session
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token issued at login
    pub token: String,
    /// The authenticated user
    pub user: User,
}

impl Session {
    /// Exchange credentials for a session token
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the credentials or the
    /// request fails.
    #[instrument(skip(backend, password), fields(email = %email))]
    pub async fn login(backend: &Backend, email: &str, password: &str) -> ClientResult<Self> {
        let response: LoginResponse = backend
            .post("/auth/login", &LoginRequest { email, password })
            .await?;

        info!(user_id = response.user.id, "Logged in");
        Ok(Self {
            token: response.token,
            user: response.user,
        })
    }

    /// Whether the session belongs to an administrator
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Clone `backend` with this session's token attached
    #[must_use]
    pub fn authorize(&self, backend: &Backend) -> Backend {
        backend.clone().with_token(&self.token)
    }
}
