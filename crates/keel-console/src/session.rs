//! Login sessions as explicit values.
//!
//! # Purpose
//! Authenticates against the directory service and hands back a [`Session`]
//! the caller owns and passes on. There is no ambient current-user state:
//! whoever composes the application decides where the session lives and which
//! clients receive it.
use crate::config::ConsoleConfig;
use crate::error::ConsoleResult;
use crate::http::ApiClient;
use crate::types::UserRecord;
use serde::{Deserialize, Serialize};

/// An authenticated session: the bearer token and the user it belongs to.
/// Immutable; a role change requires logging in again.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}

impl Session {
    /// The role string routing logic keys on.
    pub fn role(&self) -> keel_authz::Role {
        self.user.role
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: UserRecord,
}

/// Client for the token endpoints.
pub struct AuthClient {
    config: ConsoleConfig,
    api: ApiClient,
}

impl AuthClient {
    pub fn new(config: ConsoleConfig) -> ConsoleResult<Self> {
        let api = ApiClient::new(&config)?;
        Ok(Self { config, api })
    }

    /// Exchange credentials for a session. On failure nothing is retained.
    pub async fn login(&self, username: &str, password: &str) -> ConsoleResult<Session> {
        let response: LoginResponse = self
            .api
            .post("/v1/auth/token", &LoginRequest { username, password })
            .await?;
        tracing::debug!(username, "directory login succeeded");
        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    /// Re-fetch the session's user from the service.
    pub async fn current_user(&self, session: &Session) -> ConsoleResult<UserRecord> {
        let api = ApiClient::new(&self.config)?.with_token(&session.token);
        api.get("/v1/users/me").await
    }

    /// Consume the session and revoke its token. Revocation is best-effort:
    /// the session is gone locally regardless of the server's answer.
    pub async fn logout(&self, session: Session) -> ConsoleResult<()> {
        let api = ApiClient::new(&self.config)?.with_token(&session.token);
        let result = api.post_empty("/v1/auth/logout").await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "token revocation failed");
        }
        result
    }
}
