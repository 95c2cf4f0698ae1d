//! Session context: login, current-user lookup, and the bearer token.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/auth/login` | Exchange login/password for a token |
//! | GET    | `/auth/me` | Resolve the token to a user profile |
//!
//! A [`Session`] is created by [`AuthClient::login`] (or rebuilt from stored
//! parts) and torn down by dropping it; the token is zeroized on drop. A 401
//! from any call surfaces as [`ApiError::Unauthorized`] so the caller can
//! discard the session.

use std::fmt;

use fabrika_core::Role;
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::ApiError;
use crate::{check_status, endpoint_url};

/// Login credentials. The password is wiped from memory on drop.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The signed-in manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// An authenticated session: bearer token plus the user it belongs to.
///
/// Custom `Debug` implementation redacts the token.
#[derive(Clone)]
pub struct Session {
    token: Zeroizing<String>,
    pub user: UserProfile,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Rebuild a session from a stored token and profile.
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            user,
        }
    }

    /// The bearer token.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Whether the signed-in user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user_data: UserProfile,
}

/// Client for the `/auth` endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Sign in.
    ///
    /// Calls `POST {base_url}/auth/login`. Wrong credentials come back as
    /// [`ApiError::Unauthorized`] carrying the backend's message.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let endpoint = "POST /auth/login";
        let url = endpoint_url(&self.base_url, &["auth", "login"], endpoint)?;

        tracing::debug!(login = %credentials.login, "signing in");
        let resp = self
            .http
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        let resp = check_status(resp, endpoint).await?;

        let body: LoginResponse = resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        tracing::info!(login = %body.user_data.login, role = %body.user_data.role, "signed in");
        Ok(Session::new(body.token, body.user_data))
    }

    /// Resolve the session's token to the current user profile.
    ///
    /// Calls `GET {base_url}/auth/me` with the bearer token. An expired or
    /// revoked token yields [`ApiError::Unauthorized`].
    pub async fn me(&self, session: &Session) -> Result<UserProfile, ApiError> {
        let endpoint = "GET /auth/me";
        let url = endpoint_url(&self.base_url, &["auth", "me"], endpoint)?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;
        let resp = check_status(resp, endpoint).await?;

        resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            login: "ivanov".to_string(),
            manager_name: Some("Иванов".to_string()),
            role: Role::Admin,
        }
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = Session::new("secret-token-value", profile());
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("[REDACTED]"));
        assert!(session.is_admin());
        assert_eq!(session.token(), "secret-token-value");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("ivanov", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("ivanov"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn credentials_serialize_as_login_body() {
        let creds = Credentials::new("ivanov", "hunter2");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({ "login": "ivanov", "password": "hunter2" }));
    }

    #[test]
    fn profile_role_defaults_to_user() {
        let user: UserProfile = serde_json::from_value(serde_json::json!({ "login": "petrov" })).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.manager_name, None);
    }
}
