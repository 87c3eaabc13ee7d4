use std::fmt;

use kuy_dashboard_core::Entity;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::http::ApiClient;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Signed-in admin profile endpoint.
pub const PROFILE_PATH: &str = "/api/user/profile";

/// A bearer token plus the account it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<Entity>,
}

impl Session {
    /// Display name of the signed-in account, if the server sent one.
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref()?.get("name")?.as_str()
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Errors that can occur while signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    /// Email or password was empty.
    MissingCredentials,
    /// The server refused the credentials.
    InvalidCredentials { reason: String },
    /// The login request itself failed.
    Remote(BackendError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "email and password are required"),
            Self::InvalidCredentials { reason } => write!(f, "login failed: {reason}"),
            Self::Remote(err) => write!(f, "login request failed: {err}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl ApiClient {
    /// Exchanges credentials for a [`Session`].
    ///
    /// 400, 401 and 403 answers are reported as invalid credentials with
    /// the server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let request = self
            .request(Method::POST, LOGIN_PATH)
            .json(&LoginRequest { email, password });
        let response = match self.send(request, LOGIN_PATH, None).await {
            Ok(response) => response,
            Err(BackendError::Unauthorized { message })
            | Err(BackendError::Rejected {
                status: 400,
                message,
            }) => {
                tracing::warn!(email, "login refused");
                return Err(AuthError::InvalidCredentials { reason: message });
            }
            Err(err) => return Err(AuthError::Remote(err)),
        };

        let session: Session = self.decode_json(response).await.map_err(AuthError::Remote)?;
        tracing::info!(email, "signed in");
        Ok(session)
    }

    /// Fetches the signed-in admin's profile.
    pub async fn profile(&self) -> Result<Entity, BackendError> {
        self.get_json(PROFILE_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_decodes_login_response() {
        let session: Session = serde_json::from_value(json!({
            "token": "abc",
            "user": {"name": "Admin Kuy", "email": "admin@kuy.id"}
        }))
        .unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user_name(), Some("Admin Kuy"));
    }

    #[test]
    fn session_without_user() {
        let session: Session = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert_eq!(session.user_name(), None);
    }

    #[test]
    fn auth_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials {
                reason: "Password salah".into()
            }
            .to_string(),
            "login failed: Password salah"
        );
        assert!(AuthError::MissingCredentials.to_string().contains("required"));
    }
}
