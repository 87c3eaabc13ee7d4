use std::fmt;

use kuy_dashboard_core::EntityKey;

/// Errors from talking to the remote REST API.
///
/// Uses `String` for external error details to keep `Clone` + `Eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    /// The request never produced a response (DNS, refused, timeout).
    Transport { message: String },
    /// HTTP 404.
    NotFound {
        resource: String,
        key: Option<String>,
    },
    /// HTTP 409.
    Conflict { message: String },
    /// HTTP 401 or 403.
    Unauthorized { message: String },
    /// Any other non-2xx status.
    Rejected { status: u16, message: String },
    /// The response body could not be decoded.
    Decode { message: String },
    /// A created entity came back without a resolvable key.
    MissingKey { kind: String },
}

impl BackendError {
    /// Classifies a non-2xx status. `message` is the server's explanation,
    /// already extracted from the body.
    pub fn from_status(
        status: u16,
        message: String,
        resource: &str,
        key: Option<&EntityKey>,
    ) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { message },
            404 => Self::NotFound {
                resource: resource.to_string(),
                key: key.map(|k| k.to_string()),
            },
            409 => Self::Conflict { message },
            _ => Self::Rejected { status, message },
        }
    }

    /// True for failures where no response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The HTTP status behind this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "connection error: {message}"),
            Self::NotFound {
                resource,
                key: Some(key),
            } => write!(f, "'{key}' not found in '{resource}'"),
            Self::NotFound {
                resource,
                key: None,
            } => write!(f, "'{resource}' not found"),
            Self::Conflict { message } => write!(f, "conflict: {message}"),
            Self::Unauthorized { message } => write!(f, "unauthorized: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "request rejected ({status}): {message}")
            }
            Self::Decode { message } => write!(f, "invalid response body: {message}"),
            Self::MissingKey { kind } => {
                write!(f, "server returned a {kind} entity without a key")
            }
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let cases = vec![
            (
                BackendError::Transport {
                    message: "connection refused".into(),
                },
                "connection error: connection refused",
            ),
            (
                BackendError::NotFound {
                    resource: "/api/blogs".into(),
                    key: Some("b1".into()),
                },
                "'b1' not found in '/api/blogs'",
            ),
            (
                BackendError::Conflict {
                    message: "email taken".into(),
                },
                "conflict: email taken",
            ),
            (
                BackendError::Unauthorized {
                    message: "token expired".into(),
                },
                "unauthorized: token expired",
            ),
            (
                BackendError::Rejected {
                    status: 500,
                    message: "boom".into(),
                },
                "request rejected (500)",
            ),
            (
                BackendError::Decode {
                    message: "expected array".into(),
                },
                "invalid response body",
            ),
            (
                BackendError::MissingKey {
                    kind: "pickups".into(),
                },
                "server returned a pickups entity without a key",
            ),
        ];

        for (error, expected_prefix) in cases {
            let msg = error.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error display for {error:?} = '{msg}', expected to start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn status_classification() {
        let key = EntityKey::new("7");
        assert!(matches!(
            BackendError::from_status(403, "no".into(), "/api/points", None),
            BackendError::Unauthorized { .. }
        ));
        assert_eq!(
            BackendError::from_status(404, String::new(), "/api/points", Some(&key)),
            BackendError::NotFound {
                resource: "/api/points".into(),
                key: Some("7".into())
            }
        );
        assert!(matches!(
            BackendError::from_status(409, "dup".into(), "/api/points", None),
            BackendError::Conflict { .. }
        ));
        assert_eq!(
            BackendError::from_status(422, "bad".into(), "/api/points", None).status(),
            Some(422)
        );
    }

    #[test]
    fn transport_has_no_status() {
        let err = BackendError::Transport {
            message: "timeout".into(),
        };
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BackendError::Conflict {
            message: "x".into(),
        });
        assert!(err.to_string().contains("conflict"));
    }
}
