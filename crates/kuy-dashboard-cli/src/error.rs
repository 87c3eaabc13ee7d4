use std::path::PathBuf;

use kuy_dashboard_backend::{AuthError, BackendError, ControllerError};
use kuy_dashboard_core::{FieldErrors, FormError, SchemaError};

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / configuration
/// - 3: validation failure (missing required fields, bad option values)
/// - 10+: remote API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ValidationError = 3,
    ConnectionError = 10,
    RemoteRejected = 11,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Remote API errors.
    #[error("API error: {0}")]
    Backend(#[from] BackendError),

    /// Sign-in failures.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Built-in schema failed to build.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Bad `--set` assignment or value.
    #[error("{0}")]
    Form(#[from] FormError),

    /// Required fields missing after all input was gathered.
    #[error("validation failed: {errors}")]
    Validation { errors: FieldErrors },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Entity kind not in the catalog.
    #[error("unknown entity kind '{kind}' (expected one of: {expected})")]
    UnknownKind { kind: String, expected: String },

    /// Key not present in the fetched collection.
    #[error("{kind} '{key}' not found")]
    EntityNotFound { kind: String, key: String },

    /// Kind does not support the requested operation.
    #[error("{kind} is read-only")]
    ReadOnly { kind: String },

    /// Another mutation of this key is running.
    #[error("'{key}' is busy; try again")]
    Busy { key: String },

    /// User cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Non-TTY requires --yes for destructive operations.
    #[error("delete requires --yes in non-interactive mode")]
    RequiresConfirmation,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<ControllerError> for CliError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Remote(e) => Self::Backend(e),
            ControllerError::Busy { key } => Self::Busy {
                key: key.to_string(),
            },
            ControllerError::Cancelled => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

fn backend_exit_code(err: &BackendError) -> ExitCode {
    if err.is_transport() {
        ExitCode::ConnectionError
    } else if err.status().is_some() {
        ExitCode::RemoteRejected
    } else {
        ExitCode::GeneralError
    }
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Backend(e) => backend_exit_code(e),
            Self::Auth(AuthError::MissingCredentials) => ExitCode::InvalidArguments,
            Self::Auth(AuthError::InvalidCredentials { .. }) => ExitCode::RemoteRejected,
            Self::Auth(AuthError::Remote(e)) => backend_exit_code(e),
            Self::Form(FormError::InvalidAssignment(_) | FormError::UnknownField(_)) => {
                ExitCode::InvalidArguments
            }
            Self::Form(_) | Self::Validation { .. } => ExitCode::ValidationError,
            Self::Config { .. } | Self::UnknownKind { .. } | Self::RequiresConfirmation => {
                ExitCode::InvalidArguments
            }
            Self::Auth(_)
            | Self::Schema(_)
            | Self::Io { .. }
            | Self::EntityNotFound { .. }
            | Self::ReadOnly { .. }
            | Self::Busy { .. }
            | Self::Cancelled
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Validation { errors } => {
                let fields: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|(field, message)| {
                        serde_json::json!({ "field": field.as_str(), "message": message })
                    })
                    .collect();
                serde_json::json!({
                    "error": "validation_error",
                    "fields": fields,
                })
            }
            Self::Backend(e) => serde_json::json!({
                "error": "api_error",
                "status": e.status(),
                "message": e.to_string(),
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
