//! REST plumbing for the Kuy Point admin dashboard.
//!
//! [`ApiClient`] talks to the dashboard API, [`HttpResource`] exposes one
//! collection as a [`RemoteResource`], and [`EntityController`] keeps a
//! page's authoritative and filtered collections in step with it.

pub mod auth;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod traits;
pub mod upload;

pub use auth::{AuthError, Session, LOGIN_PATH, PROFILE_PATH};
pub use controller::{ControllerError, EntityController, DELETE_PROMPT};
pub use dashboard::{transaction_total, DashboardSummary, OverviewPoint, DASHBOARD_PATH};
pub use error::BackendError;
pub use http::{ApiClient, HttpResource, DEFAULT_BASE_URL};
pub use traits::{AssumeYes, Confirm, RemoteResource};
pub use upload::{Attachment, ImageUploader};
