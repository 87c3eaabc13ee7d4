use std::future::Future;

use kuy_dashboard_core::{Entity, EntityKey};

use crate::error::BackendError;
use crate::upload::Attachment;

/// The remote collection behind one entity type.
///
/// Uses RPITIT for async methods, avoiding the `async-trait` crate.
pub trait RemoteResource: Send + Sync {
    /// The collection path, e.g. `/api/blogs`. Used in error context.
    fn endpoint(&self) -> &str;

    /// Fetch the whole collection.
    fn list(&self) -> impl Future<Output = Result<Vec<Entity>, BackendError>> + Send;

    /// Create an entity. Returns the server's copy, which carries the key.
    fn create(&self, draft: &Entity) -> impl Future<Output = Result<Entity, BackendError>> + Send;

    /// Update the entity at `key`.
    ///
    /// With attachments the request is sent as multipart form data.
    /// Returns `None` when the server answers with an empty body.
    fn update(
        &self,
        key: &EntityKey,
        draft: &Entity,
        attachments: &[Attachment],
    ) -> impl Future<Output = Result<Option<Entity>, BackendError>> + Send;

    /// Delete the entity at `key`. The response body is ignored.
    fn delete(&self, key: &EntityKey) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything; used for `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time verification of the trait bounds.
    fn _assert_remote_resource_send_sync<T: RemoteResource>() {}
    fn _assert_confirm_send_sync<T: Confirm>() {}

    #[test]
    fn closures_confirm() {
        let decline = |_: &str| false;
        assert!(!decline.confirm("Hapus?"));
        assert!(AssumeYes.confirm("Hapus?"));
    }
}
