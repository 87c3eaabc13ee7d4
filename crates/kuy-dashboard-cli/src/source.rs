//! Where each dashboard page gets its rows.
//!
//! Most kinds are plain REST collections. The transactions table is read
//! out of the dashboard summary and the profile page is a single object;
//! both are read-only.

use kuy_dashboard_backend::{
    transaction_total, ApiClient, Attachment, BackendError, HttpResource, RemoteResource,
};
use kuy_dashboard_core::{Entity, EntityKey};
use serde_json::json;

#[derive(Debug, Clone)]
pub enum PageSource {
    Collection(HttpResource),
    Transactions(ApiClient),
    Profile(ApiClient),
}

impl PageSource {
    pub fn for_kind(kind: &str, endpoint: &str, client: &ApiClient) -> Self {
        match kind {
            "transactions" => Self::Transactions(client.clone()),
            "profile" => Self::Profile(client.clone()),
            _ => Self::Collection(client.resource(endpoint)),
        }
    }

    pub fn is_read_only(&self) -> bool {
        !matches!(self, Self::Collection(_))
    }

    fn read_only(&self) -> BackendError {
        BackendError::Rejected {
            status: 405,
            message: format!("{} is read-only", self.endpoint()),
        }
    }
}

/// Adds the computed `total_harga` column to a transaction row.
pub fn with_total(transaction: Entity) -> Entity {
    let total = transaction_total(&transaction);
    transaction.with("total_harga", json!(total))
}

impl RemoteResource for PageSource {
    fn endpoint(&self) -> &str {
        match self {
            Self::Collection(resource) => resource.endpoint(),
            Self::Transactions(_) => kuy_dashboard_backend::DASHBOARD_PATH,
            Self::Profile(_) => kuy_dashboard_backend::PROFILE_PATH,
        }
    }

    async fn list(&self) -> Result<Vec<Entity>, BackendError> {
        match self {
            Self::Collection(resource) => resource.list().await,
            Self::Transactions(client) => {
                let summary = client.dashboard().await?;
                Ok(summary.transactions.into_iter().map(with_total).collect())
            }
            Self::Profile(client) => Ok(vec![client.profile().await?]),
        }
    }

    async fn create(&self, draft: &Entity) -> Result<Entity, BackendError> {
        match self {
            Self::Collection(resource) => resource.create(draft).await,
            _ => Err(self.read_only()),
        }
    }

    async fn update(
        &self,
        key: &EntityKey,
        draft: &Entity,
        attachments: &[Attachment],
    ) -> Result<Option<Entity>, BackendError> {
        match self {
            Self::Collection(resource) => resource.update(key, draft, attachments).await,
            _ => Err(self.read_only()),
        }
    }

    async fn delete(&self, key: &EntityKey) -> Result<(), BackendError> {
        match self {
            Self::Collection(resource) => resource.delete(key).await,
            _ => Err(self.read_only()),
        }
    }
}
