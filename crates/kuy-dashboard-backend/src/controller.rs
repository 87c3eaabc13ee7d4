//! Entity controller: the authoritative and filtered collections of one
//! entity type, kept in step with the remote resource.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! await. A mutation for key K marks K as in flight for its whole duration;
//! a second update or delete of K fails fast with [`ControllerError::Busy`].

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kuy_dashboard_core::{
    filter, ColumnDescriptor, CardSection, Draft, Entity, EntityKey, EntitySchema, SearchState,
};

use crate::error::BackendError;
use crate::traits::{Confirm, RemoteResource};
use crate::upload::Attachment;

/// Prompt shown before a delete.
pub const DELETE_PROMPT: &str = "Apakah Anda yakin ingin menghapus data ini?";

/// Errors surfaced by controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControllerError {
    /// The remote call failed; local state is unchanged.
    Remote(BackendError),
    /// Another mutation of the same key is still in flight.
    Busy { key: EntityKey },
    /// The user declined the confirmation.
    Cancelled,
    /// The page was left; the result was dropped.
    Detached,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(err) => write!(f, "{err}"),
            Self::Busy { key } => write!(f, "'{key}' is already being saved"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Detached => write!(f, "view was closed before the response arrived"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for ControllerError {
    fn from(err: BackendError) -> Self {
        Self::Remote(err)
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    collection: Vec<Entity>,
    filtered: Vec<Entity>,
    search: SearchState,
    in_flight: HashSet<EntityKey>,
}

impl ControllerState {
    fn refilter(&mut self) {
        self.filtered = filter(&self.collection, &self.search).into_owned();
    }
}

/// Releases an in-flight key on drop, whatever the outcome.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    key: EntityKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.key);
    }
}

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns one entity type's collections and mediates every mutation.
pub struct EntityController<R> {
    schema: Arc<EntitySchema>,
    resource: R,
    state: Mutex<ControllerState>,
    detached: AtomicBool,
}

impl<R: RemoteResource> EntityController<R> {
    pub fn new(schema: Arc<EntitySchema>, resource: R) -> Self {
        Self {
            schema,
            resource,
            state: Mutex::new(ControllerState::default()),
            detached: AtomicBool::new(false),
        }
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.schema.columns()
    }

    pub fn card_sections(&self) -> &[CardSection] {
        self.schema.card_sections()
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Last server-confirmed collection.
    pub fn collection(&self) -> Vec<Entity> {
        lock(&self.state).collection.clone()
    }

    /// The collection narrowed by the current search.
    pub fn filtered(&self) -> Vec<Entity> {
        lock(&self.state).filtered.clone()
    }

    pub fn search_state(&self) -> SearchState {
        lock(&self.state).search.clone()
    }

    /// Finds an entity of the authoritative collection by key.
    pub fn find(&self, key: &EntityKey) -> Option<Entity> {
        lock(&self.state)
            .collection
            .iter()
            .find(|e| self.schema.key_of(e).as_ref() == Some(key))
            .cloned()
    }

    /// Marks the view as gone; later `load` results are dropped.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Fetches the collection. On failure the last known state is kept.
    pub async fn load(&self) -> Result<usize, ControllerError> {
        let result = self.resource.list().await;
        if self.is_detached() {
            tracing::debug!(kind = %self.schema.kind, "dropping load result for detached view");
            return Err(ControllerError::Detached);
        }
        match result {
            Ok(entities) => {
                let mut state = lock(&self.state);
                state.collection = entities;
                state.refilter();
                tracing::info!(
                    kind = %self.schema.kind,
                    total = state.collection.len(),
                    shown = state.filtered.len(),
                    "collection loaded"
                );
                Ok(state.collection.len())
            }
            Err(err) => {
                tracing::warn!(kind = %self.schema.kind, error = %err, "load failed");
                Err(err.into())
            }
        }
    }

    /// Stores the search and recomputes the filtered collection.
    /// Returns the number of entities shown.
    pub fn search(&self, search: SearchState) -> usize {
        let mut state = lock(&self.state);
        state.search = search;
        state.refilter();
        state.filtered.len()
    }

    /// Creates an entity and appends the server's copy.
    pub async fn create(&self, draft: &Draft) -> Result<Entity, ControllerError> {
        let created = self.resource.create(draft.as_entity()).await.map_err(|err| {
            tracing::warn!(kind = %self.schema.kind, error = %err, "create failed");
            err
        })?;
        let Some(key) = self.schema.key_of(&created) else {
            return Err(BackendError::MissingKey {
                kind: self.schema.kind.to_string(),
            }
            .into());
        };

        let mut state = lock(&self.state);
        match self.position(&state.collection, &key) {
            Some(i) => state.collection[i] = created.clone(),
            None => state.collection.push(created.clone()),
        }
        state.refilter();
        tracing::info!(kind = %self.schema.kind, %key, "entity created");
        Ok(created)
    }

    /// Updates the entity at `key`. The local copy becomes the existing
    /// attributes merged with the server's answer, or with the draft when
    /// the server answers with an empty body.
    pub async fn update(
        &self,
        key: &EntityKey,
        draft: &Draft,
        attachments: &[Attachment],
    ) -> Result<Entity, ControllerError> {
        let _in_flight = self.begin(key)?;
        let returned = self
            .resource
            .update(key, draft.as_entity(), attachments)
            .await
            .map_err(|err| {
                tracing::warn!(kind = %self.schema.kind, %key, error = %err, "update failed");
                err
            })?;
        let patch = returned.unwrap_or_else(|| draft.as_entity().clone());

        let mut state = lock(&self.state);
        let updated = match self.position(&state.collection, key) {
            Some(i) => {
                let merged = state.collection[i].merged(&patch);
                state.collection[i] = merged.clone();
                merged
            }
            None => patch,
        };
        state.refilter();
        tracing::info!(kind = %self.schema.kind, %key, "entity updated");
        Ok(updated)
    }

    /// Deletes the entity at `key` after `confirm` agrees.
    pub async fn delete<C>(&self, key: &EntityKey, confirm: &C) -> Result<(), ControllerError>
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(DELETE_PROMPT) {
            return Err(ControllerError::Cancelled);
        }
        let _in_flight = self.begin(key)?;
        self.resource.delete(key).await.map_err(|err| {
            tracing::warn!(kind = %self.schema.kind, %key, error = %err, "delete failed");
            err
        })?;

        let mut state = lock(&self.state);
        state
            .collection
            .retain(|e| self.schema.key_of(e).as_ref() != Some(key));
        state.refilter();
        tracing::info!(kind = %self.schema.kind, %key, "entity deleted");
        Ok(())
    }

    fn position(&self, entities: &[Entity], key: &EntityKey) -> Option<usize> {
        entities
            .iter()
            .position(|e| self.schema.key_of(e).as_ref() == Some(key))
    }

    fn begin(&self, key: &EntityKey) -> Result<InFlight<'_>, ControllerError> {
        let mut state = lock(&self.state);
        if !state.in_flight.insert(key.clone()) {
            return Err(ControllerError::Busy { key: key.clone() });
        }
        Ok(InFlight {
            state: &self.state,
            key: key.clone(),
        })
    }
}

impl<R> fmt::Debug for EntityController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityController")
            .field("kind", &self.schema.kind)
            .field("detached", &self.detached.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::AssumeYes;
    use kuy_dashboard_core::{ColumnKey, SearchField};
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn schema() -> Arc<EntitySchema> {
        Arc::new(
            EntitySchema::builder("points", "id")
                .column(ColumnDescriptor::text(ColumnKey::new("id").unwrap(), "ID"))
                .column(ColumnDescriptor::text(ColumnKey::new("name").unwrap(), "Nama").required())
                .build()
                .unwrap(),
        )
    }

    fn entity(v: Value) -> Entity {
        Entity::from_value(v).unwrap()
    }

    #[derive(Default)]
    struct FakeResource {
        rows: Mutex<Vec<Entity>>,
        fail_with: Mutex<Option<BackendError>>,
        update_reply: Mutex<Option<Option<Entity>>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeResource {
        fn with_rows(rows: Vec<Value>) -> Self {
            Self {
                rows: Mutex::new(rows.into_iter().map(entity).collect()),
                ..Default::default()
            }
        }

        fn fail(&self, err: BackendError) {
            *self.fail_with.lock().unwrap() = Some(err);
        }

        fn check(&self) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl RemoteResource for FakeResource {
        fn endpoint(&self) -> &str {
            "/api/points"
        }

        async fn list(&self) -> Result<Vec<Entity>, BackendError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, draft: &Entity) -> Result<Entity, BackendError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let created = draft.with("id", json!(rows.len() + 100));
            rows.push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            _key: &EntityKey,
            draft: &Entity,
            _attachments: &[Attachment],
        ) -> Result<Option<Entity>, BackendError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.check()?;
            let reply = self.update_reply.lock().unwrap().clone();
            Ok(reply.unwrap_or_else(|| Some(draft.clone())))
        }

        async fn delete(&self, _key: &EntityKey) -> Result<(), BackendError> {
            self.check()
        }
    }

    fn two_rows() -> FakeResource {
        FakeResource::with_rows(vec![
            json!({"id": 1, "name": "Agus"}),
            json!({"id": 2, "name": "Budi"}),
        ])
    }

    fn ids(entities: &[Entity]) -> Vec<i64> {
        entities
            .iter()
            .filter_map(|e| e.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[tokio::test]
    async fn load_replaces_both_collections() {
        let controller = EntityController::new(schema(), two_rows());
        assert_eq!(controller.load().await.unwrap(), 2);
        assert_eq!(ids(&controller.collection()), vec![1, 2]);
        assert_eq!(ids(&controller.filtered()), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_first_load_leaves_empty_state() {
        let resource = two_rows();
        resource.fail(BackendError::Transport {
            message: "refused".into(),
        });
        let controller = EntityController::new(schema(), resource);
        let err = controller.load().await.unwrap_err();
        assert!(matches!(err, ControllerError::Remote(BackendError::Transport { .. })));
        assert!(controller.collection().is_empty());
        assert!(controller.filtered().is_empty());
    }

    #[tokio::test]
    async fn search_is_reapplied_after_load() {
        let controller = EntityController::new(schema(), two_rows());
        controller.search(SearchState::new("budi").in_field(SearchField::All));
        controller.load().await.unwrap();
        assert_eq!(ids(&controller.filtered()), vec![2]);
        assert_eq!(controller.search(SearchState::default()), 2);
    }

    #[tokio::test]
    async fn delete_success_removes_from_both() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        controller.delete(&EntityKey::new("1"), &AssumeYes).await.unwrap();
        assert_eq!(ids(&controller.collection()), vec![2]);
        assert_eq!(ids(&controller.filtered()), vec![2]);
    }

    #[tokio::test]
    async fn delete_failure_keeps_state() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        controller.resource().fail(BackendError::Rejected {
            status: 500,
            message: "boom".into(),
        });
        let err = controller
            .delete(&EntityKey::new("1"), &AssumeYes)
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Remote(BackendError::Rejected { status: 500, .. })));
        assert_eq!(ids(&controller.collection()), vec![1, 2]);
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        let calls_before = controller.resource().calls.load(Ordering::SeqCst);
        let decline = |prompt: &str| {
            assert_eq!(prompt, DELETE_PROMPT);
            false
        };
        let err = controller
            .delete(&EntityKey::new("1"), &decline)
            .await
            .unwrap_err();
        assert_eq!(err, ControllerError::Cancelled);
        assert_eq!(controller.resource().calls.load(Ordering::SeqCst), calls_before);
        assert_eq!(controller.collection().len(), 2);
    }

    #[tokio::test]
    async fn create_appends_server_entity() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        let draft = Draft::new(entity(json!({"name": "Cici"})));
        let created = controller.create(&draft).await.unwrap();
        assert_eq!(created.get("id"), Some(&json!(102)));
        assert_eq!(ids(&controller.collection()), vec![1, 2, 102]);
    }

    #[tokio::test]
    async fn create_replaces_entity_with_same_key() {
        let resource = FakeResource::with_rows(vec![
            json!({"id": 1, "name": "Agus"}),
            json!({"id": 102, "name": "Lama"}),
        ]);
        let controller = EntityController::new(schema(), resource);
        controller.load().await.unwrap();

        let draft = Draft::new(entity(json!({"name": "Cici"})));
        controller.create(&draft).await.unwrap();
        assert_eq!(ids(&controller.collection()), vec![1, 102]);
        assert_eq!(
            controller
                .find(&EntityKey::new("102"))
                .and_then(|e| e.get("name").cloned()),
            Some(json!("Cici"))
        );
    }

    #[tokio::test]
    async fn update_merges_server_reply() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        *controller.resource().update_reply.lock().unwrap() =
            Some(Some(entity(json!({"id": 2, "name": "Budi S", "point": 50}))));

        let draft = Draft::new(entity(json!({"id": 2, "name": "Budi S"})));
        let updated = controller
            .update(&EntityKey::new("2"), &draft, &[])
            .await
            .unwrap();
        assert_eq!(updated.get("point"), Some(&json!(50)));
        assert_eq!(controller.find(&EntityKey::new("2")), Some(updated));
    }

    #[tokio::test]
    async fn empty_update_reply_uses_draft() {
        let controller = EntityController::new(schema(), two_rows());
        controller.load().await.unwrap();
        *controller.resource().update_reply.lock().unwrap() = Some(None);

        let draft = Draft::new(entity(json!({"name": "Agus W"})));
        controller
            .update(&EntityKey::new("1"), &draft, &[])
            .await
            .unwrap();
        let row = controller.find(&EntityKey::new("1")).unwrap();
        assert_eq!(row.get("name"), Some(&json!("Agus W")));
        assert_eq!(row.get("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn concurrent_mutation_of_same_key_is_busy() {
        let gate = Arc::new(Notify::new());
        let resource = FakeResource {
            gate: Some(gate.clone()),
            ..two_rows()
        };
        let controller = EntityController::new(schema(), resource);
        controller.load().await.unwrap();
        let key = EntityKey::new("1");
        let draft = Draft::new(entity(json!({"name": "X"})));

        let (first, second) = tokio::join!(controller.update(&key, &draft, &[]), async {
            let second = controller.delete(&key, &AssumeYes).await;
            gate.notify_waiters();
            second
        });

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), ControllerError::Busy { key: key.clone() });

        // released after completion
        controller.delete(&key, &AssumeYes).await.unwrap();
        assert_eq!(ids(&controller.collection()), vec![2]);
    }

    #[tokio::test]
    async fn detached_load_is_dropped() {
        let controller = EntityController::new(schema(), two_rows());
        controller.detach();
        assert_eq!(controller.load().await.unwrap_err(), ControllerError::Detached);
        assert!(controller.collection().is_empty());
    }

    #[tokio::test]
    async fn create_without_key_is_rejected() {
        struct Keyless;
        impl RemoteResource for Keyless {
            fn endpoint(&self) -> &str {
                "/api/points"
            }
            async fn list(&self) -> Result<Vec<Entity>, BackendError> {
                Ok(Vec::new())
            }
            async fn create(&self, draft: &Entity) -> Result<Entity, BackendError> {
                Ok(draft.clone())
            }
            async fn update(
                &self,
                _: &EntityKey,
                _: &Entity,
                _: &[Attachment],
            ) -> Result<Option<Entity>, BackendError> {
                Ok(None)
            }
            async fn delete(&self, _: &EntityKey) -> Result<(), BackendError> {
                Ok(())
            }
        }

        let controller = EntityController::new(schema(), Keyless);
        let err = controller
            .create(&Draft::new(entity(json!({"name": "Tanpa"}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::Remote(BackendError::MissingKey { .. })));
        assert!(controller.collection().is_empty());
    }
}
