// ── List-edit controller ──
//
// One state machine shared by every list page: load -> display -> filter ->
// edit/create -> submit -> reload, plus two-phase delete. A `Resource`
// supplies the entity-specific pieces (fetching, writing, which fields the
// search looks at, how an entity becomes a form draft).
//
// Writes are never merged into the local list. After every successful
// submit or delete the controller reloads the whole collection, so the list
// always reflects server-assigned fields and server-side effects.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::EntityId;
use crate::session::SessionStore;

// ── Resource capability set ──────────────────────────────────────

/// The per-entity operations a [`ListEditController`] needs.
pub trait Resource: Send + Sync + 'static {
    type Entity: Clone + Debug + Send + Sync + 'static;
    /// Editable form state. `Default` is the empty create form.
    type Draft: Clone + Debug + Default + PartialEq + Send + Sync + 'static;
    /// Cross-referenced collections the form needs (e.g. a product picker).
    type Lookups: Clone + Debug + Default + Send + Sync + 'static;

    /// Shown when the list fails to load.
    const LOAD_FALLBACK: &'static str;
    /// Shown when a create/update fails without a backend message.
    const SAVE_FALLBACK: &'static str = "Save failed";
    /// Shown when a delete fails without a backend message.
    const DELETE_FALLBACK: &'static str = "Delete failed";

    fn id(entity: &Self::Entity) -> EntityId;

    /// Display fields the search box matches against.
    fn search_fields(entity: &Self::Entity) -> Vec<String>;

    fn draft_of(entity: &Self::Entity) -> Self::Draft;

    /// Local checks run before any request is made.
    fn validate(_draft: &Self::Draft) -> Result<(), CoreError> {
        Ok(())
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Self::Entity>, CoreError>> + Send;

    fn lookups(&self) -> impl Future<Output = Result<Self::Lookups, CoreError>> + Send {
        async { Ok(Self::Lookups::default()) }
    }

    fn create(&self, draft: &Self::Draft) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update(
        &self,
        id: EntityId,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Case-insensitive substring match over `R::search_fields`.
pub fn matches<R: Resource>(entity: &R::Entity, query: &str) -> bool {
    let needle = query.to_lowercase();
    needle.is_empty()
        || R::search_fields(entity)
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

/// The subsequence of `items` matching `query`, in original order.
/// An empty query returns everything.
pub fn filter<R: Resource>(items: &[R::Entity], query: &str) -> Vec<R::Entity> {
    items
        .iter()
        .filter(|item| matches::<R>(item, query))
        .cloned()
        .collect()
}

// ── State ────────────────────────────────────────────────────────

/// Everything a list page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<E, D, L> {
    pub items: Vec<E>,
    pub lookups: L,
    pub loading: bool,
    /// Display-only banner text.
    pub error: Option<String>,
    pub form: D,
    /// `Some` while editing an existing entity, `None` in create mode.
    pub editing_id: Option<EntityId>,
    pub search_term: String,
    /// Delete awaiting confirmation.
    pub pending_delete: Option<EntityId>,
}

impl<E, D: Default, L: Default> Default for ListState<E, D, L> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            lookups: L::default(),
            loading: false,
            error: None,
            form: D::default(),
            editing_id: None,
            search_term: String::new(),
            pending_delete: None,
        }
    }
}

impl<E, D, L> ListState<E, D, L> {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

pub type StateOf<R> =
    ListState<<R as Resource>::Entity, <R as Resource>::Draft, <R as Resource>::Lookups>;

// ── Controller ───────────────────────────────────────────────────

/// Cheaply cloneable; clones share state.
pub struct ListEditController<R: Resource> {
    inner: Arc<ControllerInner<R>>,
}

struct ControllerInner<R: Resource> {
    resource: R,
    session: SessionStore,
    state: watch::Sender<StateOf<R>>,
}

impl<R: Resource> Clone for ListEditController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> ListEditController<R> {
    pub fn new(resource: R, session: SessionStore) -> Self {
        let (state, _) = watch::channel(StateOf::<R>::default());
        Self {
            inner: Arc::new(ControllerInner {
                resource,
                session,
                state,
            }),
        }
    }

    pub fn resource(&self) -> &R {
        &self.inner.resource
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StateOf<R> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StateOf<R>> {
        self.inner.state.subscribe()
    }

    fn modify(&self, f: impl FnOnce(&mut StateOf<R>)) {
        self.inner.state.send_modify(f);
    }

    /// Route a failure: an unauthorized answer goes to the session store
    /// (the route gate takes it from there), anything else becomes the banner.
    fn record_failure(&self, err: &CoreError, fallback: &str) {
        if err.is_unauthorized() {
            debug!("unauthorized during list operation, expiring session");
            self.inner.session.expire();
            return;
        }
        let message = err.display_message(fallback);
        warn!(error = %err, "list operation failed");
        self.modify(|s| s.error = Some(message));
    }

    // ── Load ─────────────────────────────────────────────────────

    /// Fetch the collection and its lookups concurrently and replace both.
    ///
    /// Failures are stored as display state and never returned. In-flight
    /// loads are not cancelled; if two overlap, whichever resolves last wins.
    pub async fn load(&self) {
        self.modify(|s| s.loading = true);

        let (items, lookups) = tokio::join!(self.inner.resource.list(), self.inner.resource.lookups());

        match (items, lookups) {
            (Ok(items), Ok(lookups)) => {
                debug!(count = items.len(), "list loaded");
                self.modify(|s| {
                    s.items = items;
                    s.lookups = lookups;
                    s.loading = false;
                });
            }
            (Err(e), _) | (_, Err(e)) => {
                self.modify(|s| s.loading = false);
                // Load banners stay generic; a backend message here is rarely useful.
                if e.is_unauthorized() {
                    self.record_failure(&e, R::LOAD_FALLBACK);
                } else {
                    warn!(error = %e, "list load failed");
                    self.modify(|s| s.error = Some(R::LOAD_FALLBACK.to_owned()));
                }
            }
        }
    }

    // ── Filter ───────────────────────────────────────────────────

    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        self.modify(|s| s.search_term = term);
    }

    /// Items matching the current search term. Computed on demand from
    /// `items`; never written back.
    pub fn filtered(&self) -> Vec<R::Entity> {
        let state = self.inner.state.borrow();
        filter::<R>(&state.items, &state.search_term)
    }

    // ── Form ─────────────────────────────────────────────────────

    /// Copy an entity's editable fields into the form, switching to update mode.
    pub fn start_edit(&self, entity: &R::Entity) {
        let draft = R::draft_of(entity);
        let id = R::id(entity);
        self.modify(|s| {
            s.form = draft;
            s.editing_id = Some(id);
        });
    }

    /// Back to an empty create form.
    pub fn cancel_edit(&self) {
        self.modify(|s| {
            s.form = R::Draft::default();
            s.editing_id = None;
        });
    }

    pub fn set_form(&self, draft: R::Draft) {
        self.modify(|s| s.form = draft);
    }

    pub fn update_form(&self, f: impl FnOnce(&mut R::Draft)) {
        self.modify(|s| f(&mut s.form));
    }

    pub fn dismiss_error(&self) {
        self.modify(|s| s.error = None);
    }

    // ── Submit ───────────────────────────────────────────────────

    /// Create or update from the form.
    ///
    /// `editing_id` present: update that id. Absent: create. On success the
    /// form resets and the list reloads once. On failure the form is kept
    /// for a retry and the error is also recorded as display state.
    pub async fn submit(&self) -> Result<(), CoreError> {
        let (draft, editing_id) = {
            let state = self.inner.state.borrow();
            (state.form.clone(), state.editing_id)
        };

        if let Err(e) = R::validate(&draft) {
            self.record_failure(&e, R::SAVE_FALLBACK);
            return Err(e);
        }

        let result = match editing_id {
            Some(id) => self.inner.resource.update(id, &draft).await,
            None => self.inner.resource.create(&draft).await,
        };

        match result {
            Ok(()) => {
                self.modify(|s| {
                    s.form = R::Draft::default();
                    s.editing_id = None;
                    s.error = None;
                });
                self.load().await;
                Ok(())
            }
            Err(e) => {
                self.record_failure(&e, R::SAVE_FALLBACK);
                Err(e)
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────

    /// First phase: remember what the user wants to delete. Nothing is sent.
    pub fn request_delete(&self, id: EntityId) {
        self.modify(|s| s.pending_delete = Some(id));
    }

    /// Drop the pending delete without touching the backend.
    pub fn cancel_delete(&self) {
        self.modify(|s| s.pending_delete = None);
    }

    /// Second phase: delete the pending entity, then reload.
    ///
    /// Without a pending request this does nothing. On failure the row stays
    /// in the list and the error is recorded.
    pub async fn confirm_delete(&self) -> Result<(), CoreError> {
        let mut pending = None;
        self.inner.state.send_if_modified(|s| {
            pending = s.pending_delete.take();
            pending.is_some()
        });
        let Some(id) = pending else {
            return Ok(());
        };

        match self.inner.resource.delete(id).await {
            Ok(()) => {
                self.modify(|s| {
                    s.form = R::Draft::default();
                    s.editing_id = None;
                    s.error = None;
                });
                self.load().await;
                Ok(())
            }
            Err(e) => {
                self.record_failure(&e, R::DELETE_FALLBACK);
                Err(e)
            }
        }
    }
}

impl<R: Resource> std::fmt::Debug for ListEditController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ListEditController")
            .field("items", &state.items.len())
            .field("loading", &state.loading)
            .field("editing_id", &state.editing_id)
            .finish_non_exhaustive()
    }
}
