#![allow(clippy::unwrap_used)]
// Behavioural tests for `ListEditController` against an in-memory resource.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use stockroom_api::{ApiClient, TransportConfig};
use stockroom_core::error::CoreError;
use stockroom_core::list_edit::{ListEditController, Resource};
use stockroom_core::model::EntityId;
use stockroom_core::session::SessionStore;

// ── Fake resource ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: EntityId,
    name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ItemDraft {
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Create(String),
    Update(EntityId, String),
    Delete(EntityId),
}

#[derive(Default)]
struct Backend {
    items: Mutex<Vec<Item>>,
    calls: Mutex<Vec<Call>>,
    fail_list: Mutex<Option<CoreError>>,
    fail_write: Mutex<Option<CoreError>>,
    next_id: Mutex<EntityId>,
}

#[derive(Clone, Default)]
struct FakeResource(Arc<Backend>);

impl FakeResource {
    fn seeded(names: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut items = fake.0.items.lock().unwrap();
            for (i, name) in names.iter().enumerate() {
                items.push(Item {
                    id: i64::try_from(i).unwrap() + 1,
                    name: (*name).to_owned(),
                });
            }
            *fake.0.next_id.lock().unwrap() = i64::try_from(names.len()).unwrap() + 1;
        }
        fake
    }

    fn calls(&self) -> Vec<Call> {
        self.0.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.0.calls.lock().unwrap().clear();
    }

    fn count(&self, call: fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| call(c)).count()
    }

    fn fail_next_write(&self, err: CoreError) {
        *self.0.fail_write.lock().unwrap() = Some(err);
    }

    fn fail_next_list(&self, err: CoreError) {
        *self.0.fail_list.lock().unwrap() = Some(err);
    }

    fn record(&self, call: Call) {
        self.0.calls.lock().unwrap().push(call);
    }

    fn take_write_failure(&self) -> Result<(), CoreError> {
        match self.0.fail_write.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Resource for FakeResource {
    type Entity = Item;
    type Draft = ItemDraft;
    type Lookups = ();

    const LOAD_FALLBACK: &'static str = "Failed to load items";

    fn id(entity: &Item) -> EntityId {
        entity.id
    }

    fn search_fields(entity: &Item) -> Vec<String> {
        vec![entity.name.clone()]
    }

    fn draft_of(entity: &Item) -> ItemDraft {
        ItemDraft {
            name: entity.name.clone(),
        }
    }

    fn validate(draft: &ItemDraft) -> Result<(), CoreError> {
        if draft.name.is_empty() {
            return Err(CoreError::validation("Name is required"));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, CoreError> {
        self.record(Call::List);
        if let Some(err) = self.0.fail_list.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.0.items.lock().unwrap().clone())
    }

    async fn create(&self, draft: &ItemDraft) -> Result<(), CoreError> {
        self.record(Call::Create(draft.name.clone()));
        self.take_write_failure()?;
        let mut next = self.0.next_id.lock().unwrap();
        self.0.items.lock().unwrap().push(Item {
            id: *next,
            name: draft.name.clone(),
        });
        *next += 1;
        Ok(())
    }

    async fn update(&self, id: EntityId, draft: &ItemDraft) -> Result<(), CoreError> {
        self.record(Call::Update(id, draft.name.clone()));
        self.take_write_failure()?;
        for item in self.0.items.lock().unwrap().iter_mut() {
            if item.id == id {
                item.name.clone_from(&draft.name);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        self.record(Call::Delete(id));
        self.take_write_failure()?;
        self.0.items.lock().unwrap().retain(|i| i.id != id);
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn session() -> SessionStore {
    let api = ApiClient::new("http://127.0.0.1:9", &TransportConfig::default()).unwrap();
    SessionStore::new(api)
}

async fn controller(names: &[&str]) -> (FakeResource, ListEditController<FakeResource>) {
    let fake = FakeResource::seeded(names);
    let controller = ListEditController::new(fake.clone(), session());
    controller.load().await;
    fake.clear_calls();
    (fake, controller)
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

fn rejected(message: &str) -> CoreError {
    CoreError::Rejected {
        message: Some(message.into()),
        status: Some(400),
    }
}

// ── Load ────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_replaces_items_and_clears_loading() {
    let (_, controller) = controller(&["Bolt", "Nut"]).await;
    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(names(&state.items), vec!["Bolt", "Nut"]);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn load_failure_is_display_only() {
    let (fake, controller) = controller(&["Bolt"]).await;
    fake.fail_next_list(rejected("boom"));

    controller.load().await;

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to load items"));
    assert_eq!(names(&state.items), vec!["Bolt"]);
}

// ── Filter ──────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_is_case_insensitive_and_keeps_order() {
    let (_, controller) = controller(&["Hex Bolt", "nut", "Carriage BOLT"]).await;

    controller.set_search("bolt");
    assert_eq!(names(&controller.filtered()), vec!["Hex Bolt", "Carriage BOLT"]);

    controller.set_search("");
    assert_eq!(names(&controller.filtered()), vec!["Hex Bolt", "nut", "Carriage BOLT"]);

    // Filtering never touches the underlying list.
    controller.set_search("zzz");
    assert!(controller.filtered().is_empty());
    assert_eq!(controller.state().items.len(), 3);
}

// ── Submit ──────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_without_editing_id_creates() {
    let (fake, controller) = controller(&["Bolt"]).await;
    controller.set_form(ItemDraft { name: "Washer".into() });

    controller.submit().await.unwrap();

    assert_eq!(fake.calls(), vec![Call::Create("Washer".into()), Call::List]);
    let state = controller.state();
    assert_eq!(names(&state.items), vec!["Bolt", "Washer"]);
    assert_eq!(state.form, ItemDraft::default());
    assert_eq!(state.editing_id, None);
}

#[tokio::test]
async fn submit_while_editing_updates_that_id() {
    let (fake, controller) = controller(&["Bolt", "Nut"]).await;
    let nut = controller.state().items[1].clone();

    controller.start_edit(&nut);
    assert_eq!(controller.state().editing_id, Some(2));
    assert_eq!(controller.state().form.name, "Nut");

    controller.update_form(|d| d.name = "Lock Nut".into());
    controller.submit().await.unwrap();

    assert_eq!(fake.calls(), vec![Call::Update(2, "Lock Nut".into()), Call::List]);
    assert_eq!(fake.count(|c| matches!(c, Call::Create(_))), 0);
    let state = controller.state();
    assert_eq!(names(&state.items), vec!["Bolt", "Lock Nut"]);
    assert_eq!(state.editing_id, None);
}

#[tokio::test]
async fn cancel_edit_resets_form() {
    let (_, controller) = controller(&["Bolt"]).await;
    let bolt = controller.state().items[0].clone();
    controller.start_edit(&bolt);
    controller.cancel_edit();

    let state = controller.state();
    assert_eq!(state.form, ItemDraft::default());
    assert_eq!(state.editing_id, None);
}

#[tokio::test]
async fn failed_submit_keeps_form_and_shows_backend_message() {
    let (fake, controller) = controller(&["Bolt"]).await;
    let bolt = controller.state().items[0].clone();
    controller.start_edit(&bolt);
    controller.update_form(|d| d.name = "Bolt!".into());
    fake.fail_next_write(rejected("Name taken"));

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));

    let state = controller.state();
    assert_eq!(state.error.as_deref(), Some("Name taken"));
    assert_eq!(state.form.name, "Bolt!");
    assert_eq!(state.editing_id, Some(1));
    assert_eq!(fake.count(|c| matches!(c, Call::List)), 0);
}

#[tokio::test]
async fn failed_submit_without_message_uses_fallback() {
    let (fake, controller) = controller(&[]).await;
    controller.set_form(ItemDraft { name: "Washer".into() });
    fake.fail_next_write(CoreError::Timeout);

    controller.submit().await.unwrap_err();
    assert_eq!(controller.state().error.as_deref(), Some("Save failed"));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_resource() {
    let (fake, controller) = controller(&["Bolt"]).await;

    let err = controller.submit().await.unwrap_err();
    assert!(err.is_validation());
    assert!(fake.calls().is_empty());
    assert_eq!(controller.state().error.as_deref(), Some("Name is required"));
}

#[tokio::test]
async fn dismiss_error_clears_banner() {
    let (_, controller) = controller(&[]).await;
    controller.submit().await.unwrap_err();
    controller.dismiss_error();
    assert_eq!(controller.state().error, None);
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unconfirmed_delete_sends_nothing() {
    let (fake, controller) = controller(&["Acme", "Globex"]).await;

    controller.request_delete(1);
    controller.cancel_delete();
    controller.confirm_delete().await.unwrap();

    assert!(fake.calls().is_empty());
    assert_eq!(names(&controller.state().items), vec!["Acme", "Globex"]);
    assert_eq!(controller.state().pending_delete, None);
}

#[tokio::test]
async fn confirmed_delete_removes_then_reloads_once() {
    let (fake, controller) = controller(&["Acme", "Globex"]).await;

    controller.request_delete(1);
    assert_eq!(controller.state().pending_delete, Some(1));
    controller.confirm_delete().await.unwrap();

    assert_eq!(fake.calls(), vec![Call::Delete(1), Call::List]);
    assert_eq!(names(&controller.state().items), vec!["Globex"]);
}

#[tokio::test]
async fn failed_delete_leaves_row_visible() {
    let (fake, controller) = controller(&["Acme"]).await;
    fake.fail_next_write(rejected("Supplier has products"));

    controller.request_delete(1);
    controller.confirm_delete().await.unwrap_err();

    let state = controller.state();
    assert_eq!(names(&state.items), vec!["Acme"]);
    assert_eq!(state.error.as_deref(), Some("Supplier has products"));
    assert_eq!(fake.count(|c| matches!(c, Call::List)), 0);
}

// ── Unauthorized ────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_is_not_a_page_error() {
    let (fake, controller) = controller(&["Bolt"]).await;
    fake.fail_next_list(CoreError::Unauthorized {
        message: "session expired".into(),
    });

    controller.load().await;
    assert_eq!(controller.state().error, None);

    controller.set_form(ItemDraft { name: "x".into() });
    fake.fail_next_write(CoreError::Unauthorized {
        message: "session expired".into(),
    });
    controller.submit().await.unwrap_err();
    assert_eq!(controller.state().error, None);
    assert_eq!(controller.state().form.name, "x");
}
