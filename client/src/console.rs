//! Editor orchestration: selection, draft lifecycle, save/load coordination.
//!
//! `Console` composes the session store, the API client and two query
//! caches, and owns the per-session state machine:
//!
//! Unauthenticated → Authenticated(no selection) →
//! Authenticated(selection, clean) ⇄ Authenticated(selection, dirty) →
//! Saving → Authenticated(selection, clean)
//!
//! Two rules here carry most of the weight. Selecting a key bumps a fetch
//! sequence number, and a value fetch only applies its result if the
//! selection and sequence are unchanged when it resolves — a stale response
//! can never overwrite a newer selection. And a successful save invalidates
//! the definitions list plus exactly the key that was saved, so the next
//! read observes the write.

use std::cell::RefCell;
use std::rc::Rc;

use common::model::{ConfigDefinition, ConfigValue};
use log::debug;
use serde_json::{Map, Value};

use crate::api::{ApiClient, AuthStrategy};
use crate::cache::QueryCache;
use crate::error::ApiError;
use crate::session::{SessionStore, StorageBackend};
use crate::transport::HttpTransport;

/// Result of a definitions load, with the key to auto-select when nothing
/// was selected yet (first definition, service order).
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionsView {
    pub definitions: Vec<ConfigDefinition>,
    pub auto_selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The fetched value was applied to the editor; `stored` is absent when
    /// the service has no value for the key yet.
    Loaded {
        key: String,
        stored: Option<ConfigValue>,
    },
    /// A newer selection (or a reset) happened while the fetch was in
    /// flight; the result was discarded.
    Superseded,
    /// The fetch failed while this key was still selected.
    Failed { key: String, error: ApiError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { key: String, stored: ConfigValue },
    /// Nothing to save: clean draft, no selection, or a save already in
    /// flight. No network call was made.
    NotDirty,
    /// The save failed; the draft and dirty flag are untouched so the user
    /// can retry without re-entering anything.
    Failed { key: String, error: ApiError },
}

struct Editor {
    selected: Option<String>,
    draft: Value,
    dirty: bool,
    saving: bool,
    fetch_seq: u64,
}

impl Editor {
    fn new() -> Self {
        Self {
            selected: None,
            draft: Value::Null,
            dirty: false,
            saving: false,
            fetch_seq: 0,
        }
    }

    /// Clears everything except the sequence counter, which keeps growing so
    /// fetches issued before the reset can never match again.
    fn reset(&mut self) {
        self.selected = None;
        self.draft = Value::Null;
        self.dirty = false;
        self.saving = false;
        self.fetch_seq += 1;
    }
}

fn empty_draft() -> Value {
    Value::Object(Map::new())
}

pub struct Console<T> {
    api: Rc<ApiClient<T>>,
    session: SessionStore,
    definitions: QueryCache<(), Vec<ConfigDefinition>>,
    values: QueryCache<String, Option<ConfigValue>>,
    editor: RefCell<Editor>,
}

impl<T: HttpTransport + 'static> Console<T> {
    /// Builds a console scoped by bearer tokens, rehydrating the session
    /// from `backend`.
    pub fn new(
        transport: T,
        backend: Rc<dyn StorageBackend>,
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        Self::with_strategy(transport, backend, base_url, auth_url, AuthStrategy::default())
    }

    pub fn with_strategy(
        transport: T,
        backend: Rc<dyn StorageBackend>,
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        strategy: AuthStrategy,
    ) -> Self {
        let session = SessionStore::new(backend);
        let api = Rc::new(ApiClient::new(
            transport,
            session.clone(),
            base_url,
            auth_url,
            strategy,
        ));
        Self {
            api,
            session,
            definitions: QueryCache::new(),
            values: QueryCache::new(),
            editor: RefCell::new(Editor::new()),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    pub fn selected(&self) -> Option<String> {
        self.editor.borrow().selected.clone()
    }

    pub fn draft(&self) -> Value {
        self.editor.borrow().draft.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.borrow().dirty
    }

    pub fn is_saving(&self) -> bool {
        self.editor.borrow().saving
    }

    /// Loads the definitions list through the cache.
    pub async fn load_definitions(&self) -> Result<DefinitionsView, ApiError> {
        let api = Rc::clone(&self.api);
        let definitions = self
            .definitions
            .fetch((), move || {
                let api = Rc::clone(&api);
                Box::pin(async move { api.list_definitions().await })
            })
            .await?;

        let auto_selected = if self.editor.borrow().selected.is_none() {
            definitions.first().map(|def| def.key.clone())
        } else {
            None
        };
        Ok(DefinitionsView {
            definitions,
            auto_selected,
        })
    }

    /// Selects `key` and loads its value (cache first). The draft is seeded
    /// from the stored value, or an empty object when none exists, and the
    /// editor is marked clean — but only if this selection is still current
    /// when the fetch resolves.
    pub async fn select(&self, key: &str) -> SelectOutcome {
        let seq = {
            let mut editor = self.editor.borrow_mut();
            editor.selected = Some(key.to_string());
            editor.draft = empty_draft();
            editor.dirty = false;
            editor.fetch_seq += 1;
            editor.fetch_seq
        };

        let api = Rc::clone(&self.api);
        let fetch_key = key.to_string();
        let result = self
            .values
            .fetch(key.to_string(), move || {
                let api = Rc::clone(&api);
                let key = fetch_key.clone();
                Box::pin(async move { api.get_value(&key).await })
            })
            .await;

        let mut editor = self.editor.borrow_mut();
        if editor.fetch_seq != seq || editor.selected.as_deref() != Some(key) {
            debug!("discarding stale value fetch for {key}");
            return SelectOutcome::Superseded;
        }
        match result {
            Ok(stored) => {
                editor.draft = stored
                    .as_ref()
                    .map(|stored| stored.value.clone())
                    .unwrap_or_else(empty_draft);
                editor.dirty = false;
                SelectOutcome::Loaded {
                    key: key.to_string(),
                    stored,
                }
            }
            Err(error) => SelectOutcome::Failed {
                key: key.to_string(),
                error,
            },
        }
    }

    /// Replaces the draft with an edited value and marks it dirty. Ignored
    /// when nothing is selected.
    pub fn edit(&self, value: Value) {
        let mut editor = self.editor.borrow_mut();
        if editor.selected.is_none() {
            return;
        }
        editor.draft = value;
        editor.dirty = true;
    }

    /// Persists the draft for the selected key.
    ///
    /// Redundant saves are rejected here as well as at the UI: a clean
    /// draft, a missing selection, or a save already in flight all yield
    /// [`SaveOutcome::NotDirty`] without touching the network.
    pub async fn save(&self) -> SaveOutcome {
        let (key, draft) = {
            let mut editor = self.editor.borrow_mut();
            let key = match &editor.selected {
                Some(key) if editor.dirty && !editor.saving => key.clone(),
                _ => return SaveOutcome::NotDirty,
            };
            editor.saving = true;
            (key, editor.draft.clone())
        };

        let result = self.api.save_value(&key, &draft).await;

        let mut editor = self.editor.borrow_mut();
        editor.saving = false;
        match result {
            Ok(stored) => {
                self.definitions.invalidate(&());
                self.values.invalidate(&key);
                if editor.selected.as_deref() == Some(key.as_str()) {
                    editor.dirty = false;
                }
                SaveOutcome::Saved { key, stored }
            }
            Err(error) => SaveOutcome::Failed { key, error },
        }
    }

    /// Password-grant login. All cached results are auth-scoped, so success
    /// drops them wholesale.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        tenant: Option<&str>,
    ) -> Result<(), ApiError> {
        self.api.login(username, password, tenant).await?;
        self.invalidate_everything();
        Ok(())
    }

    /// Direct token entry, bypassing the auth service.
    pub fn adopt_token(&self, token: &str) {
        self.session.set_token(token);
        self.invalidate_everything();
    }

    /// Clears the session (best-effort) and the editor, and drops all
    /// cached results.
    pub fn logout(&self) {
        self.session.clear_token();
        self.session.clear_tenant();
        self.editor.borrow_mut().reset();
        self.invalidate_everything();
    }

    /// Marks the definitions list and the selected value stale so the next
    /// read refetches. Always available as a manual escape hatch.
    pub fn refresh(&self) {
        self.definitions.invalidate(&());
        if let Some(key) = self.selected() {
            self.values.invalidate(&key);
        }
    }

    /// Recovery action for the top-level failure boundary: drop caches and
    /// editor state without touching the stored session.
    pub fn reset(&self) {
        self.editor.borrow_mut().reset();
        self.invalidate_everything();
    }

    fn invalidate_everything(&self) {
        self.definitions.invalidate_all();
        self.values.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, StorageBackend, TENANT_SLOT, TOKEN_SLOT};
    use crate::testing::MockTransport;
    use futures::join;
    use serde_json::json;

    const DEFINITIONS: &str = r#"[{
        "key": "greeting",
        "title": "Greeting",
        "description": "What the service says hello with",
        "schema": {"type": "object", "properties": {"text": {"type": "string"}}}
    }]"#;

    fn console(transport: MockTransport) -> Console<MockTransport> {
        Console::new(
            transport,
            Rc::new(MemoryStorage::new()),
            "https://config.example/api",
            "https://auth.example",
        )
    }

    #[tokio::test]
    async fn login_scopes_the_next_fetch_and_first_definition_is_auto_selected() {
        let transport = MockTransport::new();
        transport.push_json(200, r#"{"access_token":"tok-123","token_type":"bearer"}"#);
        transport.push_json(200, DEFINITIONS);
        let console = console(transport.clone());

        console.login("alice", "x", Some("dev3471")).await.unwrap();
        let view = console.load_definitions().await.unwrap();

        assert_eq!(view.definitions.len(), 1);
        assert_eq!(view.auto_selected.as_deref(), Some("greeting"));
        assert_eq!(
            transport.request(0).body.as_deref(),
            Some("grant_type=password&username=alice&password=x&tenant_id=dev3471")
        );
        assert_eq!(
            transport.request(1).header_value("Authorization"),
            Some("Bearer tok-123")
        );
    }

    #[tokio::test]
    async fn absent_value_seeds_an_empty_draft_and_save_invalidates_the_key() {
        let transport = MockTransport::new();
        transport.push_json(404, "no value yet");
        let console = console(transport.clone());

        let outcome = console.select("greeting").await;
        assert_eq!(
            outcome,
            SelectOutcome::Loaded {
                key: "greeting".to_string(),
                stored: None,
            }
        );
        assert_eq!(console.draft(), json!({}));
        assert!(!console.is_dirty());

        console.edit(json!({"text": "hi"}));
        assert!(console.is_dirty());

        transport.push_json(
            200,
            r#"{"value":{"text":"hi"},"version":1,"updated_at":"2024-01-01T00:00:00Z"}"#,
        );
        let outcome = console.save().await;
        let stored = match outcome {
            SaveOutcome::Saved { stored, .. } => stored,
            other => panic!("expected a saved outcome, got {other:?}"),
        };
        assert_eq!(stored.version, Some(1));
        assert!(!console.is_dirty());

        // the value cache entry was invalidated, so re-selecting refetches
        transport.push_json(
            200,
            r#"{"value":{"text":"hi"},"version":1,"updated_at":"2024-01-01T00:00:00Z"}"#,
        );
        console.select("greeting").await;
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn fetched_version_after_save_is_at_least_the_saved_one() {
        let transport = MockTransport::new();
        transport.push_json(200, r#"{"value":{"text":"a"},"version":4}"#);
        let console = console(transport.clone());

        console.select("greeting").await;
        console.edit(json!({"text": "b"}));
        transport.push_json(200, r#"{"value":{"text":"b"},"version":5}"#);
        let saved_version = match console.save().await {
            SaveOutcome::Saved { stored, .. } => stored.version.unwrap(),
            other => panic!("expected a saved outcome, got {other:?}"),
        };

        transport.push_json(200, r#"{"value":{"text":"b"},"version":5}"#);
        let refetched = match console.select("greeting").await {
            SelectOutcome::Loaded { stored, .. } => stored.unwrap(),
            other => panic!("expected a loaded outcome, got {other:?}"),
        };
        assert!(refetched.version.unwrap() >= saved_version);
    }

    #[tokio::test]
    async fn failed_save_preserves_the_draft_and_a_retry_succeeds() {
        let transport = MockTransport::new();
        transport.push_json(404, "no value yet");
        let console = console(transport.clone());

        console.select("greeting").await;
        console.edit(json!({"text": "hi"}));

        transport.push_error("connection reset");
        let outcome = console.save().await;
        assert!(matches!(
            outcome,
            SaveOutcome::Failed { error: ApiError::Network(_), .. }
        ));
        assert_eq!(console.draft(), json!({"text": "hi"}));
        assert!(console.is_dirty());
        assert!(!console.is_saving());

        // retry without re-entering anything
        transport.push_json(200, r#"{"value":{"text":"hi"},"version":1}"#);
        assert!(matches!(console.save().await, SaveOutcome::Saved { .. }));
        assert!(!console.is_dirty());
    }

    #[tokio::test]
    async fn logout_clears_stored_session_and_the_next_fetch_is_unauthenticated() {
        let backend = Rc::new(MemoryStorage::new());
        let transport = MockTransport::new();
        let console = Console::new(
            transport.clone(),
            Rc::clone(&backend) as Rc<dyn StorageBackend>,
            "https://config.example/api",
            "https://auth.example",
        );

        console.adopt_token("tok-9");
        console.session().set_tenant("dev3471");
        console.logout();

        assert_eq!(backend.read(TOKEN_SLOT), None);
        assert_eq!(backend.read(TENANT_SLOT), None);
        assert!(!console.is_authenticated());
        assert_eq!(console.selected(), None);

        transport.push_json(401, "unauthorized");
        let result = console.load_definitions().await;
        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert_eq!(transport.request(0).header_value("Authorization"), None);
    }

    #[tokio::test]
    async fn stale_value_fetch_does_not_overwrite_a_newer_selection() {
        let transport = MockTransport::new();
        let gate = transport.push_gated();
        transport.push_json(200, r#"{"value":{"text":"from b"},"version":2}"#);
        let console = console(transport.clone());

        let select_a = console.select("a");
        let select_b = console.select("b");
        let (outcome_a, outcome_b, _) = join!(select_a, select_b, async move {
            gate.send(Ok(crate::transport::HttpResponse {
                status: 200,
                body: r#"{"value":{"text":"from a"},"version":1}"#.to_string(),
            }))
            .ok();
        });

        assert_eq!(outcome_a, SelectOutcome::Superseded);
        assert!(matches!(outcome_b, SelectOutcome::Loaded { .. }));
        assert_eq!(console.selected().as_deref(), Some("b"));
        assert_eq!(console.draft(), json!({"text": "from b"}));
    }

    #[tokio::test]
    async fn saving_a_clean_draft_makes_no_network_call() {
        let transport = MockTransport::new();
        transport.push_json(200, r#"{"value":{"text":"hi"},"version":1}"#);
        let console = console(transport.clone());

        console.select("greeting").await;
        assert!(!console.is_dirty());
        assert_eq!(console.save().await, SaveOutcome::NotDirty);
        assert_eq!(transport.request_count(), 1, "only the value fetch");

        // and with no selection at all
        console.logout();
        assert_eq!(console.save().await, SaveOutcome::NotDirty);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn selection_change_resets_the_draft_and_clears_dirtiness() {
        let transport = MockTransport::new();
        transport.push_json(200, r#"{"value":{"text":"one"},"version":1}"#);
        transport.push_json(200, r#"{"value":{"level":3},"version":1}"#);
        let console = console(transport.clone());

        console.select("first").await;
        console.edit(json!({"text": "edited"}));
        assert!(console.is_dirty());

        console.select("second").await;
        assert!(!console.is_dirty());
        assert_eq!(console.draft(), json!({"level": 3}));
    }

    #[tokio::test]
    async fn refresh_marks_list_and_selected_value_stale() {
        let transport = MockTransport::new();
        transport.push_json(200, DEFINITIONS);
        transport.push_json(200, r#"{"value":{"text":"hi"},"version":1}"#);
        let console = console(transport.clone());

        console.load_definitions().await.unwrap();
        console.select("greeting").await;
        assert_eq!(transport.request_count(), 2);

        // cached: no new requests
        console.load_definitions().await.unwrap();
        console.select("greeting").await;
        assert_eq!(transport.request_count(), 2);

        console.refresh();
        transport.push_json(200, DEFINITIONS);
        transport.push_json(200, r#"{"value":{"text":"hi"},"version":1}"#);
        console.load_definitions().await.unwrap();
        console.select("greeting").await;
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn edits_without_a_selection_are_ignored() {
        let transport = MockTransport::new();
        let console = console(transport);

        console.edit(json!({"text": "nowhere to go"}));
        assert!(!console.is_dirty());
        assert_eq!(console.draft(), Value::Null);
    }
}
