//! Component state for the configuration console.
//!
//! The coordination layer (session, API client, query caches, editor state
//! machine) lives in the shared [`Console`] handle; this struct only holds
//! what the view needs on top of it: the fetched definitions list, loading
//! flags, the selected value's metadata, per-field validation errors, the
//! current notification, and the raw auth input fields.

use std::rc::Rc;

use client::{Console, FieldError};
use common::model::{ConfigDefinition, ConfigValue};
use wasm_bindgen::closure::Closure;

use crate::net::FetchTransport;
use crate::storage::LocalStorage;

use super::{AUTH_SERVICE_URL, CONFIG_SERVICE_URL};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

pub struct ConsoleComponent {
    /// Shared coordination layer; clones go into spawned async operations.
    pub console: Rc<Console<FetchTransport>>,

    /// Definitions in service order. Never re-sorted.
    pub definitions: Vec<ConfigDefinition>,

    pub loading_definitions: bool,
    pub loading_value: bool,

    /// Server metadata (version, timestamp) of the selected key's value.
    pub stored: Option<ConfigValue>,

    /// Validation errors from the last blocked save attempt.
    pub field_errors: Vec<FieldError>,

    /// The single visible toast, replaced by newer notifications.
    pub notification: Option<Notification>,
    pub next_notification_id: u64,

    /// Raw auth controls. The tenant and token fields are seeded from the
    /// rehydrated session so a reload shows what is in effect.
    pub token_input: String,
    pub username: String,
    pub password: String,
    pub tenant: String,

    /// Keeps the Ctrl+L listener alive.
    pub keydown_listener: Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
}

impl ConsoleComponent {
    pub fn new() -> Self {
        let console = Rc::new(Console::new(
            FetchTransport,
            Rc::new(LocalStorage),
            CONFIG_SERVICE_URL,
            AUTH_SERVICE_URL,
        ));
        let token_input = console.session().token().unwrap_or_default();
        let tenant = console.session().tenant().unwrap_or_default();
        Self {
            console,
            definitions: Vec::new(),
            loading_definitions: false,
            loading_value: false,
            stored: None,
            field_errors: Vec::new(),
            notification: None,
            next_notification_id: 0,
            token_input,
            username: String::new(),
            password: String::new(),
            tenant,
            keydown_listener: None,
        }
    }

    /// The definition currently selected in the coordination layer, if it is
    /// present in the fetched list.
    pub fn selected_definition(&self) -> Option<&ConfigDefinition> {
        let selected = self.console.selected()?;
        self.definitions.iter().find(|def| def.key == selected)
    }
}
