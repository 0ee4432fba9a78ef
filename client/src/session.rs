//! Durable session state: the bearer token and the last-used tenant.
//!
//! Two plain string slots backed by a pluggable [`StorageBackend`]. The
//! in-memory copy is rehydrated from the backend once at construction, and
//! every mutation is written through synchronously before the call returns,
//! so a reload immediately after a set or clear observes the new state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use thiserror::Error;

/// Storage slot holding the bearer token.
pub const TOKEN_SLOT: &str = "config_store_token";
/// Storage slot holding the tenant identifier.
pub const TENANT_SLOT: &str = "config_store_tenant";

#[derive(Debug, Clone, PartialEq, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(pub String);

/// Durable client-side storage over named string slots.
///
/// Absence of a stored value is the default state, not an error, and
/// removing a slot that was never written must succeed.
pub trait StorageBackend {
    fn read(&self, slot: &str) -> Option<String>;
    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
}

/// Backend for native targets and tests.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().remove(slot);
        Ok(())
    }
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    tenant: Option<String>,
}

/// Cheap-to-clone handle over the current session.
///
/// All clones share the same state, so the API client and the orchestrator
/// always observe the same token without any module-level globals.
#[derive(Clone)]
pub struct SessionStore {
    state: Rc<RefCell<SessionState>>,
    backend: Rc<dyn StorageBackend>,
}

impl SessionStore {
    /// Builds the store and rehydrates both slots from the backend.
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        let state = SessionState {
            token: backend.read(TOKEN_SLOT),
            tenant: backend.read(TENANT_SLOT),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            backend,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn tenant(&self) -> Option<String> {
        self.state.borrow().tenant.clone()
    }

    pub fn set_token(&self, token: &str) {
        if let Err(err) = self.backend.write(TOKEN_SLOT, token) {
            warn!("failed to persist token: {err}");
        }
        self.state.borrow_mut().token = Some(token.to_string());
    }

    /// Best-effort: a missing slot or a failing backend never propagates.
    pub fn clear_token(&self) {
        if let Err(err) = self.backend.remove(TOKEN_SLOT) {
            warn!("failed to clear persisted token: {err}");
        }
        self.state.borrow_mut().token = None;
    }

    pub fn set_tenant(&self, tenant: &str) {
        if let Err(err) = self.backend.write(TENANT_SLOT, tenant) {
            warn!("failed to persist tenant: {err}");
        }
        self.state.borrow_mut().tenant = Some(tenant.to_string());
    }

    pub fn clear_tenant(&self) {
        if let Err(err) = self.backend.remove(TENANT_SLOT) {
            warn!("failed to clear persisted tenant: {err}");
        }
        self.state.borrow_mut().tenant = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_write_through_before_returning() {
        let backend = Rc::new(MemoryStorage::new());
        let session = SessionStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);

        session.set_token("tok-1");
        session.set_tenant("dev");
        assert_eq!(backend.read(TOKEN_SLOT).as_deref(), Some("tok-1"));
        assert_eq!(backend.read(TENANT_SLOT).as_deref(), Some("dev"));

        session.clear_token();
        assert_eq!(backend.read(TOKEN_SLOT), None);
        assert_eq!(session.token(), None);
        // tenant lifecycle is independent from the token's
        assert_eq!(session.tenant().as_deref(), Some("dev"));
    }

    #[test]
    fn rehydrates_from_backend_at_construction() {
        let backend = Rc::new(MemoryStorage::new());
        backend.write(TOKEN_SLOT, "persisted").unwrap();

        let session = SessionStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);
        assert_eq!(session.token().as_deref(), Some("persisted"));
        assert_eq!(session.tenant(), None);
    }

    #[test]
    fn clearing_missing_slots_is_not_an_error() {
        let session = SessionStore::new(Rc::new(MemoryStorage::new()));
        session.clear_token();
        session.clear_tenant();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn clones_share_state() {
        let session = SessionStore::new(Rc::new(MemoryStorage::new()));
        let other = session.clone();
        session.set_token("shared");
        assert_eq!(other.token().as_deref(), Some("shared"));
    }
}
