//! Client-side coordination layer for the configuration console.
//!
//! Everything the browser UI needs that is not rendering lives here: the
//! durable session store (bearer token + tenant), the typed API client for
//! the configuration-store and auth services, a keyed query cache with
//! request coalescing and explicit invalidation, the editor orchestration
//! state machine, and JSON-Schema validation helpers for the form.
//!
//! The crate is target-independent: the frontend supplies a `gloo-net`
//! transport and a `localStorage` backend, while tests run natively against
//! in-memory implementations of the same traits.

pub mod api;
pub mod cache;
pub mod console;
pub mod error;
pub mod form;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, AuthStrategy};
pub use cache::QueryCache;
pub use console::{Console, DefinitionsView, SaveOutcome, SelectOutcome};
pub use error::ApiError;
pub use form::{set_value_at, validate, value_at, FieldError};
pub use session::{MemoryStorage, SessionStore, StorageBackend, StorageError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
