use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named configuration slot exposed by the configuration-store service.
///
/// Definitions are produced server-side and are read-only from the client's
/// perspective: the console lists them, picks one, and edits the *value*
/// stored under `key`, never the definition itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDefinition {
    /// Unique, immutable identifier of the slot.
    pub key: String,
    /// Human-readable label. Some deployments send this field as `name`.
    #[serde(alias = "name")]
    pub title: String,
    /// Free-form description shown next to the editor.
    #[serde(default)]
    pub description: String,
    /// JSON Schema describing the shape of the slot's value.
    pub schema: Value,
}
