use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The current stored data for a configuration definition.
///
/// Created server-side on the first save of a key; every subsequent save
/// produces a new `version`. The client only ever holds the latest version
/// it has fetched or just written back — the service is the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValue {
    /// Arbitrary JSON conforming to the owning definition's schema.
    pub value: Value,
    /// Monotonically increasing per key. Absent on deployments that do not
    /// version their store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// RFC 3339 timestamp of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
