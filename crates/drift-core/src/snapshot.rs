mod scan;
pub use scan::{FieldCache, Scanner};

mod store;
pub use store::SnapshotStore;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::FieldSchema;

/// Normalized description of every table at one point in time.
///
/// Tables appear in scan order; two snapshots (old and new) are the only
/// inputs the diff engine ever compares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub tables: IndexMap<String, TableSnapshot>,
}

impl Snapshot {
    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.get(name)
    }
}

/// One table entry of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    /// Identifier of the model the table was scanned from.
    pub model: String,

    /// Provenance payload: the many-to-many descriptor for synthesized join
    /// tables, `{}` otherwise. Persisted but never consumed by diffing.
    #[serde(default)]
    pub model_args: Value,

    /// Field name to schema fact, in declaration order.
    pub fields: IndexMap<String, FieldSchema>,
}
