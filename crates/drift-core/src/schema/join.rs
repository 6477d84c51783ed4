use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Field, Model};

/// Relationship metadata recorded by [`Field::belongs_to_many`].
///
/// The declaring field never becomes a column; this descriptor is what the
/// scanner turns into a synthetic join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManyToMany {
    /// Identifier of the declaring model. Filled in by the scanner.
    pub parent_model: String,
    pub related_model: String,
    pub join_table: String,
    pub parent_key: String,
    pub related_key: String,
}

impl ManyToMany {
    pub(crate) fn for_parent(mut self, parent_model: &str) -> Self {
        self.parent_model = parent_model.to_string();
        self
    }
}

/// Which side of the relationship a join-table key points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRole {
    Parent,
    Related,
}

/// Resolution entry for one join-table key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKey {
    pub role: JoinRole,
    pub target_model: String,
}

/// Synthetic model backing a many-to-many join table.
///
/// Key-to-target resolution is fixed at construction: a lookup from key name
/// to `{role, target model}`, never resolved dynamically at call time.
#[derive(Debug, Clone)]
pub struct JoinModel {
    relationship: ManyToMany,
    keys: IndexMap<String, JoinKey>,
}

impl JoinModel {
    pub fn new(relationship: ManyToMany) -> Self {
        let mut keys = IndexMap::new();
        keys.insert(
            relationship.parent_key.clone(),
            JoinKey {
                role: JoinRole::Parent,
                target_model: relationship.parent_model.clone(),
            },
        );
        keys.insert(
            relationship.related_key.clone(),
            JoinKey {
                role: JoinRole::Related,
                target_model: relationship.related_model.clone(),
            },
        );
        Self { relationship, keys }
    }

    pub fn relationship(&self) -> &ManyToMany {
        &self.relationship
    }

    pub fn key(&self, name: &str) -> Option<&JoinKey> {
        self.keys.get(name)
    }
}

impl Model for JoinModel {
    fn model_name(&self) -> String {
        format!("{}Model", self.relationship.join_table.to_upper_camel_case())
    }

    fn table_name(&self) -> String {
        self.relationship.join_table.clone()
    }

    fn timestamps(&self) -> bool {
        false
    }

    fn declared_fields(&self) -> Vec<Field> {
        self.keys
            .iter()
            .map(|(name, key)| Field::make(name).belongs_to(&key.target_model))
            .collect()
    }
}
