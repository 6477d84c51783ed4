use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::{FieldSchema, ForeignKeyRef};
use crate::snapshot::Snapshot;

/// Structural delta between two snapshots.
///
/// Buckets are keyed in the iteration order of the side that defines them —
/// `new` for created/updated, `old` for deleted — and that order is what
/// drives the order rendered operations come out in. Diff results are
/// transient: computed fresh per invocation, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDiff {
    pub created: IndexMap<String, TableDiff>,
    pub updated: IndexMap<String, TableDiff>,
    pub deleted: IndexMap<String, TableDiff>,
}

impl SchemaDiff {
    /// Computes `diff(old, new)`.
    ///
    /// An empty result is the "nothing to do" signal — callers skip emitting
    /// a migration entirely and keep the old snapshot.
    pub fn from(old: &Snapshot, new: &Snapshot) -> SchemaDiff {
        let mut diff = SchemaDiff::default();
        let empty = IndexMap::new();

        for (table, next) in &new.tables {
            match old.tables.get(table) {
                None => {
                    diff.created
                        .insert(table.clone(), TableDiff::between(&empty, &next.fields));
                }
                Some(prev) => {
                    let table_diff = TableDiff::between(&prev.fields, &next.fields);
                    if !table_diff.is_empty() {
                        diff.updated.insert(table.clone(), table_diff);
                    }
                }
            }
        }

        for (table, prev) in &old.tables {
            if new.tables.contains_key(table) {
                continue;
            }

            // Relationship metadata is stripped before comparing: a table
            // dropped wholesale must not also emit per-field foreign-key
            // drops against itself. The self-comparison that follows is
            // always empty — the entry's name is what the renderer consumes.
            let stripped: IndexMap<String, FieldSchema> = prev
                .fields
                .iter()
                .map(|(name, schema)| {
                    let mut schema = schema.clone();
                    schema.belongs_to = None;
                    (name.clone(), schema)
                })
                .collect();

            diff.deleted
                .insert(table.clone(), TableDiff::between(&stripped, &stripped));
        }

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Field-level delta for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDiff {
    /// Fields present in new only, with their full schema.
    pub created: IndexMap<String, FieldSchema>,

    /// Fields present on both sides whose attributes differ.
    pub updated: IndexMap<String, FieldPatch>,

    /// Fields present in old only, with their old schema.
    pub deleted: IndexMap<String, FieldSchema>,
}

impl TableDiff {
    pub fn between(
        old: &IndexMap<String, FieldSchema>,
        new: &IndexMap<String, FieldSchema>,
    ) -> TableDiff {
        let mut diff = TableDiff::default();

        for (name, next) in new {
            match old.get(name) {
                None => {
                    diff.created.insert(name.clone(), next.clone());
                }
                Some(prev) => {
                    if let Some(patch) = FieldPatch::between(prev, next) {
                        diff.updated.insert(name.clone(), patch);
                    }
                }
            }
        }

        for (name, prev) in old {
            if !new.contains_key(name) {
                diff.deleted.insert(name.clone(), prev.clone());
            }
        }

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Sparse attribute patch for one updated field.
///
/// `ty`/`type_args` are always carried in full — a type change is never
/// reported partially. `default`, `nullable`, `unsigned` and `belongs_to`
/// are copied forward only when present on the new side; their removal is
/// not representable here. That asymmetry is inherited from the persisted
/// snapshot format and preserved for compatibility.
///
/// `index`/`unique`/`primary` are presence transitions: `Some(true)` means
/// newly present, `Some(false)` newly absent, `None` unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPatch {
    pub ty: String,
    pub type_args: Vec<Value>,

    pub default: Option<Value>,
    pub nullable: Option<bool>,
    pub unsigned: Option<bool>,
    pub belongs_to: Option<ForeignKeyRef>,

    pub index: Option<bool>,
    pub unique: Option<bool>,
    pub primary: Option<bool>,
}

impl FieldPatch {
    /// Returns `None` when the two schemas are attribute-equal.
    ///
    /// Every attribute participates in change detection — `raw_default` and
    /// `use_current` included — even though not all of them can appear in
    /// the resulting patch.
    pub fn between(prev: &FieldSchema, next: &FieldSchema) -> Option<FieldPatch> {
        if prev == next {
            return None;
        }

        Some(FieldPatch {
            ty: next.ty.clone(),
            type_args: next.type_args.clone(),
            default: next.default.clone(),
            nullable: next.nullable,
            unsigned: next.unsigned,
            belongs_to: next.belongs_to.clone(),
            index: transition(prev.index, next.index),
            unique: transition(prev.unique, next.unique),
            primary: transition(prev.primary, next.primary),
        })
    }
}

/// Presence transition between two optional flags.
fn transition(prev: Option<bool>, next: Option<bool>) -> Option<bool> {
    match (prev.is_some(), next.is_some()) {
        (false, true) => Some(true),
        (true, false) => Some(false),
        _ => None,
    }
}
