use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Snapshot, TableSnapshot};
use crate::schema::{Field, JoinModel, Model};
use crate::{Error, Result};

/// Explicit cache of computed per-table field lists.
///
/// Owned by the [`Scanner`] and off by default: a fresh scan recomputes
/// every field list. With caching enabled, repeated scans of the same model
/// set reuse the computed lists; `invalidate` drops a single table.
#[derive(Debug, Default)]
pub struct FieldCache {
    entries: HashMap<String, Vec<Field>>,
}

impl FieldCache {
    pub fn invalidate(&mut self, table: &str) {
        self.entries.remove(table);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, table: &str) -> bool {
        self.entries.contains_key(table)
    }
}

/// Walks a set of declared models into a [`Snapshot`].
#[derive(Debug, Default)]
pub struct Scanner {
    cache: Option<FieldCache>,
}

impl Scanner {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn with_cache() -> Self {
        Self {
            cache: Some(FieldCache::default()),
        }
    }

    pub fn cache_mut(&mut self) -> Option<&mut FieldCache> {
        self.cache.as_mut()
    }

    /// Expands the declared models into a normalized snapshot.
    ///
    /// Tables appear in model order. A field carrying many-to-many metadata
    /// never becomes a column of its declaring table; instead it synthesizes
    /// a join table, inserted right after the declaring model's entry.
    ///
    /// The whole scan aborts on the first declaration error: a duplicate
    /// field name, or a typeless field that is not a many-to-many carrier.
    pub fn scan(&mut self, models: &[&dyn Model]) -> Result<Snapshot> {
        let mut snapshot = Snapshot::default();

        for model in models {
            let table = model.table_name();
            let fields = self.table_fields(*model)?;

            let mut schemas = IndexMap::new();
            let mut joins = vec![];

            for field in &fields {
                if let Some(relationship) = field.many_to_many() {
                    let relationship =
                        relationship.clone().for_parent(&model.model_name());
                    joins.push(JoinModel::new(relationship));
                    continue;
                }
                schemas.insert(field.name.clone(), field.to_schema(&table)?);
            }

            snapshot.tables.insert(
                table,
                TableSnapshot {
                    model: model.model_name(),
                    model_args: Value::Object(Map::new()),
                    fields: schemas,
                },
            );

            for join in joins {
                let join_table = join.table_name();
                let fields = self.table_fields(&join)?;

                let mut schemas = IndexMap::new();
                for field in &fields {
                    schemas.insert(field.name.clone(), field.to_schema(&join_table)?);
                }

                snapshot.tables.insert(
                    join_table,
                    TableSnapshot {
                        model: join.model_name(),
                        model_args: serde_json::to_value(join.relationship())
                            .unwrap_or(Value::Null),
                        fields: schemas,
                    },
                );
            }
        }

        Ok(snapshot)
    }

    fn table_fields(&mut self, model: &dyn Model) -> Result<Vec<Field>> {
        let table = model.table_name();

        if let Some(cache) = &self.cache {
            if let Some(fields) = cache.entries.get(&table) {
                return Ok(fields.clone());
            }
        }

        let fields = model.fields();

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.clone()) {
                return Err(Error::duplicate_field(&table, &field.name));
            }
        }

        if let Some(cache) = &mut self.cache {
            cache.entries.insert(table, fields.clone());
        }

        Ok(fields)
    }
}
