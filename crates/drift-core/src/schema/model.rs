use indexmap::IndexMap;

use super::{Field, JoinModel};

/// A declared data model: one table plus its ordered field declarations.
pub trait Model {
    /// Identifier used for relation targets and snapshot provenance.
    fn model_name(&self) -> String;

    fn table_name(&self) -> String;

    fn primary_key_name(&self) -> String {
        "id".to_string()
    }

    /// When true, `created_at`/`updated_at` fields are added to the table.
    fn timestamps(&self) -> bool {
        true
    }

    /// Fields declared by the model author, without the implicit ones.
    fn declared_fields(&self) -> Vec<Field>;

    /// Full ordered field list: the implicit auto-increment primary key
    /// first, then the declared fields, then the timestamp pair when
    /// timestamping is enabled.
    fn fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::make("id").increments()];
        fields.extend(self.declared_fields());
        if self.timestamps() {
            fields.push(Field::make("created_at").timestamp().nullable().index());
            fields.push(Field::make("updated_at").timestamp().nullable().index());
        }
        fields
    }
}

/// Table and primary-key coordinates of a resolved relation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub table: String,
    pub primary_key: String,
}

/// Resolution of model identifiers to their table coordinates.
///
/// Consumed by the migration renderer when emitting foreign-key operations.
pub trait ResolveTarget {
    fn resolve_target(&self, model: &str) -> Option<Target>;
}

/// Registry of model identifiers built from a scanned model set.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    targets: IndexMap<String, Target>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry over the given models and the join models their
    /// many-to-many carrier fields synthesize.
    pub fn from_models(models: &[&dyn Model]) -> Self {
        let mut registry = Self::default();
        for model in models {
            registry.insert(*model);
            for field in model.declared_fields() {
                if let Some(relationship) = field.many_to_many() {
                    let join =
                        JoinModel::new(relationship.clone().for_parent(&model.model_name()));
                    registry.insert(&join);
                }
            }
        }
        registry
    }

    pub fn insert(&mut self, model: &dyn Model) {
        self.targets.insert(
            model.model_name(),
            Target {
                table: model.table_name(),
                primary_key: model.primary_key_name(),
            },
        );
    }
}

impl ResolveTarget for ModelRegistry {
    fn resolve_target(&self, model: &str) -> Option<Target> {
        self.targets.get(model).cloned()
    }
}
