/// An error that can occur while scanning model declarations or rendering a
/// migration.
///
/// Declaration errors abort the whole scan; resolution errors abort the
/// render. An empty diff is *not* an error — see
/// [`SchemaDiff::is_empty`](crate::SchemaDiff::is_empty).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A declared field has no column type and carries no many-to-many
    /// metadata.
    #[error("field `{field}` on table `{table}` doesn't have a type")]
    MissingFieldType { table: String, field: String },

    /// Two fields on the same table share a name.
    #[error("field names must be unique, duplicate `{field}` on table `{table}`")]
    DuplicateField { table: String, field: String },

    /// A belongs-to relation references a model that cannot be resolved to a
    /// table and primary key.
    #[error("cannot resolve relation target `{model}` for foreign key `{column}`")]
    UnresolvedTarget { model: String, column: String },
}

impl Error {
    pub(crate) fn missing_field_type(table: &str, field: &str) -> Self {
        Self::MissingFieldType {
            table: table.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn duplicate_field(table: &str, field: &str) -> Self {
        Self::DuplicateField {
            table: table.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn unresolved_target(model: &str, column: &str) -> Self {
        Self::UnresolvedTarget {
            model: model.to_string(),
            column: column.to_string(),
        }
    }
}
