use serde_json::Value;

use crate::diff::FieldPatch;
use crate::schema::FieldSchema;

/// One structural operation of a migration, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
    },
    AlterTable {
        table: String,
        changes: Vec<Change>,
    },
    AddForeignKey {
        table: String,
        column: String,
        references_table: String,
        references_column: String,
    },
    DisableConstraints,
    EnableConstraints,
    DropTable {
        table: String,
    },
}

/// One clause of an alter-table operation.
///
/// `DisableConstraints`/`EnableConstraints` inside a change list bracket the
/// foreign-key drop for a single column without leaving the table's block.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    AddColumn(ColumnDef),
    ModifyColumn(ColumnDef),
    DropColumn(String),
    /// Drops the named column's foreign-key constraint.
    DropForeignKey(String),
    DisableConstraints,
    EnableConstraints,
}

/// Renderable column definition lowered from a field schema or patch.
///
/// The key flags keep the schema's presence semantics: `Some(true)` set,
/// `None` unset — and, when lowered from a patch, `Some(false)` is a removal
/// transition the renderer turns into a drop clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: String,
    pub type_args: Vec<Value>,

    pub nullable: Option<bool>,
    pub unsigned: Option<bool>,
    pub default: Option<Value>,
    pub raw_default: Option<String>,
    pub use_current: Option<bool>,

    pub index: Option<bool>,
    pub unique: Option<bool>,
    pub primary: Option<bool>,
}

impl ColumnDef {
    pub fn from_schema(name: &str, schema: &FieldSchema) -> Self {
        Self {
            name: name.to_string(),
            ty: schema.ty.clone(),
            type_args: schema.type_args.clone(),
            nullable: schema.nullable,
            unsigned: schema.unsigned,
            default: schema.default.clone(),
            raw_default: schema.raw_default.clone(),
            use_current: schema.use_current,
            index: schema.index,
            unique: schema.unique,
            primary: schema.primary,
        }
    }

    pub fn from_patch(name: &str, patch: &FieldPatch) -> Self {
        Self {
            name: name.to_string(),
            ty: patch.ty.clone(),
            type_args: patch.type_args.clone(),
            nullable: patch.nullable,
            unsigned: patch.unsigned,
            default: patch.default.clone(),
            raw_default: None,
            use_current: None,
            index: patch.index,
            unique: patch.unique,
            primary: patch.primary,
        }
    }
}
