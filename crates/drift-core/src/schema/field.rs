use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ManyToMany;
use crate::Result;

/// Builder for one column declaration.
///
/// Every configuration call consumes and returns the builder, so two fields
/// forked from the same starting point never share state. The terminal
/// [`Field::to_schema`] call produces the immutable [`FieldSchema`] fact.
#[derive(Debug, Clone)]
pub struct Field {
    /// The field name. Unique within its owning table.
    pub name: String,

    ty: Option<String>,
    type_args: Vec<Value>,

    cast: Option<String>,
    rules: Vec<String>,

    label: Option<String>,
    fillable: bool,
    guarded: bool,
    hidden: bool,
    visible: bool,

    index: bool,
    unique: bool,
    primary: bool,
    nullable: bool,
    unsigned: bool,

    default: Option<Value>,
    raw_default: Option<String>,
    use_current: bool,

    belongs_to: Option<ForeignKeyRef>,
    belongs_to_many: Option<ManyToMany>,
    has_one: Option<String>,
    has_many: Option<String>,
}

impl Field {
    pub fn make(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            type_args: vec![],
            cast: None,
            rules: vec![],
            label: None,
            fillable: false,
            guarded: false,
            hidden: false,
            visible: false,
            index: false,
            unique: false,
            primary: false,
            nullable: false,
            unsigned: false,
            default: None,
            raw_default: None,
            use_current: false,
            belongs_to: None,
            belongs_to_many: None,
            has_one: None,
            has_many: None,
        }
    }

    /// Sets the logical column type and its arguments.
    pub fn ty(mut self, tag: impl Into<String>, args: Vec<Value>) -> Self {
        self.ty = Some(tag.into());
        self.type_args = args;
        self
    }

    /// Auto-incrementing unsigned integer primary key.
    pub fn increments(self) -> Self {
        self.ty("increments", vec![])
    }

    pub fn string(self) -> Self {
        self.ty("string", vec![])
    }

    pub fn string_len(self, len: u64) -> Self {
        self.ty("string", vec![len.into()])
    }

    pub fn text(self) -> Self {
        self.ty("text", vec![])
    }

    pub fn integer(self) -> Self {
        self.ty("integer", vec![])
    }

    pub fn big_integer(self) -> Self {
        self.ty("bigInteger", vec![])
    }

    pub fn unsigned_integer(self) -> Self {
        self.ty("unsignedInteger", vec![])
    }

    pub fn boolean(self) -> Self {
        self.ty("boolean", vec![])
    }

    pub fn timestamp(self) -> Self {
        self.ty("timestamp", vec![])
    }

    pub fn datetime(self) -> Self {
        self.ty("datetime", vec![])
    }

    pub fn date(self) -> Self {
        self.ty("date", vec![])
    }

    pub fn decimal(self, precision: u64, scale: u64) -> Self {
        self.ty("decimal", vec![precision.into(), scale.into()])
    }

    pub fn json(self) -> Self {
        self.ty("json", vec![])
    }

    pub fn float(self) -> Self {
        self.ty("float", vec![])
    }

    /// Records a validation rule. Rules are ORM-runtime metadata and never
    /// reach the schema output.
    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = Some(cast.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn fillable(mut self) -> Self {
        self.fillable = true;
        self
    }

    pub fn guarded(mut self) -> Self {
        self.guarded = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn visible(mut self) -> Self {
        self.visible = true;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Raw (unencoded) default expression.
    pub fn raw_default(mut self, value: impl Into<String>) -> Self {
        self.raw_default = Some(value.into());
        self
    }

    pub fn use_current(mut self) -> Self {
        self.use_current = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self.rule("nullable")
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self.rule("min:0")
    }

    /// Marks this field as a foreign key pointing at `model`'s primary key.
    ///
    /// Forces the column type to an unsigned integer. The foreign-key column
    /// name is the field's own name.
    pub fn belongs_to(mut self, model: impl Into<String>) -> Self {
        let foreign_key = self.name.clone();
        self = self.unsigned_integer();
        self.belongs_to = Some(ForeignKeyRef {
            model: model.into(),
            foreign_key,
        });
        self
    }

    /// Declares a many-to-many relationship.
    ///
    /// The field itself never becomes a column: the scanner strips it from
    /// the owning table and synthesizes a join table from this metadata. The
    /// parent side of the descriptor is filled in during the scan.
    pub fn belongs_to_many(
        mut self,
        related_model: impl Into<String>,
        join_table: impl Into<String>,
        parent_key: impl Into<String>,
        related_key: impl Into<String>,
    ) -> Self {
        self.belongs_to_many = Some(ManyToMany {
            parent_model: String::new(),
            related_model: related_model.into(),
            join_table: join_table.into(),
            parent_key: parent_key.into(),
            related_key: related_key.into(),
        });
        self
    }

    /// Inverse-side relationship marker. Metadata only, no schema output.
    pub fn has_one(mut self, model: impl Into<String>) -> Self {
        self.has_one = Some(model.into());
        self
    }

    /// Inverse-side relationship marker. Metadata only, no schema output.
    pub fn has_many(mut self, model: impl Into<String>) -> Self {
        self.has_many = Some(model.into());
        self
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn many_to_many(&self) -> Option<&ManyToMany> {
        self.belongs_to_many.as_ref()
    }

    pub fn is_many_to_many(&self) -> bool {
        self.belongs_to_many.is_some()
    }

    /// Serializes the attributes that were explicitly set into an immutable
    /// schema fact. Fails when no type was configured; many-to-many carrier
    /// fields have no column representation and are stripped by the scanner
    /// before this is called.
    pub fn to_schema(&self, table: &str) -> Result<FieldSchema> {
        let Some(ty) = self.ty.clone() else {
            return Err(crate::Error::missing_field_type(table, &self.name));
        };

        Ok(FieldSchema {
            ty,
            type_args: self.type_args.clone(),
            index: self.index.then_some(true),
            unique: self.unique.then_some(true),
            primary: self.primary.then_some(true),
            default: self.default.clone(),
            raw_default: self.raw_default.clone(),
            nullable: self.nullable.then_some(true),
            unsigned: self.unsigned.then_some(true),
            belongs_to: self.belongs_to.clone(),
            use_current: self.use_current.then_some(true),
        })
    }
}

/// Immutable schema fact for one column.
///
/// Only attributes that were explicitly set are serialized; absence is not
/// `false`. Omitting unset keys keeps snapshots minimal and makes presence
/// itself the thing the diff engine compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub ty: String,
    pub type_args: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsigned: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belongs_to: Option<ForeignKeyRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_current: Option<bool>,
}

/// Foreign-key metadata carried by a belongs-to field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    /// Identifier of the target model.
    pub model: String,
    /// Name of the foreign-key column on the declaring table.
    pub foreign_key: String,
}
