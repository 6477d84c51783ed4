mod field;
pub use field::{Field, FieldSchema, ForeignKeyRef};

mod join;
pub use join::{JoinKey, JoinModel, JoinRole, ManyToMany};

mod model;
pub use model::{Model, ModelRegistry, ResolveTarget, Target};
