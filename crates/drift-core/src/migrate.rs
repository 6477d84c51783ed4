mod name;
pub use name::migration_name;

mod op;
pub use op::{Change, ColumnDef, Op};

mod render;
pub use render::{sql, Renderer};
