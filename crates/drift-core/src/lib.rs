pub mod diff;
pub mod migrate;
pub mod schema;
pub mod snapshot;

mod error;
pub use error::Error;

pub use diff::SchemaDiff;
pub use schema::{Field, Model};
pub use snapshot::{Scanner, Snapshot};

/// A Result type alias that uses drift's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
