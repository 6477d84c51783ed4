use std::path::PathBuf;

/// Configuration for the drift CLI.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub migration: MigrationConfig,
}

impl Config {
    pub fn migrations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.migration.migrations_path = path.into();
        self
    }

    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.migration.snapshot_path = path.into();
        self
    }
}

/// Where migration scripts and the snapshot baseline live.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Directory generated migration scripts are written to.
    pub migrations_path: PathBuf,

    /// Path of the persisted snapshot the next diff compares against.
    pub snapshot_path: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            migrations_path: PathBuf::from("migrations"),
            snapshot_path: PathBuf::from("migrations/schema.json"),
        }
    }
}
