use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Args;
use drift_core::migrate::{migration_name, Renderer};
use drift_core::schema::ModelRegistry;
use drift_core::snapshot::SnapshotStore;
use drift_core::{Model, Scanner, SchemaDiff};

use crate::snapshot_file::JsonSnapshotStore;
use crate::Config;

/// Generate a migration script from the declared models.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Use this migration name instead of the derived one.
    #[arg(long)]
    pub name: Option<String>,
}

impl GenerateCommand {
    pub fn run(&self, models: &[&dyn Model], config: &Config) -> anyhow::Result<()> {
        let mut scanner = Scanner::new();
        let new = scanner.scan(models)?;

        let store = JsonSnapshotStore::new(&config.migration.snapshot_path);
        let old = store.load()?.unwrap_or_default();

        let up = SchemaDiff::from(&old, &new);
        let down = SchemaDiff::from(&new, &old);
        if up.is_empty() || down.is_empty() {
            println!("No changes.");
            return Ok(());
        }

        let unix_time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let name = match &self.name {
            Some(name) => name.clone(),
            None => migration_name(&up, unix_time),
        };

        let registry = ModelRegistry::from_models(models);
        let script = Renderer::new(&registry).script(&up, &down, &name)?;

        let dir = &config.migration.migrations_path;
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create migrations directory `{}`", dir.display()))?;

        // The unix-time prefix keeps scripts chronological by file name even
        // when a custom name is supplied; rollback relies on that order.
        let file = dir.join(format!("{unix_time}_{name}.sql"));
        fs::write(&file, script)
            .with_context(|| format!("failed to write migration `{}`", file.display()))?;
        store.save(&new)?;

        println!("Generated migration `{}`", file.display());
        Ok(())
    }
}
