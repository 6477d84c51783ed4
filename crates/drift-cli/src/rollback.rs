use std::fs;

use anyhow::Context;
use clap::Args;

use crate::snapshot_file::JsonSnapshotStore;
use crate::Config;

/// Undo the most recent `generate`: restore the previous snapshot baseline
/// and delete the newest migration script.
#[derive(Debug, Args)]
pub struct RollbackCommand {}

impl RollbackCommand {
    pub fn run(&self, config: &Config) -> anyhow::Result<()> {
        // The snapshot comes back first; a missing backup means there is
        // nothing to roll back to and the migration files stay put.
        let store = JsonSnapshotStore::new(&config.migration.snapshot_path);
        store.restore_backup()?;

        let dir = &config.migration.migrations_path;
        let mut migrations: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("failed to read migrations directory `{}`", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
            .collect();
        migrations.sort();

        let Some(latest) = migrations.pop() else {
            anyhow::bail!("no migration scripts in `{}`", dir.display());
        };
        fs::remove_file(&latest)
            .with_context(|| format!("failed to delete migration `{}`", latest.display()))?;

        println!("Rolled back `{}`", latest.display());
        Ok(())
    }
}
