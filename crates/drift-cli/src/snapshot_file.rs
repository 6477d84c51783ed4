use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use drift_core::snapshot::SnapshotStore;
use drift_core::Snapshot;

/// [`SnapshotStore`] over a pretty-printed JSON file.
///
/// `save` keeps the previous file as `<path>.old`; rollback restores it.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut path = OsString::from(self.path.as_os_str());
        path.push(".old");
        PathBuf::from(path)
    }

    /// Moves the `.old` backup back over the snapshot file. Errors when no
    /// backup exists.
    pub fn restore_backup(&self) -> anyhow::Result<()> {
        let backup = self.backup_path();
        if !backup.exists() {
            anyhow::bail!("no snapshot backup at `{}`", backup.display());
        }
        fs::rename(&backup, &self.path).with_context(|| {
            format!("failed to restore snapshot backup `{}`", backup.display())
        })?;
        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> anyhow::Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot `{}`", self.path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("malformed snapshot `{}`", self.path.display()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create snapshot directory `{}`", parent.display())
                })?;
            }
        }

        if self.path.exists() {
            fs::rename(&self.path, self.backup_path()).with_context(|| {
                format!("failed to back up snapshot `{}`", self.path.display())
            })?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write snapshot `{}`", self.path.display()))?;
        Ok(())
    }
}
