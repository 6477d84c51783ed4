use super::Snapshot;

/// Persistence seam for the diff baseline.
///
/// The store holds no lock: load-diff-save must be treated as one logical
/// transaction by the caller, and a single writer is assumed. The persisted
/// format must stay stable — old snapshots remain diff-able against newly
/// scanned ones indefinitely.
pub trait SnapshotStore {
    /// Loads the previously persisted snapshot, `None` when nothing was
    /// persisted yet.
    fn load(&self) -> anyhow::Result<Option<Snapshot>>;

    /// Persists `snapshot` as the next comparison baseline.
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
