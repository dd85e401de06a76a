//! One sync run: load, reconcile, persist

use tracing::info;

use crate::bibliography::Bibliography;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::notion::Directory;
use crate::reconcile::{Reconciler, SyncReport};
use crate::snapshot::SnapshotStore;

/// Sync the configured bibliography into `directory`
///
/// The snapshot is rewritten only when at least one remote write was
/// confirmed.
pub fn run_sync<D: Directory + ?Sized>(config: &SyncConfig, directory: &D) -> Result<SyncReport> {
    let bibliography = Bibliography::load(&config.bib_path)?;
    let store = SnapshotStore::new(&config.snapshot_path);
    let previous = store.load()?;

    info!(
        "Syncing {} entries ({} in snapshot)",
        bibliography.len(),
        previous.len()
    );

    let outcome = Reconciler::new(directory).reconcile(&bibliography.entries, &previous)?;

    if outcome.report.is_dirty() {
        store.save(&outcome.snapshot)?;
        info!("Snapshot written to {}", store.path().display());
    } else {
        info!("No remote changes, snapshot left as is");
    }

    let report = outcome.report;
    info!(
        "Done: {} created, {} already present, {} updated, {} unchanged, {} failed",
        report.created,
        report.adopted,
        report.updated,
        report.unchanged,
        report.failed.len()
    );

    Ok(report)
}
