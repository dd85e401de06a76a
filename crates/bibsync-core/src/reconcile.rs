//! Reconciliation of bibliography entries against the snapshot
//!
//! Each entry is classified against its snapshot record:
//! - **New**: no record, so the page is created
//! - **Changed**: a compared field differs, so the page is looked up and overwritten
//! - **Unchanged**: nothing is sent
//!
//! Entries are processed in reverse file order. Only confirmed remote writes
//! make the run dirty. The next snapshot holds the current values of every
//! entry that is unchanged or was synced, and keeps the previous record of an
//! entry whose write failed so the next run tries again.

use tracing::{debug, info, warn};

use crate::bibliography::{BibEntry, EntryFields};
use crate::error::{RemoteError, SyncError};
use crate::notion::{CreateOutcome, Directory, PageFields};
use crate::snapshot::{Snapshot, SnapshotRecord};

/// One compared field whose value moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub previous: String,
    pub current: String,
}

/// What to do with one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    New,
    Changed(Vec<FieldChange>),
    Unchanged,
}

/// Compare current values with the snapshot record, if any
pub fn classify(current: &EntryFields, previous: Option<&SnapshotRecord>) -> Action {
    let Some(previous) = previous else {
        return Action::New;
    };

    let pairs = [
        ("title", &previous.title, &current.title),
        ("authors", &previous.authors, &current.authors),
        ("year", &previous.year, &current.year),
        ("type", &previous.entry_type, &current.entry_type),
    ];

    let changes: Vec<FieldChange> = pairs
        .into_iter()
        .filter(|(_, before, after)| before != after)
        .map(|(field, before, after)| FieldChange {
            field,
            previous: before.clone(),
            current: after.clone(),
        })
        .collect();

    if changes.is_empty() {
        Action::Unchanged
    } else {
        Action::Changed(changes)
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pages submitted as new
    pub created: usize,
    /// New entries whose page already existed remotely
    pub adopted: usize,
    /// Pages overwritten
    pub updated: usize,
    pub unchanged: usize,
    /// Identifiers whose remote call failed or was skipped
    pub failed: Vec<String>,
}

impl SyncReport {
    /// Whether any remote write was confirmed
    pub fn is_dirty(&self) -> bool {
        self.created + self.adopted + self.updated > 0
    }
}

/// Outcome of reconciling a bibliography
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub report: SyncReport,
    /// Baseline for the next run; persist only when the report is dirty
    pub snapshot: Snapshot,
}

/// Drives create and update calls for a set of entries
pub struct Reconciler<'a, D: Directory + ?Sized> {
    directory: &'a D,
}

impl<'a, D: Directory + ?Sized> Reconciler<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Reconcile `entries` (in file order) against `previous`
    ///
    /// Fails only on a validation error, which aborts the run.
    pub fn reconcile(
        &self,
        entries: &[BibEntry],
        previous: &Snapshot,
    ) -> Result<Reconciliation, SyncError> {
        let mut report = SyncReport::default();
        let mut next = Snapshot::new();

        for entry in entries.iter().rev() {
            let fields = entry.normalized();
            let prior = previous.get(&entry.identifier);

            let synced = match classify(&fields, prior) {
                Action::Unchanged => {
                    debug!("'{}' unchanged", entry.identifier);
                    report.unchanged += 1;
                    true
                }
                Action::New => self.create(entry, &fields, &mut report)?,
                Action::Changed(changes) => {
                    info!("Detected changes for ID {}:", entry.identifier);
                    for change in &changes {
                        info!(
                            "  {}: {:?} -> {:?}",
                            change.field, change.previous, change.current
                        );
                    }
                    self.update(entry, &fields, &mut report)?
                }
            };

            if synced {
                next.insert(SnapshotRecord::new(entry.identifier.clone(), &fields));
            } else if let Some(prior) = prior {
                next.insert(prior.clone());
            }
        }

        Ok(Reconciliation {
            report,
            snapshot: next,
        })
    }

    fn create(
        &self,
        entry: &BibEntry,
        fields: &EntryFields,
        report: &mut SyncReport,
    ) -> Result<bool, SyncError> {
        let page_fields = PageFields::new(entry.identifier.clone(), fields);

        match self.directory.create(&page_fields) {
            Ok(CreateOutcome::Created(page)) => {
                info!("Added '{}' ({})", entry.identifier, page);
                report.created += 1;
                Ok(true)
            }
            Ok(CreateOutcome::AlreadyExists(page)) => {
                info!("'{}' already present as {}", entry.identifier, page);
                report.adopted += 1;
                Ok(true)
            }
            Err(e) => self.remote_failure(entry, e, report),
        }
    }

    fn update(
        &self,
        entry: &BibEntry,
        fields: &EntryFields,
        report: &mut SyncReport,
    ) -> Result<bool, SyncError> {
        let page_fields = PageFields::new(entry.identifier.clone(), fields);
        page_fields
            .validate()
            .map_err(|source| SyncError::Validation {
                reference_id: entry.identifier.clone(),
                source,
            })?;

        let page = match self.directory.find_page(&entry.identifier) {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    "Skipping update of '{}': page lookup failed: {}",
                    entry.identifier, e
                );
                report.failed.push(entry.identifier.clone());
                return Ok(false);
            }
        };

        match self.directory.update(&page, &page_fields) {
            Ok(()) => {
                info!("Updated '{}' ({})", entry.identifier, page);
                report.updated += 1;
                Ok(true)
            }
            Err(e) => self.remote_failure(entry, e, report),
        }
    }

    fn remote_failure(
        &self,
        entry: &BibEntry,
        error: RemoteError,
        report: &mut SyncReport,
    ) -> Result<bool, SyncError> {
        match error {
            RemoteError::Validation(source) => Err(SyncError::Validation {
                reference_id: entry.identifier.clone(),
                source,
            }),
            other => {
                warn!("Skipping '{}': {}", entry.identifier, other);
                report.failed.push(entry.identifier.clone());
                Ok(false)
            }
        }
    }
}
