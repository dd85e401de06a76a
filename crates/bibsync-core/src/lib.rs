//! bibsync core - keep a Notion database in step with a BibTeX file
//!
//! - **Bibliography**: nom-based BibTeX loader producing ordered entries
//! - **Normalize**: LaTeX accent, brace and quote cleanup for field values
//! - **Snapshot**: last synced values per identifier, stored with bincode
//! - **Notion**: blocking client for the target database behind the `Directory` trait
//! - **Reconcile**: New / Changed / Unchanged classification driving remote writes
//! - **Sync**: one complete run from file to snapshot
//!
//! # Flow
//!
//! ```text
//! references.bib → Bibliography → normalize → Reconciler ⇄ Directory (Notion)
//!                                                 ↓
//!                                          SnapshotStore (if dirty)
//! ```

pub mod bibliography;
pub mod config;
pub mod error;
pub mod normalize;
pub mod notion;
pub mod reconcile;
pub mod snapshot;
pub mod sync;

pub use bibliography::{BibEntry, Bibliography, EntryFields};
pub use config::{NotionConfig, SyncConfig};
pub use error::{
    BibliographyError, ConfigError, LookupError, RemoteError, Result, SnapshotError, SyncError,
    ValidationError,
};
pub use normalize::normalize;
pub use notion::{CreateOutcome, Directory, NotionClient, PageFields, PageId};
pub use reconcile::{classify, Action, FieldChange, Reconciler, Reconciliation, SyncReport};
pub use snapshot::{Snapshot, SnapshotRecord, SnapshotStore};
pub use sync::run_sync;
