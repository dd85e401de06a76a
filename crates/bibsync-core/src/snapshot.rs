//! Snapshot of the last synced field values
//!
//! The snapshot is the change-detection baseline: one record per identifier
//! holding the normalized values last confirmed on the remote side. On disk it
//! is a versioned bincode file, replaced atomically.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bibliography::EntryFields;
use crate::error::SnapshotError;

/// Current on-disk format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Last synced state of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub identifier: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub entry_type: String,
}

impl SnapshotRecord {
    pub fn new(identifier: impl Into<String>, fields: &EntryFields) -> Self {
        Self {
            identifier: identifier.into(),
            title: fields.title.clone(),
            authors: fields.authors.clone(),
            year: fields.year.clone(),
            entry_type: fields.entry_type.clone(),
        }
    }
}

/// Snapshot records keyed by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: HashMap<String, SnapshotRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: &str) -> Option<&SnapshotRecord> {
        self.records.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.records.contains_key(identifier)
    }

    /// Insert or replace the record for its identifier
    pub fn insert(&mut self, record: SnapshotRecord) -> Option<SnapshotRecord> {
        self.records.insert(record.identifier.clone(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by identifier
    pub fn records(&self) -> Vec<&SnapshotRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        records
    }
}

impl FromIterator<SnapshotRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = SnapshotRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// On-disk layout
#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    records: Vec<SnapshotRecord>,
}

/// Reads and writes the snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing file is an empty snapshot
    pub fn load(&self) -> Result<Snapshot, SnapshotError> {
        if !self.path.exists() {
            debug!("No snapshot at {}, starting empty", self.path.display());
            return Ok(Snapshot::new());
        }

        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let stored: SnapshotFile = bincode::deserialize_from(BufReader::new(file))?;

        if stored.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: stored.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut snapshot = Snapshot::new();
        for record in stored.records {
            let identifier = record.identifier.clone();
            if snapshot.insert(record).is_some() {
                return Err(SnapshotError::DuplicateIdentifier(identifier));
            }
        }

        debug!(
            "Loaded {} snapshot records from {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    /// Replace the snapshot file with `snapshot`
    ///
    /// Writes a sibling temporary file and renames it over the target, so a
    /// failed write leaves the previous snapshot intact.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let stored = SnapshotFile {
            version: SNAPSHOT_VERSION,
            records: snapshot.records().into_iter().cloned().collect(),
        };

        let tmp_path = self.tmp_path();
        {
            let file = File::create(&tmp_path).map_err(|source| SnapshotError::Io {
                path: tmp_path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, &stored)?;
            writer.flush().map_err(|source| SnapshotError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))?;

        debug!(
            "Wrote {} snapshot records to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
