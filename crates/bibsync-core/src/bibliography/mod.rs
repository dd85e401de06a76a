//! Bibliography loading
//!
//! Reads a BibTeX file into an ordered list of [`BibEntry`] records. Entries
//! of non-standard types are ignored, and only the first occurrence of a
//! duplicated cite key is kept.

mod entry;
mod parser;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::BibliographyError;

pub use entry::{
    is_standard_entry_type, split_authors, BibEntry, EntryFields, STANDARD_ENTRY_TYPES,
};

/// Entries of one bibliography file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    pub entries: Vec<BibEntry>,
}

impl Bibliography {
    /// Load and parse the file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BibliographyError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BibliographyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let bibliography = Self::from_source(&source);
        debug!(
            "Loaded {} entries from {}",
            bibliography.entries.len(),
            path.display()
        );
        Ok(bibliography)
    }

    /// Parse BibTeX text
    pub fn from_source(source: &str) -> Self {
        let parsed = parser::parse_source(source);

        for line in &parsed.failed_lines {
            warn!("Skipping unparseable block at line {}", line);
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(parsed.entries.len());

        for raw in parsed.entries {
            if !is_standard_entry_type(&raw.entry_type) {
                warn!(
                    "Ignoring '{}' at line {}: non-standard entry type @{}",
                    raw.cite_key, raw.line, raw.entry_type
                );
                continue;
            }

            if !seen.insert(raw.cite_key.clone()) {
                warn!(
                    "Ignoring duplicate identifier '{}' at line {}",
                    raw.cite_key, raw.line
                );
                continue;
            }

            entries.push(BibEntry {
                title: raw.field("title").unwrap_or_default().to_string(),
                authors: raw.field("author").map(split_authors).unwrap_or_default(),
                year: raw.field("year").unwrap_or_default().to_string(),
                entry_type: raw.entry_type,
                identifier: raw.cite_key,
            });
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
