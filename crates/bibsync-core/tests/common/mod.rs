pub mod directory;
pub mod fixtures;

use bibsync_core::BibEntry;

/// Build a raw entry
#[allow(dead_code)]
pub fn entry(id: &str, title: &str, authors: &[&str], year: &str, entry_type: &str) -> BibEntry {
    BibEntry {
        identifier: id.to_string(),
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        year: year.to_string(),
        entry_type: entry_type.to_string(),
    }
}
