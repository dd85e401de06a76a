//! Bibliography entry data structures

use crate::normalize::{normalize, normalize_authors, normalize_entry_type};

/// Entry types accepted from the source file and by the Notion `Item type`
/// select property
pub const STANDARD_ENTRY_TYPES: &[&str] = &[
    "article",
    "book",
    "booklet",
    "conference",
    "inbook",
    "incollection",
    "inproceedings",
    "manual",
    "mastersthesis",
    "misc",
    "phdthesis",
    "proceedings",
    "techreport",
    "unpublished",
];

/// Whether `entry_type` is one of [`STANDARD_ENTRY_TYPES`] (case-insensitive)
pub fn is_standard_entry_type(entry_type: &str) -> bool {
    let lower = entry_type.to_ascii_lowercase();
    STANDARD_ENTRY_TYPES.contains(&lower.as_str())
}

/// One bibliography record as loaded from the source file
///
/// Values are raw: braces, accent escapes and quote pairs are still present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// Cite key, unique within the file
    pub identifier: String,
    pub title: String,
    /// Authors in source order
    pub authors: Vec<String>,
    pub year: String,
    pub entry_type: String,
}

impl BibEntry {
    /// Clean every field into the values that are compared and synced
    pub fn normalized(&self) -> EntryFields {
        EntryFields {
            title: normalize(&self.title),
            authors: normalize_authors(&self.authors),
            year: normalize(&self.year),
            entry_type: normalize_entry_type(&self.entry_type),
        }
    }
}

/// The four compared fields of an entry, after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub title: String,
    /// Authors joined with `"; "`
    pub authors: String,
    pub year: String,
    pub entry_type: String,
}

/// Split a raw BibTeX `author` value on top-level `and`
///
/// The separator is matched without regard to case. `and` inside braces is
/// part of a name (`{Barnes and Noble}`).
pub fn split_authors(raw: &str) -> Vec<String> {
    let mut authors = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut depth: i32 = 0;

    for token in raw.split_whitespace() {
        if depth == 0 && token.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                authors.push(current.join(" "));
                current.clear();
            }
            continue;
        }

        for c in token.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
        current.push(token);
    }

    if !current.is_empty() {
        authors.push(current.join(" "));
    }

    authors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Smith, J. and Doe, A."),
            vec!["Smith, J.", "Doe, A."]
        );
        assert_eq!(
            split_authors("Smith, J.\n    and Doe, A."),
            vec!["Smith, J.", "Doe, A."]
        );
        assert_eq!(split_authors("{Barnes and Noble}"), vec!["{Barnes and Noble}"]);
        assert_eq!(split_authors("Anderson, B."), vec!["Anderson, B."]);
        assert_eq!(split_authors("Smith AND Doe"), vec!["Smith", "Doe"]);
        assert_eq!(split_authors("Smith And Doe and Roe"), vec!["Smith", "Doe", "Roe"]);
        assert_eq!(split_authors("{Barnes AND Noble}"), vec!["{Barnes AND Noble}"]);
        assert!(split_authors("   ").is_empty());
    }

    #[test]
    fn test_standard_entry_types() {
        assert!(is_standard_entry_type("article"));
        assert!(is_standard_entry_type("PhDThesis"));
        assert!(!is_standard_entry_type("online"));
        assert!(!is_standard_entry_type("unknown type"));
    }

    #[test]
    fn test_normalized_fields() {
        let entry = BibEntry {
            identifier: "smith2020".to_string(),
            title: "A {Study}".to_string(),
            authors: vec!["Smith, J.".to_string(), "Doe, A.".to_string()],
            year: "2020".to_string(),
            entry_type: "article".to_string(),
        };

        let fields = entry.normalized();
        assert_eq!(fields.title, "A Study");
        assert_eq!(fields.authors, "Smith, J.; Doe, A.");
        assert_eq!(fields.year, "2020");
        assert_eq!(fields.entry_type, "article");
    }

    #[test]
    fn test_normalized_fallbacks() {
        let entry = BibEntry {
            identifier: "anon".to_string(),
            title: "Untitled".to_string(),
            authors: Vec::new(),
            year: String::new(),
            entry_type: String::new(),
        };

        let fields = entry.normalized();
        assert_eq!(fields.authors, crate::normalize::UNKNOWN_AUTHOR);
        assert_eq!(fields.entry_type, crate::normalize::UNKNOWN_TYPE);
        assert_eq!(fields.year, "");
    }
}
