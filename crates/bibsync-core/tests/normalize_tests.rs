//! Normalizer properties

use bibsync_core::normalize;
use bibsync_core::normalize::{normalize_authors, normalize_entry_type};
use proptest::prelude::*;

#[test]
fn test_clean_string_is_unchanged() {
    let clean = "Über formal unentscheidbare Sätze";
    assert_eq!(normalize(clean), clean);
}

#[test]
fn test_all_quote_styles() {
    assert_eq!(
        normalize("He said ``hello'' and ''bye''"),
        "He said \"hello\" and \"bye\""
    );
}

proptest! {
    #[test]
    fn test_normalize_is_a_fixed_point(input in r#"[a-zA-Z \n{}\\"'^`]{0,40}"#) {
        let once = normalize(&input);
        prop_assert_eq!(normalize(&once), once.clone(), "normalize must be idempotent");
    }

    #[test]
    fn test_normalize_has_no_braces_or_edge_whitespace(input in "\\PC{0,60}") {
        let out = normalize(&input);
        prop_assert!(!out.contains('{') && !out.contains('}'), "output contains braces: {:?}", out);
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert!(!out.contains('\n'));
    }

    #[test]
    fn test_authors_never_empty(authors in prop::collection::vec("[a-zA-Z{} ]{0,10}", 0..4)) {
        prop_assert!(!normalize_authors(&authors).is_empty());
    }

    #[test]
    fn test_entry_type_never_empty(entry_type in "[a-zA-Z{} ]{0,12}") {
        prop_assert!(!normalize_entry_type(&entry_type).is_empty());
    }
}
