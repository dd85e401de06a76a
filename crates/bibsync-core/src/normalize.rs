//! Text normalization for bibliography fields
//!
//! Cleans raw BibTeX values into the plain text that is compared against the
//! snapshot and sent to Notion.
//!
//! Steps run in a fixed order so that the output is a fixed point:
//! strip braces, normalize quote pairs, decode accent escapes, then collapse
//! whitespace runs (newlines included) to single spaces and trim. No step can
//! reintroduce input for an earlier one.

use lazy_static::lazy_static;

/// Authors value used when an entry has none
pub const UNKNOWN_AUTHOR: &str = "unknown author";

/// Entry type value used when an entry has none
pub const UNKNOWN_TYPE: &str = "unknown type";

/// Separator placed between authors on output
pub const AUTHOR_SEPARATOR: &str = "; ";

lazy_static! {
    static ref ACCENT_PATTERNS: Vec<(&'static str, &'static str)> = vec![
        // Umlaut (diaeresis)
        ("\\\"a", "ä"), ("\\\"A", "Ä"),
        ("\\\"e", "ë"), ("\\\"E", "Ë"),
        ("\\\"i", "ï"), ("\\\"I", "Ï"),
        ("\\\"o", "ö"), ("\\\"O", "Ö"),
        ("\\\"u", "ü"), ("\\\"U", "Ü"),
        ("\\\"y", "ÿ"),

        // Acute accent
        ("\\'a", "á"), ("\\'A", "Á"),
        ("\\'e", "é"), ("\\'E", "É"),
        ("\\'i", "í"), ("\\'I", "Í"),
        ("\\'o", "ó"), ("\\'O", "Ó"),
        ("\\'u", "ú"), ("\\'U", "Ú"),
        ("\\'y", "ý"), ("\\'Y", "Ý"),

        // Circumflex
        ("\\^a", "â"), ("\\^A", "Â"),
        ("\\^e", "ê"), ("\\^E", "Ê"),
        ("\\^i", "î"), ("\\^I", "Î"),
        ("\\^o", "ô"), ("\\^O", "Ô"),
        ("\\^u", "û"), ("\\^U", "Û"),

        // Grave accent
        ("\\`a", "à"), ("\\`A", "À"),
        ("\\`e", "è"), ("\\`E", "È"),
        ("\\`i", "ì"), ("\\`I", "Ì"),
        ("\\`o", "ò"), ("\\`O", "Ò"),
        ("\\`u", "ù"), ("\\`U", "Ù"),
    ];
}

/// Normalize a free-text field
pub fn normalize(input: &str) -> String {
    let mut result: String = input.chars().filter(|&c| c != '{' && c != '}').collect();

    result = result.replace("``", "\"").replace("''", "\"");

    if result.contains('\\') {
        for (pattern, replacement) in ACCENT_PATTERNS.iter() {
            result = result.replace(pattern, replacement);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize each author and join them with [`AUTHOR_SEPARATOR`]
///
/// Falls back to [`UNKNOWN_AUTHOR`] when nothing is left.
pub fn normalize_authors(authors: &[String]) -> String {
    let cleaned: Vec<String> = authors
        .iter()
        .map(|author| normalize(author))
        .filter(|author| !author.is_empty())
        .collect();

    if cleaned.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        cleaned.join(AUTHOR_SEPARATOR)
    }
}

/// Normalize an entry type, falling back to [`UNKNOWN_TYPE`]
pub fn normalize_entry_type(entry_type: &str) -> String {
    let cleaned = normalize(entry_type).to_lowercase();
    if cleaned.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        cleaned
    }
}
