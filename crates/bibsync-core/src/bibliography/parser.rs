//! BibTeX source parser built on nom
//!
//! Handles the subset of BibTeX a reference manager writes:
//! - `@string` macros (plus the builtin month abbreviations)
//! - `@preamble` and `@comment` blocks, which are skipped
//! - braced or parenthesised entry bodies
//! - braced, quoted, numeric and macro field values, joined with `#`
//!
//! Text between blocks is ignored. A block that fails to parse is recorded by
//! line number and parsing resumes at the next `@`.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};

/// An entry exactly as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawEntry {
    pub entry_type: String,
    pub cite_key: String,
    /// Field names are lower-cased; values keep their braces and escapes
    pub fields: Vec<(String, String)>,
    pub line: usize,
}

impl RawEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
pub(crate) struct ParsedSource {
    pub entries: Vec<RawEntry>,
    /// 1-based lines of blocks that could not be parsed
    pub failed_lines: Vec<usize>,
}

enum Block {
    Entry(RawEntry),
    Macro(String, String),
    Ignored,
}

pub(crate) fn parse_source(input: &str) -> ParsedSource {
    let mut parsed = ParsedSource::default();
    let mut macros = builtin_macros();
    let mut remaining = input;

    while let Some(at) = remaining.find('@') {
        let block = &remaining[at..];
        let line = line_of(input, block);

        match parse_block(block, &macros) {
            Ok((rest, Block::Entry(mut entry))) => {
                entry.line = line;
                parsed.entries.push(entry);
                remaining = rest;
            }
            Ok((rest, Block::Macro(name, value))) => {
                macros.insert(name, value);
                remaining = rest;
            }
            Ok((rest, Block::Ignored)) => remaining = rest,
            Err(_) => {
                parsed.failed_lines.push(line);
                remaining = &block[1..];
            }
        }
    }

    parsed
}

fn line_of(input: &str, suffix: &str) -> usize {
    let offset = input.len() - suffix.len();
    input[..offset].matches('\n').count() + 1
}

fn builtin_macros() -> HashMap<String, String> {
    [
        ("jan", "January"),
        ("feb", "February"),
        ("mar", "March"),
        ("apr", "April"),
        ("may", "May"),
        ("jun", "June"),
        ("jul", "July"),
        ("aug", "August"),
        ("sep", "September"),
        ("oct", "October"),
        ("nov", "November"),
        ("dec", "December"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn parse_block<'a>(input: &'a str, macros: &HashMap<String, String>) -> IResult<&'a str, Block> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, kind) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;
    let (rest, _) = multispace0(rest)?;

    match kind.to_ascii_lowercase().as_str() {
        "comment" => {
            let rest = skip_comment(rest);
            Ok((rest, Block::Ignored))
        }
        "preamble" => {
            let (rest, close) = open_body(rest)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = field_value(rest, macros)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = char(close)(rest)?;
            Ok((rest, Block::Ignored))
        }
        "string" => {
            let (rest, close) = open_body(rest)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, (name, value)) = field(rest, macros)?;
            let (rest, _) = multispace0(rest)?;
            let (rest, _) = char(close)(rest)?;
            Ok((rest, Block::Macro(name, value)))
        }
        _ => {
            let (rest, entry) = entry_body(rest, kind, macros)?;
            Ok((rest, Block::Entry(entry)))
        }
    }
}

/// `@comment{...}` skips a balanced group, otherwise the rest of the line
fn skip_comment(input: &str) -> &str {
    if let Ok((rest, _)) = braced(input) {
        return rest;
    }
    let end = input.find('\n').unwrap_or(input.len());
    &input[end..]
}

/// Opening delimiter of a block body; returns the matching closer
fn open_body(input: &str) -> IResult<&str, char> {
    alt((map(char('{'), |_| '}'), map(char('('), |_| ')')))(input)
}

fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !",{}()=\"#%".contains(c)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-.:".contains(c)
}

fn entry_body<'a>(
    input: &'a str,
    kind: &str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, RawEntry> {
    let (rest, close) = open_body(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, cite_key) = take_while1(is_cite_key_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let mut remaining = rest.strip_prefix(',').unwrap_or(rest);

    let mut entry = RawEntry {
        entry_type: kind.to_ascii_lowercase(),
        cite_key: cite_key.to_string(),
        fields: Vec::new(),
        line: 0,
    };

    loop {
        let (rest, _) = multispace0(remaining)?;
        if let Some(rest) = rest.strip_prefix(close) {
            return Ok((rest, entry));
        }

        let (rest, pair) = field(rest, macros)?;
        entry.fields.push(pair);

        let (rest, _) = multispace0(rest)?;
        remaining = rest.strip_prefix(',').unwrap_or(rest);
    }
}

/// `name = value`, with the name lower-cased
fn field<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, name) = take_while1(is_name_char)(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = field_value(rest, macros)?;

    Ok((rest, (name.to_ascii_lowercase(), value)))
}

/// One or more value parts joined with `#`
fn field_value<'a>(input: &'a str, macros: &HashMap<String, String>) -> IResult<&'a str, String> {
    let mut value = String::new();
    let mut remaining = input;

    loop {
        let (rest, part) = alt((
            map(braced, |inner: &str| inner.to_string()),
            map(quoted, |inner: &str| inner.to_string()),
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(take_while1(is_name_char), |name: &str| {
                macros
                    .get(&name.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or_else(|| name.to_string())
            }),
        ))(remaining)?;
        value.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(next) => {
                let (next, _) = multispace0(next)?;
                remaining = next;
            }
            None => return Ok((rest, value)),
        }
    }
}

fn delimiter_error(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

/// `{...}` with nesting; yields the text between the outer braces
fn braced(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(delimiter_error(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[1..pos]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(delimiter_error(input))
}

/// `"..."`; quotes nested inside braces do not terminate the value
fn quoted(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('"') {
        return Err(delimiter_error(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((&input[pos + 1..], &input[1..pos])),
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(delimiter_error(input))
}
