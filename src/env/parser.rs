//! Line-level parsing of unit files into raw variable assignments.
//!
//! Only a tiny subset of shell syntax is understood:
//! - full-line comments (`#` as the very first character)
//! - `[export ]KEY=VALUE` assignments, with one layer of double quotes stripped
//!
//! Inline comments are not recognised and end up in the value verbatim.

use crate::env::VariableSet;
use crate::error::UnitError;
use regex::Regex;
use std::sync::LazyLock;

static ASSIGNMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(export )?(\w+)=(.*)$").expect("Invalid assignment regex"));

/// A single `KEY=VALUE` pair as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssignment {
    pub key: String,
    pub value: String,
}

/// How one line of a unit file was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Comment,
    Assignment(RawAssignment),
    Ignored,
}

/// Classify a single line.
pub fn parse_line(line: &str) -> ParsedLine {
    if line.starts_with('#') {
        return ParsedLine::Comment;
    }

    match ASSIGNMENT_REGEX.captures(line) {
        Some(caps) => ParsedLine::Assignment(RawAssignment {
            key: caps[2].to_string(),
            value: strip_quotes(&caps[3]).to_string(),
        }),
        None => ParsedLine::Ignored,
    }
}

/// Remove one pair of surrounding double quotes, if present at both ends.
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Build a raw (unexpanded) variable set from lines of text.
///
/// # Errors
///
/// Returns [`UnitError::DuplicateKey`] on the first key that appears twice.
pub fn parse_lines<'a, I>(lines: I) -> Result<VariableSet, UnitError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut set = VariableSet::new();

    for line in lines {
        match parse_line(line) {
            ParsedLine::Assignment(assignment) => {
                if set.contains_key(&assignment.key) {
                    tracing::error!("Duplicate key '{}' found", assignment.key);
                    return Err(UnitError::DuplicateKey(assignment.key));
                }
                set.insert(assignment.key, assignment.value);
            }
            ParsedLine::Comment | ParsedLine::Ignored => {}
        }
    }

    Ok(set)
}
