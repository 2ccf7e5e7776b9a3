//! Footnote marker and definition extraction from raw markdown text.
//!
//! Nothing here understands markdown structure: markers inside code blocks,
//! headings, or tables count the same as markers in prose.

use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Severity, Sink};
use crate::types::{DefinitionSet, ReferenceId, ReferenceOccurrences};

/// A definition line: marker at column zero, colon, whitespace, non-empty body.
#[allow(clippy::expect_used, reason = "hardcoded pattern, compile-time invariant")]
static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^\[\^([0-9]+)\]:\s+(.+)$").expect("valid regex"));

/// Any `[^digits]` marker anywhere on a line.
#[allow(clippy::expect_used, reason = "hardcoded pattern, compile-time invariant")]
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\[\^([0-9]+)\]").expect("valid regex"));

/// Collect the ids that have a well-formed definition line.
///
/// Each line is tested on its own, so the whitespace after the colon can
/// never borrow the next line as a body: `[^1]:` or `[^1]: ` alone defines nothing.
pub fn extract_definitions(content: &str, sink: &dyn Sink) -> DefinitionSet {
    let defined: DefinitionSet = content
        .lines()
        .filter_map(|line| return DEFINITION.captures(line))
        .filter_map(|cap| return cap.get(1).map(|m| return ReferenceId::from(m.as_str())))
        .collect();

    sink.emit(Severity::Verbose, &format!("definitions: {}", list_ids(defined.iter())));
    return defined;
}

/// Record every marker occurrence with its 1-based line number.
///
/// Definition lines contribute their own prefix as an occurrence; that is
/// harmless because the id is then defined by the same line.
pub fn extract_references(content: &str, sink: &dyn Sink) -> ReferenceOccurrences {
    let mut occurrences = ReferenceOccurrences::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        extract_references_from_line(line, line_number, &mut occurrences);
    }

    sink.emit(Severity::Verbose, &format!("references: {}", list_ids(occurrences.keys())));
    return occurrences;
}

/// Append each marker on one line, left to right.
fn extract_references_from_line(line: &str, line_number: u32, occurrences: &mut ReferenceOccurrences) {
    for cap in MARKER.captures_iter(line) {
        let Some(digits) = cap.get(1) else {
            continue;
        };
        occurrences
            .entry(ReferenceId::from(digits.as_str()))
            .or_default()
            .push(line_number);
    }
}

/// Numerically sorted, comma-separated ids for verbose output.
pub(crate) fn list_ids<'a>(ids: impl Iterator<Item = &'a ReferenceId>) -> String {
    let mut sorted: Vec<&ReferenceId> = ids.collect();
    if sorted.is_empty() {
        return "(none)".to_string();
    }
    sorted.sort();
    return sorted
        .iter()
        .map(|id| return id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ");
}
