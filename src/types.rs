//! Core domain types for fnref: reference ids, occurrences, definitions, and reports.
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Ids that have a valid definition line somewhere in the document.
pub type DefinitionSet = HashSet<ReferenceId>;

/// Every line (1-based, document order) on which each id appears as a marker.
pub type ReferenceOccurrences = HashMap<ReferenceId, Vec<u32>>;

/// A referenced id with no definition, plus every line that references it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MissingEntry {
    /// The undefined footnote id.
    pub id: ReferenceId,
    /// One-based line numbers of each marker occurrence, in recorded order.
    pub lines: Vec<u32>,
}

impl MissingEntry {
    /// Human phrasing of the referencing lines: `line 4` or `lines 1, 4, 9`.
    pub fn describe_lines(&self) -> String {
        if let [only] = self.lines.as_slice() {
            return format!("line {only}");
        }
        let joined = self
            .lines
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return format!("lines {joined}");
    }
}

/// The digit string inside `[^...]`.
///
/// Equality is textual, so `01` and `1` are different ids. Ordering is by
/// numeric value with no width limit, falling back to the raw text when two
/// spellings share a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ReferenceId(
    /// The ASCII digits exactly as written in the document.
    pub String,
);

impl ReferenceId {
    /// The id with leading zeros removed. `"000"` collapses to `"0"`.
    fn significant_digits(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() && !self.0.is_empty() {
            return "0";
        }
        return trimmed;
    }
}

impl fmt::Display for ReferenceId {
    /// Writes the id in marker form, e.g. `[^12]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "[^{}]", self.0);
    }
}

impl From<&str> for ReferenceId {
    /// Wrap a digit string taken from a regex capture.
    fn from(digits: &str) -> Self {
        return Self(digits.to_string());
    }
}

impl Ord for ReferenceId {
    /// Numeric comparison on digit strings: fewer significant digits is smaller,
    /// equal lengths compare lexically, then the raw spelling breaks ties.
    ///
    /// Spellings of the same value therefore never compare equal: `"01"` sorts
    /// before `"1"` wherever each first appeared in the document, rather than
    /// keeping first-appearance order as a stable sort on the integer value would.
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = (self.significant_digits(), other.significant_digits());
        return lhs
            .len()
            .cmp(&rhs.len())
            .then_with(|| return lhs.cmp(rhs))
            .then_with(|| return self.0.cmp(&other.0));
    }
}

impl PartialOrd for ReferenceId {
    /// Delegate to `Ord` implementation.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

/// Outcome of checking one document. Entries are sorted by numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    /// Referenced ids with no definition, ascending by numeric value.
    pub missing: Vec<MissingEntry>,
}

impl Report {
    /// True when every referenced id has a definition.
    pub fn is_clean(&self) -> bool {
        return self.missing.is_empty();
    }
}
