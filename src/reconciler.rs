//! Reconciliation of marker occurrences against defined ids.

use crate::diagnostics::{Severity, Sink};
use crate::scanner::list_ids;
use crate::types::{DefinitionSet, MissingEntry, ReferenceOccurrences, Report};

/// Every referenced id absent from `defined`, ascending by numeric id.
///
/// Membership is plain id equality; definition lines are never rescanned here.
/// Line lists are carried over untouched, in the order they were recorded.
pub fn reconcile(occurrences: &ReferenceOccurrences, defined: &DefinitionSet, sink: &dyn Sink) -> Report {
    let mut missing: Vec<MissingEntry> = occurrences
        .iter()
        .filter(|(id, _)| return !defined.contains(*id))
        .map(|(id, lines)| {
            return MissingEntry {
                id: id.clone(),
                lines: lines.clone(),
            };
        })
        .collect();

    missing.sort_by(|a, b| return a.id.cmp(&b.id));

    sink.emit(
        Severity::Verbose,
        &format!("missing: {}", list_ids(missing.iter().map(|entry| return &entry.id))),
    );
    return Report { missing };
}
