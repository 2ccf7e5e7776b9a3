//! Document checking: the text-level `check` and its file/directory drivers.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::diagnostics::{Severity, Sink};
use crate::error::Error;
use crate::reconciler;
use crate::scanner;
use crate::types::{MissingEntry, Report};

/// How a document or a batch of documents should be walked and reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Print one JSON report line per document on stdout.
    pub json: bool,
    /// Descend into subdirectories when the path is a directory.
    pub recursive: bool,
}

/// Markdown files found in a directory, plus how many the config filtered out.
#[derive(Debug, Default)]
pub struct DocumentSet {
    /// Documents to check, in walk order.
    pub documents: Vec<PathBuf>,
    /// Markdown files skipped by include/exclude prefixes.
    pub filtered_out: usize,
}

/// JSON shape of one document's report.
#[derive(serde::Serialize)]
struct DocumentReport<'a> {
    /// Path of the checked document as given or enumerated.
    file: String,
    /// Undefined ids with their referencing lines.
    missing: &'a [MissingEntry],
}

/// Overall result of checking a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every checked document had a definition for every reference.
    Clean,
    /// A document referenced at least one undefined id.
    Missing,
}

/// Check one document's text for references without definitions.
///
/// Never fails: any text, empty or malformed, yields a report. The sink only
/// receives diagnostics and has no say in the result.
pub fn check(content: &str, sink: &dyn Sink) -> Report {
    let occurrences = scanner::extract_references(content, sink);
    let defined = scanner::extract_definitions(content, sink);
    return reconciler::reconcile(&occurrences, &defined, sink);
}

/// Read and check a single markdown file, reporting the outcome.
///
/// # Errors
///
/// Returns `Error::ReadFailed` if the file cannot be read as UTF-8 text,
/// or `Error::Json` if the JSON report cannot be produced.
pub fn check_document(path: &Path, options: CheckOptions, sink: &dyn Sink) -> Result<Report, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        return Error::ReadFailed { path: path.to_path_buf(), source };
    })?;

    sink.emit(Severity::Verbose, &format!("checking {}", path.display()));
    let report = check(&content, sink);
    report_document(path, &report, sink);

    if options.json {
        let line = serde_json::to_string(&DocumentReport {
            file: path.display().to_string(),
            missing: &report.missing,
        })?;
        println!("{line}");
    }

    return Ok(report);
}

/// Check a file, or every markdown file in a directory, stopping at the first
/// document with a missing definition.
///
/// # Errors
///
/// Returns `Error::PathNotFound` for a nonexistent path, and read, walk, or
/// JSON errors from the documents visited before the run stops.
pub fn check_path(path: &Path, config: &Config, options: CheckOptions, sink: &dyn Sink) -> Result<Verdict, Error> {
    if !path.exists() {
        return Err(Error::PathNotFound { path: path.to_path_buf() });
    }

    if !path.is_dir() {
        let report = check_document(path, options, sink)?;
        return Ok(verdict_for(&report));
    }

    let DocumentSet { documents, filtered_out } = markdown_documents(path, config, options.recursive)?;
    if documents.is_empty() {
        let notice = if filtered_out > 0 {
            format!("all {filtered_out} markdown file(s) in {} excluded by .fnref.toml", path.display())
        } else {
            format!("no markdown files in {}", path.display())
        };
        sink.emit(Severity::Notice, &notice);
        return Ok(Verdict::Clean);
    }

    for (index, document) in documents.iter().enumerate() {
        let report = check_document(document, options, sink)?;
        if !report.is_clean() {
            let skipped = documents.len().saturating_sub(index).saturating_sub(1);
            if skipped > 0 {
                sink.emit(
                    Severity::Notice,
                    &format!("stopped at first failure, {skipped} document(s) not checked"),
                );
            }
            return Ok(Verdict::Missing);
        }
    }

    let count = documents.len();
    sink.emit(Severity::Success, &format!("{count} document(s) checked, all footnotes defined"));
    return Ok(Verdict::Clean);
}

/// List markdown files in `dir`, sorted by name, after config filtering.
///
/// A markdown file is any non-directory entry whose name ends in `.md`.
/// Only direct children are listed unless `recursive` is set. Include and
/// exclude prefixes are matched against the path relative to the config root,
/// not relative to `dir`.
///
/// # Errors
///
/// Returns `Error::Walk` if a directory entry cannot be read.
pub fn markdown_documents(dir: &Path, config: &Config, recursive: bool) -> Result<DocumentSet, Error> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut set = DocumentSet::default();
    for entry in walker {
        let entry = entry?;
        let is_markdown = entry.file_name().to_string_lossy().ends_with(".md");
        if !is_markdown || entry.path().is_dir() {
            continue;
        }

        if !config.should_check(&config.relative_to_root(entry.path())) {
            set.filtered_out = set.filtered_out.saturating_add(1);
            continue;
        }
        set.documents.push(entry.into_path());
    }

    return Ok(set);
}

/// Emit one line per missing entry, or a success line for a clean document.
fn report_document(path: &Path, report: &Report, sink: &dyn Sink) {
    if report.is_clean() {
        sink.emit(Severity::Success, &format!("{}: all footnote references defined", path.display()));
        return;
    }

    for entry in &report.missing {
        sink.emit(
            Severity::Error,
            &format!(
                "{}: missing definition for {} referenced on {}",
                path.display(),
                entry.id,
                entry.describe_lines()
            ),
        );
    }
}

/// Map a single report onto a verdict.
fn verdict_for(report: &Report) -> Verdict {
    if report.is_clean() {
        return Verdict::Clean;
    }
    return Verdict::Missing;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::diagnostics::tests::Recorder;
    use crate::types::ReferenceId;

    fn entry(id: &str, lines: &[u32]) -> MissingEntry {
        MissingEntry { id: ReferenceId::from(id), lines: lines.to_vec() }
    }

    #[test]
    fn undefined_marker_is_reported() {
        let report = check("See [^1] and [^2].\n[^1]: First note.", &Recorder::default());
        assert_eq!(report.missing, [entry("2", &[1])]);
    }

    #[test]
    fn repeated_marker_with_definition_is_clean() {
        let report = check("[^5] [^5]\n[^5]: note", &Recorder::default());
        assert!(report.is_clean());
    }

    #[test]
    fn empty_bodied_definition_leaves_id_missing() {
        let report = check("[^3]: \nSee [^3].", &Recorder::default());
        assert_eq!(report.missing, [entry("3", &[1, 2])]);
    }

    #[test]
    fn text_without_markers_is_clean() {
        assert!(check("", &Recorder::default()).is_clean());
        assert!(check("# Title\n\nPlain prose [link](x.md).\n", &Recorder::default()).is_clean());
    }

    #[test]
    fn report_sorted_by_numeric_id_not_appearance() {
        let report = check("[^10] first, then [^2], then [^1]\n[^1]: defined", &Recorder::default());
        assert_eq!(report.missing, [entry("2", &[1]), entry("10", &[1])]);
    }

    #[test]
    fn verbosity_does_not_change_the_report() {
        let text = "a [^4]\nb [^4] [^9]\n[^9]: nine";
        let recorded = Recorder::default();
        let with_diagnostics = check(text, &recorded);
        let quiet = check(text, &crate::diagnostics::Console::new(false, false));
        assert_eq!(with_diagnostics, quiet);
        assert_eq!(recorded.of(Severity::Verbose).len(), 3);
    }

    #[test]
    fn directory_without_markdown_is_clean_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "[^1]").unwrap();
        let sink = Recorder::default();

        let verdict = check_path(dir.path(), &Config::default(), CheckOptions::default(), &sink).unwrap();
        assert_eq!(verdict, Verdict::Clean);
        assert_eq!(sink.of(Severity::Notice).len(), 1);
        assert!(sink.of(Severity::Verbose).is_empty());
    }

    #[test]
    fn directory_stops_at_first_failing_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "[^1]\n[^1]: ok").unwrap();
        std::fs::write(dir.path().join("b.md"), "[^2]").unwrap();
        std::fs::write(dir.path().join("c.md"), "[^3]").unwrap();
        let sink = Recorder::default();

        let verdict = check_path(dir.path(), &Config::default(), CheckOptions::default(), &sink).unwrap();
        assert_eq!(verdict, Verdict::Missing);

        let errors = sink.of(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("b.md: missing definition for [^2] referenced on line 1"));
        assert_eq!(sink.of(Severity::Notice), ["stopped at first failure, 1 document(s) not checked"]);
    }

    #[test]
    fn enumeration_is_shallow_unless_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("top.md"), "").unwrap();
        std::fs::write(dir.path().join("sub/deep.md"), "").unwrap();
        std::fs::write(dir.path().join("skip.markdown"), "").unwrap();

        let shallow = markdown_documents(dir.path(), &Config::default(), false).unwrap();
        assert_eq!(shallow.documents, [dir.path().join("top.md")]);

        let deep = markdown_documents(dir.path(), &Config::default(), true).unwrap();
        assert_eq!(deep.documents, [dir.path().join("sub/deep.md"), dir.path().join("top.md")]);
    }

    #[test]
    fn enumeration_applies_config_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("keep.md"), "").unwrap();
        std::fs::write(dir.path().join("draft.md"), "").unwrap();
        std::fs::write(dir.path().join(".fnref.toml"), "exclude = [\"draft\"]").unwrap();
        let config = Config::load(dir.path()).unwrap();

        let set = markdown_documents(dir.path(), &config, false).unwrap();
        assert_eq!(set.documents, [dir.path().join("keep.md")]);
        assert_eq!(set.filtered_out, 1);
    }

    #[test]
    fn include_prefix_is_relative_to_config_root_not_checked_dir() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("docs")).unwrap();
        std::fs::write(root.path().join("docs/guide.md"), "Broken[^1].").unwrap();
        std::fs::write(root.path().join(".fnref.toml"), "include = [\"docs/\"]").unwrap();
        let config = Config::load(root.path()).unwrap();
        let sink = Recorder::default();

        let verdict = check_path(&root.path().join("docs"), &config, CheckOptions::default(), &sink).unwrap();
        assert_eq!(verdict, Verdict::Missing);
        assert_eq!(sink.of(Severity::Error).len(), 1);
        assert!(sink.of(Severity::Notice).is_empty());
    }

    #[test]
    fn fully_filtered_directory_gets_its_own_notice() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("a.md"), "[^1]").unwrap();
        std::fs::write(root.path().join(".fnref.toml"), "include = [\"docs/\"]").unwrap();
        let config = Config::load(root.path()).unwrap();
        let sink = Recorder::default();

        let verdict = check_path(root.path(), &config, CheckOptions::default(), &sink).unwrap();
        assert_eq!(verdict, Verdict::Clean);
        let notices = sink.of(Severity::Notice);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].starts_with("all 1 markdown file(s) in "));
        assert!(notices[0].ends_with(" excluded by .fnref.toml"));
    }

    #[test]
    fn unreadable_document_halts_the_directory_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), [0xff_u8, 0xfe, 0x5b, 0x5e]).unwrap();
        std::fs::write(dir.path().join("b.md"), "Undefined[^1].").unwrap();
        let sink = Recorder::default();

        let result = check_path(dir.path(), &Config::default(), CheckOptions::default(), &sink);
        let Err(Error::ReadFailed { path, .. }) = &result else {
            panic!("expected a read failure, got {result:?}");
        };
        assert_eq!(*path, dir.path().join("a.md"));
        assert!(sink.of(Severity::Error).is_empty());
        assert!(sink.of(Severity::Success).is_empty());
    }

    #[test]
    fn nonexistent_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_path(&dir.path().join("gone.md"), &Config::default(), CheckOptions::default(), &Recorder::default());
        assert!(matches!(result, Err(Error::PathNotFound { .. })));
    }
}
