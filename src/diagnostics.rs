use std::fmt::Write as _;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const YELLOW: &str = "\x1b[33m";

/// Presentation category of a message. Never affects control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A document failed or the run could not proceed.
    Error,
    /// Informational fact about the run, e.g. nothing to check.
    Notice,
    /// Uncolored text.
    Plain,
    /// A document passed.
    Success,
    /// Extraction internals, shown only with `--verbose`.
    Verbose,
}

/// Writes messages to stderr, colored by severity.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    /// Whether ANSI color codes are emitted.
    color: bool,
    /// Whether `Severity::Verbose` messages are shown.
    verbose: bool,
}

/// Destination for human-facing messages.
///
/// Passed explicitly into every stage that wants to talk, so verbosity is an
/// argument rather than process state.
pub trait Sink {
    /// Deliver one message.
    fn emit(&self, severity: Severity, message: &str);
}

impl Console {
    /// Build a console sink. Color is also disabled when `NO_COLOR` is set.
    pub fn new(verbose: bool, color: bool) -> Self {
        let color = color && std::env::var_os("NO_COLOR").is_none();
        return Self { color, verbose };
    }

    /// Prefix and ANSI color for a severity.
    const fn style(severity: Severity) -> (&'static str, &'static str) {
        return match severity {
            Severity::Error => ("error: ", RED),
            Severity::Notice => ("note: ", YELLOW),
            Severity::Plain => ("", ""),
            Severity::Success => ("ok: ", GREEN),
            Severity::Verbose => ("", DIM),
        };
    }
}

impl Sink for Console {
    /// Print to stderr, dropping verbose output unless enabled.
    fn emit(&self, severity: Severity, message: &str) {
        if severity == Severity::Verbose && !self.verbose {
            return;
        }
        let (prefix, color) = Self::style(severity);
        if self.color && !color.is_empty() {
            eprintln!("{color}{prefix}{RESET}{message}");
        } else {
            eprintln!("{prefix}{message}");
        }
    }
}

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error, color: bool) {
    let md = render_error(e);
    for line in md.lines() {
        if color && line.starts_with('#') {
            eprintln!("{BOLD}{CYAN}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::Io(inner) => format!("\
# Error: I/O

{inner}
"),
        Error::Json(inner) => format!("\
# Error: JSON Output

{inner}
"),
        Error::PathNotFound { path } => render_path_not_found(&path.display().to_string()),
        Error::ReadFailed { path, source } => format!("\
# Error: Unreadable File

`{}` could not be read: {source}
", path.display()),
        Error::TomlDe(inner) => render_bad_config(&inner.to_string()),
        Error::Walk(inner) => format!("\
# Error: Directory Walk

{inner}
"),
        Error::Watch { reason } => format!("\
# Error: Watch

{reason}
"),
    };
}

/// Config file exists but does not parse.
fn render_bad_config(reason: &str) -> String {
    let mut out = String::from("\
# Error: Invalid `.fnref.toml`

");
    let _ = writeln!(out, "{reason}");
    out.push_str("\
\n## Fix

Recognized keys:

    include = [\"docs/\"]
    exclude = [\"docs/drafts/\"]
    recursive = false
");
    return out;
}

/// Nothing exists at the requested path.
fn render_path_not_found(path: &str) -> String {
    return format!("\
# Error: Path Not Found

`{path}` does not exist.

## Fix

Pass a markdown file or a directory containing markdown files:

    fnref README.md
    fnref docs/
");
}
