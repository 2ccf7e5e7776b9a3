//! Top-level command flow: load config, check the path once or under watch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::checker::{self, CheckOptions, Verdict};
use crate::config::Config;
use crate::diagnostics::{self, Console};
use crate::error;
use crate::watch;

/// Everything the command line decided, resolved against config.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Emit ANSI colors.
    pub color: bool,
    /// Print one JSON line per document on stdout.
    pub json: bool,
    /// File or directory to check.
    pub path: PathBuf,
    /// Descend into subdirectories (flag or config).
    pub recursive: bool,
    /// Show extraction diagnostics.
    pub verbose: bool,
    /// Keep running and re-check on changes.
    pub watch: bool,
}

impl Invocation {
    /// Options handed to the checker for each pass.
    const fn options(&self) -> CheckOptions {
        return CheckOptions {
            json: self.json,
            recursive: self.recursive,
        };
    }
}

/// Check the path once.
///
/// # Errors
///
/// Returns errors from path resolution, file reading, or directory walking.
pub fn check(invocation: &Invocation, config: &Config) -> Result<ExitCode, error::Error> {
    let sink = Console::new(invocation.verbose, invocation.color);
    let verdict = checker::check_path(&invocation.path, config, invocation.options(), &sink)?;
    return Ok(exit_code_for(verdict));
}

/// Exit status for a verdict: 0 clean, 1 missing definitions.
const fn exit_code_for(verdict: Verdict) -> ExitCode {
    return match verdict {
        Verdict::Clean => ExitCode::SUCCESS,
        Verdict::Missing => ExitCode::FAILURE,
    };
}

/// Run the command line: config, then a single check or watch mode.
/// Errors are printed as markdown diagnostics and mapped to exit status 1.
pub fn run(mut invocation: Invocation) -> ExitCode {
    let config = match Config::load(Path::new(".")) {
        Err(e) => {
            diagnostics::print_error(&e, invocation.color);
            return ExitCode::FAILURE;
        },
        Ok(c) => c,
    };
    invocation.recursive = invocation.recursive || config.recursive;

    let result = if invocation.watch {
        watch::run(&invocation, &config)
    } else {
        check(&invocation, &config)
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e, invocation.color);
            ExitCode::FAILURE
        },
        Ok(code) => code,
    };
}
