//! File watcher: runs `check` on startup, then re-runs on document changes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, Invocation};
use crate::config::Config;
use crate::diagnostics::{self, Console, Severity, Sink as _};
use crate::error;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Where to attach the watcher, how deep, and which file name to filter on.
#[derive(Debug, PartialEq, Eq)]
struct WatchTarget {
    /// Directory handed to the watcher.
    dir: PathBuf,
    /// Only events touching this name count; `None` accepts everything.
    file_name: Option<OsString>,
    /// Recursion mode for `dir`.
    mode: RecursiveMode,
}

/// Whether an event is a content change that concerns the watched file.
fn concerns_target(event: &notify::Event, file_name: Option<&OsString>) -> bool {
    let is_change = matches!(
        event.kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
    );
    let Some(name) = file_name else {
        return is_change;
    };
    return is_change
        && event
            .paths
            .iter()
            .any(|p| return p.file_name().is_some_and(|n| return n == name.as_os_str()));
}

/// Create a filesystem watcher that sends relevant events on the given channel.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    file_name: Option<OsString>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && concerns_target(&event, file_name.as_ref())
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for watch mode.
///
/// Runs an initial check, then watches the checked path and re-checks on
/// changes. Returns the exit code of the last check once the channel closes.
///
/// # Errors
///
/// Returns `Error::PathNotFound` if the path is missing at startup, or
/// `Error::Watch` if the watcher cannot be set up.
pub fn run(invocation: &Invocation, config: &Config) -> Result<ExitCode, error::Error> {
    if !invocation.path.exists() {
        return Err(error::Error::PathNotFound { path: invocation.path.clone() });
    }

    let sink = Console::new(invocation.verbose, invocation.color);
    sink.emit(Severity::Plain, "watch: initial check");
    let mut last_code = run_check(invocation, config);

    let target = watch_target(&invocation.path, invocation.recursive);
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, target.file_name)?;

    watcher.watch(&target.dir, target.mode).map_err(|e| {
        return error::Error::Watch {
            reason: format!("cannot watch {}: {e}", target.dir.display()),
        };
    })?;

    sink.emit(
        Severity::Plain,
        &format!("watch: monitoring {}, press Ctrl+C to stop", invocation.path.display()),
    );

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        sink.emit(Severity::Plain, "watch: change detected, re-checking...");
        last_code = run_check(invocation, config);
    }

    return Ok(last_code);
}

/// Run check once and print any error. Returns the exit code from check.
fn run_check(invocation: &Invocation, config: &Config) -> ExitCode {
    return match commands::check(invocation, config) {
        Err(e) => {
            diagnostics::print_error(&e, invocation.color);
            ExitCode::FAILURE
        },
        Ok(code) => code,
    };
}

/// Resolve what to attach the watcher to.
///
/// A file is watched through its parent directory: editors that save by
/// renaming a temp file over the original replace the inode, and a watch on
/// the old inode would never fire again.
fn watch_target(path: &Path, recursive: bool) -> WatchTarget {
    if path.is_dir() {
        let mode = if recursive { RecursiveMode::Recursive } else { RecursiveMode::NonRecursive };
        return WatchTarget { dir: path.to_path_buf(), file_name: None, mode };
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    return WatchTarget {
        dir,
        file_name: path.file_name().map(OsString::from),
        mode: RecursiveMode::NonRecursive,
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
    use notify::{Event, EventKind};

    use super::*;

    #[test]
    fn file_is_watched_through_its_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        std::fs::write(&doc, "").unwrap();

        let target = watch_target(&doc, true);
        assert_eq!(target.dir, dir.path());
        assert_eq!(target.file_name, Some(OsString::from("doc.md")));
        assert_eq!(target.mode, RecursiveMode::NonRecursive);
    }

    #[test]
    fn bare_file_name_watches_working_directory() {
        let target = watch_target(Path::new("doc.md"), false);
        assert_eq!(target.dir, PathBuf::from("."));
        assert_eq!(target.file_name, Some(OsString::from("doc.md")));
    }

    #[test]
    fn directory_is_watched_directly() {
        let dir = tempfile::tempdir().unwrap();
        let target = watch_target(dir.path(), true);
        assert_eq!(target, WatchTarget { dir: dir.path().to_path_buf(), file_name: None, mode: RecursiveMode::Recursive });
    }

    #[test]
    fn every_atomic_save_reaches_the_target() {
        let name = OsString::from("doc.md");
        let dir = Path::new("/work");

        for _ in 0..3 {
            let temp_write = Event::new(EventKind::Create(CreateKind::File)).add_path(dir.join(".doc.md.swp"));
            let rename = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(dir.join(".doc.md.swp"))
                .add_path(dir.join("doc.md"));
            assert!(!concerns_target(&temp_write, Some(&name)));
            assert!(concerns_target(&rename, Some(&name)));
        }

        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path(dir.join("doc.md"));
        assert!(concerns_target(&removed, Some(&name)));
    }

    #[test]
    fn access_events_are_ignored() {
        let open = Event::new(EventKind::Access(notify::event::AccessKind::Read)).add_path(PathBuf::from("doc.md"));
        assert!(!concerns_target(&open, None));
    }

    #[test]
    fn directory_watch_accepts_any_change() {
        let other = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/work/other.md"));
        assert!(concerns_target(&other, None));
    }
}
