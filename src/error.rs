/// Crate-level error types for fnref diagnostics.
use std::path::PathBuf;

/// Everything that can stop a run before a document is judged.
///
/// Checking document text never fails; these come from the filesystem,
/// configuration, and output plumbing around it. Each variant names the path
/// or reason so the rendered diagnostic is useful on its own.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A JSON report could not be serialized.
    #[error("json: {0}")]
    Json(
        /// The wrapped serialization error.
        #[from]
        serde_json::Error,
    ),

    /// The path given on the command line does not exist.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// Path as given by the user.
        path: PathBuf,
    },

    /// A markdown file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFailed {
        /// File that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// TOML deserialization of `.fnref.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Directory traversal failed partway.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped directory walking error.
        #[from]
        walkdir::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
