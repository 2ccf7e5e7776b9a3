use std::path::{Component, Path, PathBuf};

use crate::error::Error;

/// Project configuration loaded from `.fnref.toml`.
/// Include/exclude patterns are path prefixes applied to markdown files found
/// while enumerating a directory, relative to the directory holding the config.
#[derive(Debug, Default)]
pub struct Config {
    /// Prefixes that exclude an otherwise included file.
    exclude: Vec<String>,
    /// Prefixes a file must start with; empty means everything.
    include: Vec<String>,
    /// Descend into subdirectories without needing `--recursive`.
    pub recursive: bool,
    /// Directory the config was loaded from. Empty means the working directory.
    root: PathBuf,
}

/// Raw TOML structure for `.fnref.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct FnrefTomlConfig {
    /// See [`Config::exclude`].
    #[serde(default)]
    exclude: Vec<String>,
    /// See [`Config::include`].
    #[serde(default)]
    include: Vec<String>,
    /// See [`Config::recursive`].
    #[serde(default)]
    recursive: bool,
}

impl Config {
    /// Load config from `.fnref.toml` in the given root directory.
    /// Returns a default that checks everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed: a config the user
    /// wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".fnref.toml");
        let mut config = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => Self::parse(&c)?,
        };
        config.root = root.to_path_buf();
        return Ok(config);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: FnrefTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            recursive: raw.recursive,
            root: PathBuf::new(),
        });
    }

    /// Express `path` relative to the config root, as include/exclude see it.
    ///
    /// Both sides are canonicalized so `docs`, `./docs` and an absolute path
    /// all yield `docs/...`. Paths outside the root, or that cannot be
    /// canonicalized, fall back to their lexical form without `.` components.
    pub fn relative_to_root(&self, path: &Path) -> String {
        let root = if self.root.as_os_str().is_empty() { Path::new(".") } else { self.root.as_path() };
        if let (Ok(root), Ok(full)) = (root.canonicalize(), path.canonicalize())
            && let Ok(relative) = full.strip_prefix(&root)
        {
            return relative.to_string_lossy().into_owned();
        }
        let lexical: PathBuf = path
            .components()
            .filter(|c| return !matches!(c, Component::CurDir))
            .collect();
        return lexical.to_string_lossy().into_owned();
    }

    /// Check whether a markdown file path should be checked.
    ///
    /// A path is included if no include patterns are set (check everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_check(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
