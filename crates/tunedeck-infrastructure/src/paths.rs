//! Unified path management for TuneDeck files.
//!
//! Directories are resolved with the `dirs` crate so the layout follows
//! platform conventions (XDG on Linux, `Application Support` on macOS,
//! `AppData` on Windows). Tests and the CLI can pin everything under a single
//! base directory instead.

use std::path::{Path, PathBuf};
use tunedeck_core::TunedeckError;

const APP_DIR: &str = "tunedeck";

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "TUNEDECK_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for TunedeckError {
    fn from(err: PathError) -> Self {
        TunedeckError::config(err.to_string())
    }
}

/// Path resolver for TuneDeck.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tunedeck/          # Config directory
/// ├── config.toml              # Client configuration
/// ├── session.toml             # Persisted bearer token (0600)
/// └── logs/                    # Application logs
///     └── tunedeck.log.YYYY-MM-DD
///
/// ~/Downloads/                 # Default target for song downloads
/// ```
#[derive(Debug, Clone, Default)]
pub struct TunedeckPaths {
    base: Option<PathBuf>,
}

impl TunedeckPaths {
    /// Creates a resolver. With `base` set, every file lives under it.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Honors `TUNEDECK_CONFIG_DIR` when set, otherwise the platform default.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(Some(Path::new(&dir))),
            _ => Self::new(None),
        }
    }

    /// Returns the TuneDeck configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/tunedeck/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session.
    ///
    /// # Security Note
    ///
    /// This file holds the bearer token; it is written with 600 permissions on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Where downloads are saved.
    ///
    /// Priority: explicit override, then `<base>/downloads` when pinned,
    /// then the platform download directory, then `./downloads`.
    pub fn download_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(base) = &self.base {
            return base.join("downloads");
        }
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("downloads"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_dir() {
        // Headless CI may have no home directory at all.
        if let Ok(config_dir) = TunedeckPaths::new(None).config_dir() {
            assert!(config_dir.ends_with("tunedeck"));
        }
    }

    #[test]
    fn test_files_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TunedeckPaths::new(Some(temp_dir.path()));

        assert_eq!(paths.config_dir().unwrap(), temp_dir.path());
        assert_eq!(paths.config_file().unwrap(), temp_dir.path().join("config.toml"));
        assert_eq!(paths.session_file().unwrap(), temp_dir.path().join("session.toml"));
        assert!(paths.logs_dir().unwrap().starts_with(temp_dir.path()));
        assert_eq!(paths.download_dir(None), temp_dir.path().join("downloads"));
    }

    #[test]
    fn test_download_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TunedeckPaths::new(Some(temp_dir.path()));
        let out = temp_dir.path().join("elsewhere");

        assert_eq!(paths.download_dir(Some(&out)), out);
    }
}
