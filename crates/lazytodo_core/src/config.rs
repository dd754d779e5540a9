//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve the data root, log level and log directory from the environment.
//! - Derive every on-disk location from the data root.
//!
//! # Invariants
//! - `root_dir` and `log_dir` are absolute after resolution.
//! - Resolution never touches the filesystem beyond reading the current
//!   directory; only `ensure_users_dir` creates anything.

use crate::logging::default_log_level;
use log::info;
use std::path::{Path, PathBuf};

/// Overrides the data root (default: current working directory).
pub const ENV_HOME: &str = "LAZYTODO_HOME";
/// Overrides the log level (default: build-mode dependent).
pub const ENV_LOG_LEVEL: &str = "LAZYTODO_LOG_LEVEL";
/// Overrides the log directory (default: `<root>/logs`).
pub const ENV_LOG_DIR: &str = "LAZYTODO_LOG_DIR";

const USERS_DIR_NAME: &str = "Users";
const REGISTRY_FILE_NAME: &str = "mastersheet.txt";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub root_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from process environment.
    pub fn from_env() -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_lookup(&cwd, |key| std::env::var(key).ok()))
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Relative paths are resolved against `cwd`. Blank values count as unset.
    pub fn from_lookup(cwd: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let root_dir = value(ENV_HOME)
            .map(|raw| absolutize(cwd, raw.trim()))
            .unwrap_or_else(|| cwd.to_path_buf());
        let log_level = value(ENV_LOG_LEVEL)
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = value(ENV_LOG_DIR)
            .map(|raw| absolutize(cwd, raw.trim()))
            .unwrap_or_else(|| root_dir.join(LOG_DIR_NAME));

        Self {
            root_dir,
            log_level,
            log_dir,
        }
    }

    /// Directory holding one sub-directory per user.
    pub fn users_dir(&self) -> PathBuf {
        self.root_dir.join(USERS_DIR_NAME)
    }

    /// Credential registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.root_dir.join(REGISTRY_FILE_NAME)
    }

    /// Creates the users directory if absent. Returns `true` when created.
    pub fn ensure_users_dir(&self) -> std::io::Result<bool> {
        let users_dir = self.users_dir();
        if users_dir.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(&users_dir)?;
        info!("event=users_dir_create module=config status=ok");
        Ok(true)
    }
}

fn absolutize(cwd: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_HOME, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn resolve(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(Path::new("/work"), |key| env.get(key).cloned())
    }

    #[test]
    fn defaults_follow_working_directory() {
        let config = resolve(&[]);
        assert_eq!(config.root_dir, PathBuf::from("/work"));
        assert_eq!(config.log_dir, PathBuf::from("/work/logs"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.users_dir(), PathBuf::from("/work/Users"));
        assert_eq!(config.registry_path(), PathBuf::from("/work/mastersheet.txt"));
    }

    #[test]
    fn overrides_resolve_relative_paths() {
        let config = resolve(&[
            (ENV_HOME, "data"),
            (ENV_LOG_LEVEL, " warn "),
            (ENV_LOG_DIR, "/var/log/lazytodo"),
        ]);
        assert_eq!(config.root_dir, PathBuf::from("/work/data"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/lazytodo"));
    }

    #[test]
    fn ensure_users_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_lookup(dir.path(), |_| None);
        assert!(config.ensure_users_dir().unwrap());
        assert!(!config.ensure_users_dir().unwrap());
        assert!(config.users_dir().is_dir());
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = resolve(&[(ENV_HOME, "  ")]);
        assert_eq!(config.root_dir, PathBuf::from("/work"));
    }
}
