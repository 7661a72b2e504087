//! Persisted task selection.
//!
//! # Storage layout
//!
//! ```text
//! ~/.macup.json     { "selectedUpdates": ["Homebrew", "VSCode"] }
//! ```
//!
//! # API pattern
//!
//! [`ConfigStore::at`] takes an explicit path and is what tests use;
//! [`ConfigStore::default_location`] derives `~/.macup.json` from
//! `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{io_err, ConfigError};

/// File name of the config document, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".macup.json";

// ---------------------------------------------------------------------------
// 1. Document
// ---------------------------------------------------------------------------

/// The user's last task selection — the only durable state macup keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Task names in the order the user picked them. An explicit `null`
    /// reads as an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub selected_updates: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Config {
    pub fn with_selection<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_updates: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_updates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// 2. Store
// ---------------------------------------------------------------------------

/// Reads and writes a [`Config`] at a fixed path.
///
/// No locking: one process loads at most once and saves at most once per run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<home>/.macup.json`.
    pub fn in_home(home: &Path) -> Self {
        Self::at(home.join(CONFIG_FILE_NAME))
    }

    /// `~/.macup.json` for the current user.
    pub fn default_location() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(Self::in_home(&home))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config.
    ///
    /// A missing file yields `Config::default()`. A file that is not a valid
    /// config document yields [`ConfigError::Parse`] with the offending path.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(err) => return Err(io_err(&self.path, err)),
        };
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with `config`, atomically.
    ///
    /// Write flow: pretty JSON → `.json.tmp` sibling → `chmod 0644` → `rename`.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        let tmp = self.tmp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, e));
        }
        tracing::debug!(
            path = %self.path.display(),
            selected = config.selected_updates.len(),
            "saved config"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
