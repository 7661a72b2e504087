pub mod list;
pub mod run;

use std::path::Path;

use anyhow::Result;
use macup_core::ConfigStore;

/// `--config <path>` if given, otherwise `~/.macup.json`.
pub(crate) fn config_store(path: Option<&Path>) -> Result<ConfigStore> {
    match path {
        Some(path) => Ok(ConfigStore::at(path)),
        None => Ok(ConfigStore::default_location()?),
    }
}
