//! Config file initialization command.

use std::path::Path;

use crate::config::{self, Config, ConfigError};
use crate::error::{Result, ResultExt};

/// Write `config` to `path` (or the standard location).
///
/// Refuses to replace an existing file unless `force` is set.
pub fn cmd_init_config(config: &Config, path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    let exists = path
        .try_exists()
        .with_context(format!("checking {}", path.display()))?;
    if exists && !force {
        return Err(ConfigError::AlreadyExists(path).into());
    }

    config::save_to(config, &path)?;
    println!("Wrote config to {}", path.display());
    Ok(())
}
