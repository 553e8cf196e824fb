//! Loading the engine configuration from disk.

use anyhow::{Context, Result};
use cellcalc_core::EngineConfig;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

/// `config.toml` in the user's config dir, if the platform has one.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellcalc")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Load the config from `explicit` or the default location.
///
/// An explicitly requested file must exist and parse. Problems with the
/// default file are returned as warnings and the defaults are used instead.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<(EngineConfig, Vec<String>)> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        return Ok((config, Vec::new()));
    }

    let mut warnings = Vec::new();
    let Some(path) = default_config_path() else {
        return Ok((EngineConfig::default(), warnings));
    };
    if !path.is_file() {
        return Ok((EngineConfig::default(), warnings));
    }
    match read_config(&path) {
        Ok(config) => Ok((config, warnings)),
        Err(err) => {
            warnings.push(format!("{:#}; using defaults", err));
            Ok((EngineConfig::default(), warnings))
        }
    }
}

fn read_config(path: &Path) -> Result<EngineConfig> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        anyhow::bail!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn parse_config(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
