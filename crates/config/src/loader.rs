use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    schema::CourierConfig,
    validate::{Severity, validate},
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "courier.toml",
    "courier.yaml",
    "courier.yml",
    "courier.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<CourierConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    parse_config(&raw, ext)
}

/// Parse config text in the format named by `ext` (`toml`, `yaml`/`yml`, `json`).
pub fn parse_config(raw: &str, ext: &str) -> Result<CourierConfig> {
    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./courier.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/courier/courier.{toml,yaml,yml,json}` (user-global)
///
/// Returns `CourierConfig::default()` if no config file is found or the file
/// fails to load. Validation diagnostics are logged.
pub fn discover_and_load() -> CourierConfig {
    let mut dirs = vec![PathBuf::from(".")];
    dirs.extend(config_dir());
    discover_in(&dirs)
}

/// Load the first config file found in `dirs`, searched in order.
///
/// Same fallback rules as [`discover_and_load`].
pub fn discover_in(dirs: &[PathBuf]) -> CourierConfig {
    let Some(path) = dirs.iter().find_map(|dir| find_in(dir)) else {
        debug!("no config file found, using defaults");
        return CourierConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => {
            for d in validate(&cfg).diagnostics {
                match d.severity {
                    Severity::Error => warn!(path = %d.path, "config error: {}", d.message),
                    Severity::Warning => warn!(path = %d.path, "config warning: {}", d.message),
                    Severity::Info => debug!(path = %d.path, "config: {}", d.message),
                }
            }
            cfg
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            CourierConfig::default()
        },
    }
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/courier/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "courier").map(|d| d.config_dir().to_path_buf())
}
