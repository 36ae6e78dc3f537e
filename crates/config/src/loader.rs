use std::path::{Path, PathBuf};

use {
    directories::BaseDirs,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::WagateConfig};

const CONFIG_FILENAME: &str = "wagate.toml";

/// Load config from an explicit path.
pub fn load_config(path: &Path) -> anyhow::Result<WagateConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./wagate.toml` (project-local)
/// 2. `~/.config/wagate/wagate.toml` (user-global)
///
/// Returns `WagateConfig::default()` when no file is found or the file is
/// unreadable, so the gateway can still start with sane paths.
pub fn discover_and_load() -> WagateConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return WagateConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            WagateConfig::default()
        },
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }
    let global = config_dir()?.join(CONFIG_FILENAME);
    global.exists().then_some(global)
}

/// Returns the user-global config directory, `~/.config/wagate/`.
pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|d| d.home_dir().join(".config").join("wagate"))
}
