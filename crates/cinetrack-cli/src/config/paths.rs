//! Config file location.

use std::path::PathBuf;

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the XDG config root.
const APP_DIR: &str = "cinetrack";

/// Resolves the config file path.
///
/// Precedence:
/// 1. `--dir` override: `{dir}/config.toml`.
/// 2. `$XDG_CONFIG_HOME/cinetrack/config.toml` when the variable is set and
///    absolute.
/// 3. `$HOME/.config/cinetrack/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable
/// (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_with(dir, |name| std::env::var(name).ok())
}

/// [`resolve_config_path`] with an injectable environment lookup.
fn resolve_with(dir: Option<&PathBuf>, env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    // XDG roots must be absolute; relative values are ignored.
    if let Some(xdg) = env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }

    match env("HOME").filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE)),
        None => bail!("cannot locate config directory: set HOME or XDG_CONFIG_HOME, or pass --dir"),
    }
}
