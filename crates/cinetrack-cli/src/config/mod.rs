//! Application configuration module.
//!
//! Loads the TOML config file holding TMDB, cache, and network settings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
