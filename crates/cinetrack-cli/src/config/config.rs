//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinetrack_api::cache::{CacheConfig, Category};
use cinetrack_api::network::{NetworkType, TimeoutPolicy};
use serde::Deserialize;
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbSettings,
    /// Cache TTLs and sizing.
    #[serde(default)]
    pub cache: CacheSettings,
    /// Connectivity and timeout tiers.
    #[serde(default)]
    pub network: NetworkSettings,
}

/// `[tmdb]` section.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbSettings {
    /// Response language, e.g. `en-US`.
    pub language: Option<String>,
    /// API base URL override.
    pub base_url: Option<String>,
}

/// `[cache]` section.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheSettings {
    /// TTL for every category except credits.
    pub default_ttl_secs: u64,
    /// TTL for cast lists and person credits.
    pub credits_ttl_secs: u64,
    /// Maximum number of cached entries; `0` means unbounded.
    pub capacity: usize,
    /// Interval between expired-entry sweeps.
    pub sweep_interval_secs: u64,
}

/// `[network]` section.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkSettings {
    /// Whether requests may be attempted.
    pub online: bool,
    /// Connection class label (`wifi`, `3g`, `slow-2g`, ...).
    pub network_type: Option<String>,
    /// Timeout for `slow-2g` and `2g`.
    pub poor_timeout_secs: u64,
    /// Timeout for `3g`.
    pub medium_timeout_secs: u64,
    /// Timeout for every other connection class.
    pub fast_timeout_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: 900,
            credits_ttl_secs: 300,
            capacity: 1000,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            online: true,
            network_type: None,
            poor_timeout_secs: 15,
            medium_timeout_secs: 10,
            fast_timeout_secs: 5,
        }
    }
}

impl TmdbSettings {
    /// Parses `base_url`, appending a trailing slash so relative paths join below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL does not parse.
    pub fn base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.base_url.as_deref() else {
            return Ok(None);
        };
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalized)
            .map(Some)
            .with_context(|| format!("invalid [tmdb] base_url: {raw}"))
    }
}

impl CacheSettings {
    /// Builds the library cache configuration.
    #[must_use]
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_default_ttl(Duration::from_secs(self.default_ttl_secs))
            .with_ttl(
                Category::Credits,
                Duration::from_secs(self.credits_ttl_secs),
            )
            .with_capacity(self.capacity)
    }

    /// Sweep interval for the background expiry task.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl NetworkSettings {
    /// Connection class, `Unknown` when unset.
    #[must_use]
    pub fn network_type(&self) -> NetworkType {
        self.network_type
            .as_deref()
            .map_or(NetworkType::Unknown, NetworkType::from_label)
    }

    /// Timeout tiers.
    #[must_use]
    pub const fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy {
            poor: Duration::from_secs(self.poor_timeout_secs),
            medium: Duration::from_secs(self.medium_timeout_secs),
            fast: Duration::from_secs(self.fast_timeout_secs),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
