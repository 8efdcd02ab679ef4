//! Connectivity status reported by the host environment.

use std::fmt;

/// Connection class, as reported by the platform's network information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkType {
    /// `slow-2g`.
    Slow2g,
    /// `2g`.
    Cellular2g,
    /// `3g`.
    Cellular3g,
    /// `4g` (and anything newer).
    Cellular4g,
    /// `wifi`.
    Wifi,
    /// `ethernet`.
    Ethernet,
    /// `none`.
    None,
    /// Unreported or unrecognized.
    #[default]
    Unknown,
}

impl NetworkType {
    /// Parses a platform label such as `"slow-2g"` or `"wifi"`.
    ///
    /// Unrecognized labels map to [`NetworkType::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::Cellular2g,
            "3g" => Self::Cellular3g,
            "4g" | "5g" => Self::Cellular4g,
            "wifi" => Self::Wifi,
            "ethernet" => Self::Ethernet,
            "none" => Self::None,
            _ => Self::Unknown,
        }
    }

    /// Platform label for this connection class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::Cellular2g => "2g",
            Self::Cellular3g => "3g",
            Self::Cellular4g => "4g",
            Self::Wifi => "wifi",
            Self::Ethernet => "ethernet",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }

    /// Classifies the connection for choosing payload sizes (e.g. image widths).
    #[must_use]
    pub const fn data_quality(self) -> DataQuality {
        match self {
            Self::Wifi | Self::Ethernet | Self::Cellular4g => DataQuality::High,
            Self::Cellular3g | Self::Unknown => DataQuality::Medium,
            Self::Slow2g | Self::Cellular2g | Self::None => DataQuality::Low,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse data-quality class derived from [`NetworkType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataQuality {
    /// Fast, unmetered-looking connection.
    High,
    /// Middle tier.
    Medium,
    /// Slow connection; prefer small payloads.
    Low,
}

/// Snapshot returned by a [`ConnectivityProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkStatus {
    /// Whether an outbound request may be attempted at all.
    pub can_make_request: bool,
    /// Whether callers should prefer cached data over fresh requests.
    pub should_use_cache: bool,
    /// Current connection class.
    pub network_type: NetworkType,
}

impl NetworkStatus {
    /// Builds a status; `should_use_cache` is set when offline or on a
    /// low-quality connection.
    #[must_use]
    pub const fn new(can_make_request: bool, network_type: NetworkType) -> Self {
        let low = matches!(network_type.data_quality(), DataQuality::Low);
        Self {
            can_make_request,
            should_use_cache: !can_make_request || low,
            network_type,
        }
    }
}

/// Source of connectivity information.
///
/// The fetch wrapper queries it before each request.
pub trait ConnectivityProvider: fmt::Debug + Send + Sync {
    /// Returns the current connectivity snapshot.
    fn status(&self) -> NetworkStatus;
}

/// Connectivity provider with a fixed answer, configured at startup.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity {
    /// Fixed status.
    status: NetworkStatus,
}

impl StaticConnectivity {
    /// Creates a provider reporting the given reachability and connection class.
    #[must_use]
    pub const fn new(online: bool, network_type: NetworkType) -> Self {
        Self {
            status: NetworkStatus::new(online, network_type),
        }
    }

    /// Online with an unknown connection class.
    #[must_use]
    pub const fn online() -> Self {
        Self::new(true, NetworkType::Unknown)
    }

    /// No network path available.
    #[must_use]
    pub const fn offline() -> Self {
        Self::new(false, NetworkType::None)
    }
}

impl Default for StaticConnectivity {
    fn default() -> Self {
        Self::online()
    }
}

impl ConnectivityProvider for StaticConnectivity {
    fn status(&self) -> NetworkStatus {
        self.status
    }
}
