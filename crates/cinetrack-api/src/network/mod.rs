//! Network access for the TMDB client.
//!
//! Every outbound request passes a connectivity check and is bounded by a
//! timeout derived from the current connection class.

mod connectivity;
mod fetch;

pub use connectivity::{
    ConnectivityProvider, DataQuality, NetworkStatus, NetworkType, StaticConnectivity,
};
#[allow(clippy::module_name_repetitions)]
pub use fetch::{FetchedResponse, NetworkFetcher, RequestOptions, TimeoutPolicy};
