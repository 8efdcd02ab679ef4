//! API client library for cinetrack.
//!
//! Provides a TMDB client behind a network-aware fetch wrapper, a TTL cache
//! keyed by resource category, and read-through service functions that the
//! application screens call directly.

/// TTL cache, clock abstraction, and in-flight request coalescing.
pub mod cache;

/// Error types shared by every layer.
pub mod error;

/// Connectivity status and the timeout-bounded fetch wrapper.
pub mod network;

/// TMDB API client, DTOs, and read-through service.
pub mod tmdb;

pub use error::{Result, TmdbError};
