//! Fetcher trait and the HTTP implementation.
//!
//! The `Fetcher` trait abstracts over transports so handlers can be given a
//! mock in tests. Implementations never return errors: every outcome, including
//! transport faults, is folded into a [`ResponseEnvelope`].

mod http;

pub use http::HttpFetcher;

use crate::envelope::ResponseEnvelope;

/// Performs a single GET against an already-resolved URL.
pub trait Fetcher: Send + Sync {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch `url` once. Must not panic on network or decode failures.
    fn fetch(&self, url: &str) -> ResponseEnvelope;
}
