//! f1feed core — endpoint descriptors, fetchers, handler factory, fetch pipeline.
//!
//! This crate turns a declarative endpoint configuration into fetchable handlers:
//! - Response envelope (success payload or typed failure)
//! - Endpoint descriptors that validate configuration and resolve URL templates
//! - HTTP fetcher that normalizes every outcome into an envelope
//! - Known-endpoint catalogue and the factory that builds the handler registry
//! - Pipeline orchestrator that fetches everything and keeps results by name

pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod factory;
pub mod fetch;
pub mod pipeline;
pub mod registry;

pub use config::{ConfigDocument, DocumentError, PipelineSettings};
pub use endpoint::{ConfigurationError, EndpointConfig, EndpointDescriptor, EndpointKind};
pub use envelope::{FailureCause, FetchStatus, ResponseEnvelope};
pub use factory::build_registry;
pub use fetch::{Fetcher, HttpFetcher};
pub use pipeline::{FetchMode, FetchSummary, Pipeline, PipelineError};
pub use registry::{EndpointHandler, Registry};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed to the rayon pool is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ResponseEnvelope>();
        require_sync::<ResponseEnvelope>();
        require_send::<EndpointDescriptor>();
        require_sync::<EndpointDescriptor>();
        require_send::<EndpointHandler>();
        require_sync::<EndpointHandler>();
        require_send::<Registry>();
        require_sync::<Registry>();
        require_send::<HttpFetcher>();
        require_sync::<HttpFetcher>();
        require_send::<FetchSummary>();
        require_sync::<FetchSummary>();
    }
}
