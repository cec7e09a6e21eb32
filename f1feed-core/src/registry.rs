//! Endpoint handlers and the name-indexed registry that holds them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::endpoint::{ConfigurationError, EndpointDescriptor, EndpointKind};
use crate::envelope::ResponseEnvelope;
use crate::fetch::Fetcher;

/// A named endpoint: its resolved descriptor plus the fetcher that serves it.
#[derive(Clone)]
pub struct EndpointHandler {
    name: String,
    descriptor: EndpointDescriptor,
    fetcher: Arc<dyn Fetcher>,
}

impl EndpointHandler {
    pub fn new(
        name: impl Into<String>,
        descriptor: EndpointDescriptor,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor,
            fetcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EndpointKind {
        self.descriptor.kind()
    }

    pub fn url(&self) -> &str {
        self.descriptor.url()
    }

    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    /// Fetch this endpoint once.
    pub fn fetch(&self) -> ResponseEnvelope {
        self.fetcher.fetch(self.descriptor.url())
    }
}

impl fmt::Debug for EndpointHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHandler")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("fetcher", &self.fetcher.name())
            .finish()
    }
}

/// An entry the factory declined to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub section: &'static str,
    pub name: String,
    pub error: ConfigurationError,
}

/// Handlers keyed by endpoint name, in name order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    handlers: BTreeMap<String, EndpointHandler>,
    rejected: Vec<RejectedEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handler, replacing any previous one with the same name.
    pub fn insert(&mut self, handler: EndpointHandler) -> Option<EndpointHandler> {
        self.handlers.insert(handler.name().to_string(), handler)
    }

    pub(crate) fn reject(&mut self, entry: RejectedEntry) {
        self.rejected.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&EndpointHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn handlers(&self) -> impl Iterator<Item = &EndpointHandler> {
        self.handlers.values()
    }

    /// Entries that were declared but failed validation.
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointConfig;
    use crate::envelope::FailureCause;
    use serde_json::json;

    struct EchoFetcher;

    impl Fetcher for EchoFetcher {
        fn name(&self) -> &str {
            "echo"
        }

        fn fetch(&self, url: &str) -> ResponseEnvelope {
            if url.contains("down") {
                ResponseEnvelope::failed(FailureCause::Status { code: 500 })
            } else {
                ResponseEnvelope::success(json!({ "url": url }))
            }
        }
    }

    fn handler(name: &str, url: &str) -> EndpointHandler {
        let d = EndpointDescriptor::new(EndpointConfig::fixed(url)).unwrap();
        EndpointHandler::new(name, d, Arc::new(EchoFetcher))
    }

    #[test]
    fn handler_fetches_its_resolved_url() {
        let h = handler("status", "https://example.test/status.json");
        let env = h.fetch();
        assert_eq!(
            env.payload(),
            Some(&json!({ "url": "https://example.test/status.json" }))
        );
    }

    #[test]
    fn handler_passes_through_failures() {
        let h = handler("status", "https://down.example.test/status.json");
        assert!(!h.fetch().is_success());
    }

    #[test]
    fn registry_lookup_by_name() {
        let mut r = Registry::new();
        r.insert(handler("season", "https://example.test/seasons.json"));
        r.insert(handler("circuit", "https://example.test/circuits.json"));

        assert_eq!(r.len(), 2);
        assert!(r.contains("season"));
        assert_eq!(r.get("circuit").unwrap().url(), "https://example.test/circuits.json");
        assert!(r.get("race").is_none());
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["circuit", "season"]);
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut r = Registry::new();
        assert!(r.insert(handler("status", "https://a.test/")).is_none());
        let old = r.insert(handler("status", "https://b.test/")).unwrap();
        assert_eq!(old.url(), "https://a.test/");
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn debug_shows_fetcher_name() {
        let h = handler("status", "https://example.test/");
        assert!(format!("{h:?}").contains("echo"));
    }
}
