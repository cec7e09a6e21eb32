//! Pipeline orchestrator — loads the configuration, builds the registry and
//! fetches every endpoint with progress reporting.
//!
//! Endpoints are independent: a failed fetch is recorded for that name and the
//! run continues with the rest. Only a document-level problem (nothing to load,
//! nothing buildable) stops a run, and even then `fetch_all` returns an empty
//! summary instead of an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigDocument, DocumentError, PipelineSettings};
use crate::envelope::{FailureCause, ResponseEnvelope};
use crate::factory::build_registry;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::registry::{EndpointHandler, Registry};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("no endpoint handlers could be built ({rejected} entries rejected)")]
    NoHandlers { rejected: usize },
}

/// How `fetch_all` schedules the endpoint fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// One endpoint at a time, in name order.
    #[default]
    Sequential,
    /// All endpoints on the rayon pool; results are assembled after every fetch settles.
    Parallel,
}

/// Where the configuration document comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PipelineSettings),
    Document(ConfigDocument),
}

impl ConfigSource {
    fn load(&self) -> Result<ConfigDocument, DocumentError> {
        let doc = match self {
            ConfigSource::File(settings) => ConfigDocument::from_file(&settings.path())?,
            ConfigSource::Document(doc) => doc.clone(),
        };
        if doc.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(doc)
    }
}

/// A single endpoint that did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointFailure {
    pub name: String,
    pub url: String,
    pub cause: FailureCause,
}

/// Outcome of one `fetch_all` run.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    pub fetched_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub data: BTreeMap<String, Value>,
    pub failures: Vec<EndpointFailure>,
}

impl FetchSummary {
    pub fn empty() -> Self {
        Self {
            fetched_at: Utc::now(),
            total: 0,
            succeeded: 0,
            failed: 0,
            data: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Progress callback for `fetch_all`.
///
/// In parallel mode callbacks arrive from pool threads in completion order.
pub trait FetchProgress: Send + Sync {
    /// Called when starting to fetch an endpoint.
    fn on_start(&self, name: &str, index: usize, total: usize);

    /// Called when an endpoint fetch completes.
    fn on_complete(&self, name: &str, index: usize, total: usize, envelope: &ResponseEnvelope);

    /// Called when every endpoint has been attempted.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that writes to the `tracing` log.
pub struct LogProgress;

impl FetchProgress for LogProgress {
    fn on_start(&self, name: &str, index: usize, total: usize) {
        debug!("[{}/{}] fetching {name}", index + 1, total);
    }

    fn on_complete(&self, name: &str, _index: usize, _total: usize, envelope: &ResponseEnvelope) {
        match envelope.cause() {
            None => info!(endpoint = name, "fetched"),
            Some(cause) => warn!(endpoint = name, %cause, "fetch failed"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        info!("fetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

pub struct Pipeline {
    source: ConfigSource,
    fetcher: Arc<dyn Fetcher>,
    mode: FetchMode,
    progress: Box<dyn FetchProgress>,
    registry: Option<Registry>,
    data: BTreeMap<String, Value>,
}

impl Pipeline {
    /// Pipeline reading its document from `settings`, fetching over HTTP.
    pub fn new(settings: PipelineSettings) -> Self {
        Self::with_source(ConfigSource::File(settings))
    }

    /// Pipeline over an already-parsed document.
    pub fn from_document(document: ConfigDocument) -> Self {
        Self::with_source(ConfigSource::Document(document))
    }

    fn with_source(source: ConfigSource) -> Self {
        Self {
            source,
            fetcher: Arc::new(HttpFetcher::new()),
            mode: FetchMode::default(),
            progress: Box::new(LogProgress),
            registry: None,
            data: BTreeMap::new(),
        }
    }

    /// Replace the fetcher. Takes effect at the next `initialize`.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self.registry = None;
        self
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn FetchProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Load the document and (re)build the registry.
    ///
    /// Returns the number of handlers built.
    pub fn initialize(&mut self) -> Result<usize, PipelineError> {
        self.registry = None;

        let document = self.source.load()?;
        let registry = build_registry(&document, Arc::clone(&self.fetcher));
        if registry.is_empty() {
            return Err(PipelineError::NoHandlers {
                rejected: registry.rejected().len(),
            });
        }

        let count = registry.len();
        info!(
            endpoints = count,
            rejected = registry.rejected().len(),
            "initialized pipeline with {count} endpoints"
        );
        self.registry = Some(registry);
        Ok(count)
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    /// Fetch every endpoint, initializing first if needed.
    ///
    /// The stored data is replaced by this run's successes.
    pub fn fetch_all(&mut self) -> FetchSummary {
        if self.registry.is_none() {
            if let Err(e) = self.initialize() {
                error!(error = %e, "failed to initialize pipeline");
                self.data.clear();
                return FetchSummary::empty();
            }
        }
        let Some(registry) = self.registry.as_ref() else {
            return FetchSummary::empty();
        };

        let handlers: Vec<&EndpointHandler> = registry.handlers().collect();
        let outcomes = run_handlers(&handlers, self.mode, self.progress.as_ref());

        let total = outcomes.len();
        let mut data = BTreeMap::new();
        let mut failures = Vec::new();
        for (handler, envelope) in handlers.iter().zip(outcomes) {
            match envelope {
                ResponseEnvelope::Success { payload } => {
                    data.insert(handler.name().to_string(), payload);
                }
                ResponseEnvelope::Failed { cause } => failures.push(EndpointFailure {
                    name: handler.name().to_string(),
                    url: handler.url().to_string(),
                    cause,
                }),
            }
        }

        let succeeded = data.len();
        let failed = failures.len();
        self.progress.on_batch_complete(succeeded, failed, total);

        self.data = data.clone();
        FetchSummary {
            fetched_at: Utc::now(),
            total,
            succeeded,
            failed,
            data,
            failures,
        }
    }

    pub fn get_handler(&self, name: &str) -> Option<&EndpointHandler> {
        self.registry.as_ref().and_then(|r| r.get(name))
    }

    /// Payload from the last `fetch_all`, if that endpoint succeeded.
    pub fn get_data(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }
}

/// Fetch each handler once, returning envelopes in handler order.
fn run_handlers(
    handlers: &[&EndpointHandler],
    mode: FetchMode,
    progress: &dyn FetchProgress,
) -> Vec<ResponseEnvelope> {
    let total = handlers.len();
    let fetch_one = |index: usize, handler: &EndpointHandler| {
        progress.on_start(handler.name(), index, total);
        let envelope = handler.fetch();
        progress.on_complete(handler.name(), index, total, &envelope);
        envelope
    };

    match mode {
        FetchMode::Sequential => handlers
            .iter()
            .enumerate()
            .map(|(i, h)| fetch_one(i, *h))
            .collect(),
        FetchMode::Parallel => handlers
            .par_iter()
            .enumerate()
            .map(|(i, h)| fetch_one(i, *h))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticFetcher;

    impl Fetcher for StaticFetcher {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch(&self, url: &str) -> ResponseEnvelope {
            if url.contains("seasons") {
                ResponseEnvelope::failed(FailureCause::Status { code: 404 })
            } else {
                ResponseEnvelope::success(json!({ "url": url }))
            }
        }
    }

    fn document() -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        doc.static_endpoints
            .insert("status".into(), json!({ "url": "https://a.test/status.json" }));
        doc.static_endpoints
            .insert("season".into(), json!({ "url": "https://a.test/seasons.json" }));
        doc
    }

    #[test]
    fn initialize_counts_handlers() {
        let mut p = Pipeline::from_document(document()).with_fetcher(Arc::new(StaticFetcher));
        assert!(!p.is_initialized());
        assert_eq!(p.initialize().unwrap(), 2);
        assert!(p.is_initialized());
    }

    #[test]
    fn initialize_rejects_empty_document() {
        let mut p = Pipeline::from_document(ConfigDocument::default());
        let err = p.initialize().unwrap_err();
        assert!(matches!(err, PipelineError::Document(DocumentError::Empty)));
        assert!(!p.is_initialized());
    }

    #[test]
    fn initialize_fails_when_nothing_builds() {
        let mut doc = ConfigDocument::default();
        doc.static_endpoints.insert("status".into(), json!({ "url": "" }));
        let mut p = Pipeline::from_document(doc);
        let err = p.initialize().unwrap_err();
        assert!(matches!(err, PipelineError::NoHandlers { rejected: 1 }));
    }

    #[test]
    fn fetch_all_initializes_lazily_and_stores_successes() {
        let mut p = Pipeline::from_document(document()).with_fetcher(Arc::new(StaticFetcher));
        let summary = p.fetch_all();

        assert!(p.is_initialized());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].name, "season");
        assert_eq!(summary.failures[0].cause, FailureCause::Status { code: 404 });

        assert!(p.get_data("season").is_none());
        assert_eq!(
            p.get_data("status"),
            Some(&json!({ "url": "https://a.test/status.json" }))
        );
    }

    #[test]
    fn parallel_mode_matches_sequential() {
        let mut seq = Pipeline::from_document(document()).with_fetcher(Arc::new(StaticFetcher));
        let mut par = Pipeline::from_document(document())
            .with_fetcher(Arc::new(StaticFetcher))
            .with_mode(FetchMode::Parallel);

        let a = seq.fetch_all();
        let b = par.fetch_all();
        assert_eq!(a.data, b.data);
        assert_eq!(a.failures, b.failures);
    }

    #[test]
    fn get_handler_before_initialize_is_none() {
        let p = Pipeline::from_document(document());
        assert!(p.get_handler("status").is_none());
    }

    #[test]
    fn summary_serializes_with_timestamp() {
        let mut p = Pipeline::from_document(document()).with_fetcher(Arc::new(StaticFetcher));
        let v = serde_json::to_value(p.fetch_all()).unwrap();
        assert!(v["fetched_at"].is_string());
        assert_eq!(v["failures"][0]["cause"]["code"], json!(404));
    }
}
