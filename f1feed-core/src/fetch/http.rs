//! Blocking HTTP fetcher.
//!
//! A client is built for each call and dropped when the call returns, so no
//! connection is shared between endpoints or between fetches. One attempt per
//! call, transport default timeouts.

use std::error::Error as _;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::Fetcher;
use crate::envelope::{FailureCause, ResponseEnvelope};

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> ResponseEnvelope {
        let client = match Client::builder().build() {
            Ok(c) => c,
            Err(e) => return transport_failure(url, &e),
        };

        let resp = match client.get(url).send() {
            Ok(r) => r,
            Err(e) => return transport_failure(url, &e),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            debug!(url, status = status.as_u16(), "non-200 response");
            return ResponseEnvelope::failed(FailureCause::Status {
                code: status.as_u16(),
            });
        }

        match resp.json::<Value>() {
            Ok(payload) => ResponseEnvelope::success(payload),
            Err(e) if e.is_decode() => {
                debug!(url, error = %e, "response body is not JSON");
                ResponseEnvelope::failed(FailureCause::Decode {
                    message: error_chain(&e),
                })
            }
            Err(e) => transport_failure(url, &e),
        }
    }
}

fn transport_failure(url: &str, err: &reqwest::Error) -> ResponseEnvelope {
    let message = error_chain(err);
    debug!(url, error = %message, "transport failure");
    ResponseEnvelope::failed(FailureCause::Transport { message })
}

/// Render an error and its sources as `outer: inner: root`.
fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        let text = s.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = s.source();
    }
    out
}
