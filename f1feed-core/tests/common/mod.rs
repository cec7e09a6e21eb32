//! Shared fixtures: a one-shot loopback HTTP server and a scripted fetcher.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread;

use f1feed_core::{Fetcher, ResponseEnvelope};

/// Serve exactly one HTTP response on a loopback port and return its base URL.
pub fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{addr}/")
}

/// A loopback URL with nothing listening behind it.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

/// Fetcher that answers from a URL → envelope script and records every call.
pub struct ScriptedFetcher {
    responses: HashMap<String, ResponseEnvelope>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(responses: impl IntoIterator<Item = (String, ResponseEnvelope)>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, url: &str) -> ResponseEnvelope {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses.get(url).cloned().unwrap_or_else(|| {
            ResponseEnvelope::failed(f1feed_core::FailureCause::Status { code: 404 })
        })
    }
}
