//! Factory — turns a `ConfigDocument` into a `Registry` of endpoint handlers.
//!
//! Each section's fragments are decoded into an `EndpointConfig` of the
//! section's kind (race entries naming `{year}` need the season too), validated through `EndpointDescriptor::new`, and paired with
//! the shared fetcher.
//!
//! Skipped without error:
//! - names that are not in the section's catalogue (forward-compatible ignore)
//! - year/race entries whose `year_dependent` / `race_dependent` flag is unset
//!
//! Rejected and recorded on the registry (the rest of the build continues):
//! - fragments that do not decode
//! - fragments that fail descriptor validation

use std::sync::Arc;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::Section;
use crate::config::ConfigDocument;
use crate::endpoint::{
    ConfigurationError, EndpointConfig, EndpointDescriptor, EndpointKind, YEAR_PLACEHOLDER,
};
use crate::fetch::Fetcher;
use crate::registry::{EndpointHandler, Registry, RejectedEntry};

// ─── Fragments ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StaticFragment {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YearFragment {
    template_url: Option<String>,
    #[serde(default)]
    year_dependent: bool,
    #[serde(default, deserialize_with = "lenient_int")]
    current_year: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RaceFragment {
    template_url: Option<String>,
    #[serde(default)]
    race_dependent: bool,
    #[serde(default, deserialize_with = "lenient_int")]
    current_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    current_race: Option<i64>,
}

/// Integers may be written bare or quoted (`2024` or `"2024"`).
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => Ok(Some(n)),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, found \"{s}\""))),
    }
}

fn decode<T: DeserializeOwned>(fragment: &Value) -> Result<T, ConfigurationError> {
    T::deserialize(fragment).map_err(|e| ConfigurationError::MalformedEntry(e.to_string()))
}

/// Decode one fragment into an `EndpointConfig` for its section.
///
/// Returns `Ok(None)` when the entry does not opt in through its dependency flag.
pub fn fragment_config(
    section: Section,
    fragment: &Value,
) -> Result<Option<EndpointConfig>, ConfigurationError> {
    let kind = section.kind();
    match section {
        Section::Static => {
            let f: StaticFragment = decode(fragment)?;
            Ok(Some(EndpointConfig {
                kind,
                url: f.url,
                template: None,
                year: None,
                race_round: None,
            }))
        }
        Section::YearDependent => {
            let f: YearFragment = decode(fragment)?;
            if !f.year_dependent {
                return Ok(None);
            }
            Ok(Some(EndpointConfig {
                kind,
                url: None,
                template: f.template_url,
                year: f.current_year,
                race_round: None,
            }))
        }
        Section::RaceSpecific => {
            let f: RaceFragment = decode(fragment)?;
            if !f.race_dependent {
                return Ok(None);
            }
            // A round-only template resolves without a season.
            let kind = match f.template_url.as_deref() {
                Some(t) if t.contains(YEAR_PLACEHOLDER) => EndpointKind::YearAndRaceDependent,
                _ => kind,
            };
            Ok(Some(EndpointConfig {
                kind,
                url: None,
                template: f.template_url,
                year: f.current_year.filter(|_| kind.needs_year()),
                race_round: f.current_race,
            }))
        }
    }
}

// ─── Handler factory ─────────────────────────────────────────────────

/// Create the handler for one declared entry.
///
/// `Ok(None)` means the entry was skipped (unknown name or flag unset).
pub fn create_handler(
    section: Section,
    name: &str,
    fragment: &Value,
    fetcher: &Arc<dyn Fetcher>,
) -> Result<Option<EndpointHandler>, ConfigurationError> {
    if !section.knows(name) {
        return Ok(None);
    }
    let Some(config) = fragment_config(section, fragment)? else {
        return Ok(None);
    };
    let descriptor = EndpointDescriptor::new(config)?;
    Ok(Some(EndpointHandler::new(
        name,
        descriptor,
        Arc::clone(fetcher),
    )))
}

/// Build a registry from every section of `document`.
pub fn build_registry(document: &ConfigDocument, fetcher: Arc<dyn Fetcher>) -> Registry {
    let mut registry = Registry::new();

    for section in Section::ALL {
        for (name, fragment) in document.section(section) {
            if !section.knows(name) {
                debug!(section = section.key(), name = %name, "ignoring unknown endpoint");
                continue;
            }
            match create_handler(section, name, fragment, &fetcher) {
                Ok(Some(handler)) => {
                    debug!(name = %name, url = handler.url(), "built endpoint handler");
                    registry.insert(handler);
                }
                Ok(None) => {
                    debug!(
                        section = section.key(),
                        name = %name,
                        "dependency flag not set, skipping endpoint"
                    );
                }
                Err(error) => {
                    warn!(section = section.key(), name = %name, %error, "rejected endpoint");
                    registry.reject(RejectedEntry {
                        section: section.key(),
                        name: name.clone(),
                        error,
                    });
                }
            }
        }
    }

    registry
}
