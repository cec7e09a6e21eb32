//! Validated endpoint with its resolved URL.
//!
//! A descriptor is built once from an [`EndpointConfig`]. Validation and
//! placeholder substitution both happen in [`EndpointDescriptor::new`], so a
//! descriptor that exists always has a concrete, parseable URL. To fetch a
//! different season or round, build a new descriptor.

use reqwest::Url;

use super::template::{self, RACE_ROUND_PLACEHOLDER, YEAR_PLACEHOLDER};
use super::{ConfigurationError, EndpointConfig, EndpointKind, RACE_ROUND_RANGE, YEAR_RANGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    config: EndpointConfig,
    url: String,
}

impl EndpointDescriptor {
    pub fn new(config: EndpointConfig) -> Result<Self, ConfigurationError> {
        let url = resolve(&config)?;
        Ok(Self { config, url })
    }

    pub fn kind(&self) -> EndpointKind {
        self.config.kind
    }

    /// The resolved, placeholder-free URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn year(&self) -> Option<i64> {
        self.config.year
    }

    pub fn race_round(&self) -> Option<i64> {
        self.config.race_round
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

fn resolve(config: &EndpointConfig) -> Result<String, ConfigurationError> {
    let kind = config.kind;

    if !kind.is_templated() {
        if config.template.is_some() {
            return Err(ConfigurationError::ConflictingField {
                field: "template_url",
                kind,
            });
        }
        let url = non_blank(config.url.as_deref()).ok_or(ConfigurationError::MissingUrl)?;
        check_url(url)?;
        return Ok(url.to_string());
    }

    if config.url.is_some() {
        return Err(ConfigurationError::ConflictingField { field: "url", kind });
    }
    let template =
        non_blank(config.template.as_deref()).ok_or(ConfigurationError::MissingTemplate { kind })?;

    // Placeholder checks come first so a bad template is reported even when
    // the numeric fields are also wrong.
    if kind.needs_year() && !template.contains(YEAR_PLACEHOLDER) {
        return Err(ConfigurationError::MissingPlaceholder {
            placeholder: YEAR_PLACEHOLDER,
        });
    }
    if kind.needs_race_round() && !template.contains(RACE_ROUND_PLACEHOLDER) {
        return Err(ConfigurationError::MissingPlaceholder {
            placeholder: RACE_ROUND_PLACEHOLDER,
        });
    }

    let mut values = Vec::with_capacity(2);
    if kind.needs_year() {
        let year = config.year.ok_or(ConfigurationError::MissingYear { kind })?;
        if !YEAR_RANGE.contains(&year) {
            return Err(ConfigurationError::YearOutOfRange(year));
        }
        values.push((YEAR_PLACEHOLDER, year));
    }
    if kind.needs_race_round() {
        let round = config
            .race_round
            .ok_or(ConfigurationError::MissingRaceRound { kind })?;
        if !RACE_ROUND_RANGE.contains(&round) {
            return Err(ConfigurationError::RaceRoundOutOfRange(round));
        }
        values.push((RACE_ROUND_PLACEHOLDER, round));
    }

    let url = template::substitute(template, &values)?;
    check_url(&url)?;
    Ok(url)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn check_url(url: &str) -> Result<(), ConfigurationError> {
    let parsed = Url::parse(url).map_err(|e| ConfigurationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigurationError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
