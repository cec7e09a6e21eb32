//! Endpoint configuration, validation and URL resolution.

pub mod descriptor;
pub mod template;

use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

pub use descriptor::EndpointDescriptor;
pub use template::{RACE_ROUND_PLACEHOLDER, YEAR_PLACEHOLDER};

/// Valid seasons: the championship started in 1950.
pub const YEAR_RANGE: RangeInclusive<i64> = 1950..=2100;

/// Valid race rounds within a season (0 addresses the season as a whole).
pub const RACE_ROUND_RANGE: RangeInclusive<i64> = 0..=30;

/// How an endpoint's URL is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Fixed URL, used verbatim.
    Static,
    /// Template with a `{year}` placeholder.
    YearDependent,
    /// Template with a `{race_round}` placeholder.
    RaceDependent,
    /// Template with both `{year}` and `{race_round}`.
    YearAndRaceDependent,
}

impl EndpointKind {
    pub fn needs_year(self) -> bool {
        matches!(
            self,
            EndpointKind::YearDependent | EndpointKind::YearAndRaceDependent
        )
    }

    pub fn needs_race_round(self) -> bool {
        matches!(
            self,
            EndpointKind::RaceDependent | EndpointKind::YearAndRaceDependent
        )
    }

    pub fn is_templated(self) -> bool {
        self != EndpointKind::Static
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndpointKind::Static => "static",
            EndpointKind::YearDependent => "year_dependent",
            EndpointKind::RaceDependent => "race_dependent",
            EndpointKind::YearAndRaceDependent => "year_and_race_dependent",
        };
        f.write_str(s)
    }
}

/// Declarative definition of one endpoint, before validation.
///
/// Which fields must be populated depends on `kind`: `url` for static
/// endpoints, `template` plus `year` and/or `race_round` for templated ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub kind: EndpointKind,
    pub url: Option<String>,
    pub template: Option<String>,
    pub year: Option<i64>,
    pub race_round: Option<i64>,
}

impl EndpointConfig {
    pub fn fixed(url: impl Into<String>) -> Self {
        Self {
            kind: EndpointKind::Static,
            url: Some(url.into()),
            template: None,
            year: None,
            race_round: None,
        }
    }

    pub fn year_dependent(template: impl Into<String>, year: i64) -> Self {
        Self {
            kind: EndpointKind::YearDependent,
            url: None,
            template: Some(template.into()),
            year: Some(year),
            race_round: None,
        }
    }

    pub fn race_dependent(template: impl Into<String>, race_round: i64) -> Self {
        Self {
            kind: EndpointKind::RaceDependent,
            url: None,
            template: Some(template.into()),
            year: None,
            race_round: Some(race_round),
        }
    }

    pub fn year_and_race(template: impl Into<String>, year: i64, race_round: i64) -> Self {
        Self {
            kind: EndpointKind::YearAndRaceDependent,
            url: None,
            template: Some(template.into()),
            year: Some(year),
            race_round: Some(race_round),
        }
    }
}

/// Malformed or incomplete endpoint configuration, detected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("url is required for a static endpoint")]
    MissingUrl,

    #[error("template_url is required for a {kind} endpoint")]
    MissingTemplate { kind: EndpointKind },

    #[error("template_url must contain the {placeholder} placeholder")]
    MissingPlaceholder { placeholder: &'static str },

    #[error("template_url contains an unknown placeholder: {{{0}}}")]
    UnresolvedPlaceholder(String),

    #[error("current_year is required for a {kind} endpoint")]
    MissingYear { kind: EndpointKind },

    #[error("current_race is required for a {kind} endpoint")]
    MissingRaceRound { kind: EndpointKind },

    #[error("year {0} is outside the valid range 1950..=2100")]
    YearOutOfRange(i64),

    #[error("race round {0} is outside the valid range 0..=30")]
    RaceRoundOutOfRange(i64),

    #[error("{field} must not be set for a {kind} endpoint")]
    ConflictingField {
        field: &'static str,
        kind: EndpointKind,
    },

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed endpoint entry: {0}")]
    MalformedEntry(String),
}
