//! Known-endpoint catalogue.
//!
//! Each configuration section has a fixed table of endpoint names it knows how
//! to build. Names outside the table are ignored by the factory, which lets a
//! newer configuration file run against an older binary.

use std::fmt;

use crate::endpoint::EndpointKind;

/// A top-level section of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Static,
    YearDependent,
    RaceSpecific,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Static, Section::YearDependent, Section::RaceSpecific];

    /// Key of this section in the configuration document.
    pub fn key(self) -> &'static str {
        match self {
            Section::Static => "static_endpoints",
            Section::YearDependent => "year_dependent_endpoints",
            Section::RaceSpecific => "race_specific_endpoints",
        }
    }

    /// Least dependent kind built for entries of this section.
    ///
    /// Race entries whose template also names `{year}` are built as
    /// `YearAndRaceDependent`.
    pub fn kind(self) -> EndpointKind {
        match self {
            Section::Static => EndpointKind::Static,
            Section::YearDependent => EndpointKind::YearDependent,
            Section::RaceSpecific => EndpointKind::RaceDependent,
        }
    }

    /// Endpoint names this section knows about.
    pub fn known_names(self) -> &'static [&'static str] {
        match self {
            Section::Static => STATIC_ENDPOINTS,
            Section::YearDependent => YEAR_DEPENDENT_ENDPOINTS,
            Section::RaceSpecific => RACE_SPECIFIC_ENDPOINTS,
        }
    }

    pub fn knows(self, name: &str) -> bool {
        self.known_names().contains(&name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub const STATIC_ENDPOINTS: &[&str] = &["status", "season", "circuit"];

pub const YEAR_DEPENDENT_ENDPOINTS: &[&str] = &[
    "race",
    "constructor",
    "driver",
    "result",
    "sprint",
    "qualify",
    "standings",
    "constructorstanding",
    "driverstanding",
];

pub const RACE_SPECIFIC_ENDPOINTS: &[&str] = &["pitstop", "lap"];
