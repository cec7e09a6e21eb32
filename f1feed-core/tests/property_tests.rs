//! Property tests for URL resolution.
//!
//! Uses proptest to verify:
//! 1. Static URLs are returned exactly as configured
//! 2. Year substitution places the year where the placeholder was
//! 3. Out-of-range years and rounds never resolve
//! 4. Year-and-race templates substitute both values and leave no placeholder

use proptest::prelude::*;
use f1feed_core::endpoint::{RACE_ROUND_RANGE, YEAR_RANGE};
use f1feed_core::{ConfigurationError, EndpointConfig, EndpointDescriptor};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_path() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z0-9_]{1,8}){0,3}"
}

fn arb_year() -> impl Strategy<Value = i64> {
    *YEAR_RANGE.start()..=*YEAR_RANGE.end()
}

fn arb_round() -> impl Strategy<Value = i64> {
    *RACE_ROUND_RANGE.start()..=*RACE_ROUND_RANGE.end()
}

fn arb_bad_year() -> impl Strategy<Value = i64> {
    prop_oneof![
        -10_000..*YEAR_RANGE.start(),
        (*YEAR_RANGE.end() + 1)..10_000,
    ]
}

fn arb_bad_round() -> impl Strategy<Value = i64> {
    prop_oneof![-1_000..*RACE_ROUND_RANGE.start(), (*RACE_ROUND_RANGE.end() + 1)..1_000]
}

// ── 1. Static verbatim ───────────────────────────────────────────────

proptest! {
    #[test]
    fn static_url_is_verbatim(path in arb_path()) {
        let url = format!("https://api.jolpi.ca/{path}.json");
        let desc = EndpointDescriptor::new(EndpointConfig::fixed(url.clone())).unwrap();
        prop_assert_eq!(desc.url(), url.as_str());
    }
}

// ── 2. Year substitution ─────────────────────────────────────────────

proptest! {
    #[test]
    fn year_lands_where_placeholder_was(path in arb_path(), year in arb_year()) {
        let template = format!("https://api.jolpi.ca/{path}/{{year}}");
        let desc = EndpointDescriptor::new(EndpointConfig::year_dependent(template, year)).unwrap();

        let expected_suffix = format!("/{year}");
        prop_assert!(desc.url().ends_with(&expected_suffix));
        prop_assert!(
            !desc.url().contains('{'),
            "unresolved placeholder in {}",
            desc.url()
        );
        prop_assert_eq!(desc.year(), Some(year));
    }
}

// ── 3. Range enforcement ─────────────────────────────────────────────

proptest! {
    #[test]
    fn out_of_range_year_never_resolves(year in arb_bad_year()) {
        let cfg = EndpointConfig::year_dependent("https://a.test/{year}.json", year);
        prop_assert_eq!(
            EndpointDescriptor::new(cfg).unwrap_err(),
            ConfigurationError::YearOutOfRange(year)
        );
    }

    #[test]
    fn out_of_range_round_never_resolves(year in arb_year(), round in arb_bad_round()) {
        let cfg = EndpointConfig::year_and_race("https://a.test/{year}/{race_round}.json", year, round);
        prop_assert_eq!(
            EndpointDescriptor::new(cfg).unwrap_err(),
            ConfigurationError::RaceRoundOutOfRange(round)
        );
    }
}

// ── 4. Year and race ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn year_and_race_substitutes_both(year in arb_year(), round in arb_round()) {
        let cfg = EndpointConfig::year_and_race(
            "https://api.jolpi.ca/ergast/f1/{year}/{race_round}/laps.json",
            year,
            round,
        );
        let desc = EndpointDescriptor::new(cfg).unwrap();
        prop_assert_eq!(
            desc.url(),
            format!("https://api.jolpi.ca/ergast/f1/{year}/{round}/laps.json")
        );
        prop_assert_eq!(desc.race_round(), Some(round));
    }
}
