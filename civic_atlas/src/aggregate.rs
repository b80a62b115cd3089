//! Builds display-ready `State` and `County` entities from parsed
//! election data.
//!
//! Population and income figures produced here are coarse estimates
//! standing in until Census enrichment replaces them. The curated
//! dataset fills in for states the election file does not cover.

use log::{debug, warn};

use crate::lean::{self, DEFAULT_RECENT_ELECTIONS};
use crate::mock;
use crate::model::{
    AgeDistribution, AgeProfile, County, CountyElectionData, Demographics, EducationBreakdown,
    PoliticalLean, RaceBreakdown, State,
};
use crate::parser;
use crate::states;

// Assumed share of residents voting in a presidential election, for
// back-estimating population from a vote total.
const ASSUMED_TURNOUT: f64 = 0.60;

const MINIMUM_POPULATION: u64 = 1000;

// County-name fragments that signal a large urban county with higher
// income than the state baseline.
const LARGE_URBAN_COUNTIES: [&str; 6] = [
    "Los Angeles",
    "New York",
    "Cook",
    "Harris",
    "Maricopa",
    "Dallas",
];

const COUNTY_SUFFIXES: [&str; 4] = ["county", "parish", "borough", "census area"];

/// Strips a trailing jurisdiction suffix, keeping the original casing.
/// The suffix only counts when preceded by whitespace, so a county
/// actually named "County" would survive.
fn strip_county_suffix(name: &str) -> &str {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();
    for suffix in COUNTY_SUFFIXES {
        if lower.ends_with(suffix) {
            let cut = lower.len() - suffix.len();
            if lower[..cut].ends_with(char::is_whitespace) {
                return &trimmed[..cut];
            }
        }
    }
    trimmed
}

/// Canonical form used for name matching across datasets: lowercase,
/// suffix dropped, whitespace and punctuation removed.
pub fn normalize_county_name(name: &str) -> String {
    strip_county_suffix(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Stable county identifier of the form `STATE-CleanedName`.
pub fn county_id(state_abbr: &str, county_name: &str) -> String {
    let clean: String = strip_county_suffix(county_name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{}-{}", state_abbr, clean)
}

// Appends " County" unless the name already carries a jurisdiction
// label. The check is case-sensitive, so the all-caps names in the
// election file always get the suffix.
fn display_county_name(name: &str) -> String {
    if name.contains("County") || name.contains("Parish") || name.contains("Borough") {
        name.to_string()
    } else {
        format!("{} County", name)
    }
}

fn estimate_population(total_votes: u64) -> u64 {
    let estimated = (total_votes as f64 / ASSUMED_TURNOUT).round() as u64;
    estimated.max(MINIMUM_POPULATION)
}

// State-level median income baselines in thousands of dollars.
fn state_income_base(state_abbr: &str) -> u64 {
    match state_abbr {
        "CA" => 80,
        "NY" => 72,
        "NJ" => 85,
        "MA" => 85,
        "CT" => 80,
        "TX" => 65,
        "FL" => 60,
        "PA" => 62,
        "OH" => 58,
        "GA" => 61,
        "NC" => 57,
        "MI" => 59,
        "AZ" => 62,
        "WA" => 82,
        "CO" => 75,
        "VA" => 76,
        "MD" => 87,
        "OR" => 67,
        "MN" => 74,
        "WI" => 66,
        _ => 60,
    }
}

fn estimate_median_income(state_abbr: &str, county_name: &str) -> u64 {
    let lower = county_name.to_ascii_lowercase();
    let is_large_urban = LARGE_URBAN_COUNTIES
        .iter()
        .any(|fragment| lower.contains(&fragment.to_ascii_lowercase()));
    let base = state_income_base(state_abbr) + if is_large_urban { 10 } else { 0 };
    base * 1000
}

fn placeholder_demographics() -> Demographics {
    Demographics {
        age: AgeProfile {
            median: 38.0,
            distribution: AgeDistribution {
                from_18_to_34: 28,
                from_35_to_54: 28,
                over_55: 44,
            },
        },
        race: RaceBreakdown {
            white: 75.0,
            hispanic: 15.0,
            black: 10.0,
            asian: 5.0,
            other: 5.0,
            ..Default::default()
        },
        education: EducationBreakdown {
            high_school: 30.0,
            some_college: 20.0,
            bachelors: 30.0,
            graduate: 20.0,
            ..Default::default()
        },
    }
}

/// Builds one display entity from a county's election history.
///
/// Population is back-estimated from the most recent turnout, income
/// from the state baseline, and demographics start as placeholders.
/// Returns `None` when the history carries no elections at all.
pub fn county_from_election_data(data: &CountyElectionData) -> Option<County> {
    let most_recent = data.elections.first()?;
    let political_lean = lean::calculate_political_lean(&data.elections, DEFAULT_RECENT_ELECTIONS);
    Some(County {
        id: county_id(&data.state_abbr, &data.county_name),
        name: display_county_name(&data.county_name),
        state_id: data.state_abbr.clone(),
        state_name: states::state_by_abbr(&data.state_abbr)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| data.state_abbr.clone()),
        population: estimate_population(most_recent.total_votes),
        political_lean,
        median_income: estimate_median_income(&data.state_abbr, &data.county_name),
        demographics: placeholder_demographics(),
        top_issues: Vec::new(),
        coordinates: None,
        fips: Some(parser::pad_county_fips(&data.county_fips)),
    })
}

/// Builds entities for the whole dataset, skipping unusable histories.
pub fn build_counties(data: &[CountyElectionData]) -> Vec<County> {
    let mut counties: Vec<County> = Vec::new();
    for county_data in data {
        match county_from_election_data(county_data) {
            Some(county) => counties.push(county),
            None => warn!(
                "build_counties: no usable elections for {}",
                county_data.county_name
            ),
        }
    }
    counties
}

// Looks up a parsed history matching a curated county, first through
// the static FIPS mapping, then by normalized name within the same
// state. Returns a recomputed lean only when a history is found, so a
// curated county never loses its hand-set lean to missing data.
fn lean_for_curated_county(data: &[CountyElectionData], county: &County) -> Option<PoliticalLean> {
    let by_fips = mock::election_fips_for_county_id(&county.id)
        .and_then(|fips| parser::election_data_for_county(data, fips));
    let matched = by_fips.or_else(|| {
        let wanted = normalize_county_name(&county.name);
        data.iter().find(|d| {
            d.state_abbr.eq_ignore_ascii_case(&county.state_id)
                && normalize_county_name(&d.county_name) == wanted
        })
    });
    matched.map(|d| lean::calculate_political_lean(&d.elections, DEFAULT_RECENT_ELECTIONS))
}

/// All counties of a state, preferring parsed election data and falling
/// back to the curated dataset when the state has none.
///
/// Fallback counties keep their curated values except for the lean,
/// which is recomputed wherever a matching parsed history exists.
pub fn counties_for_state(data: &[CountyElectionData], state_abbr: &str) -> Vec<County> {
    let matches = parser::election_data_for_state(data, state_abbr);
    if !matches.is_empty() {
        let counties: Vec<County> = matches
            .iter()
            .filter_map(|d| county_from_election_data(d))
            .collect();
        if !counties.is_empty() {
            return counties;
        }
    }
    debug!(
        "counties_for_state: no parsed results for {}, using curated counties",
        state_abbr
    );
    mock::counties_for_state(&state_abbr.to_ascii_uppercase())
        .into_iter()
        .map(|mut county| {
            if let Some(patched) = lean_for_curated_county(data, &county) {
                county.political_lean = patched;
            }
            county
        })
        .collect()
}

/// Finds a single county entity by id, with the same curated fallback
/// as [`counties_for_state`].
pub fn county_by_id(data: &[CountyElectionData], id: &str) -> Option<County> {
    let derived = data
        .iter()
        .find(|d| county_id(&d.state_abbr, &d.county_name) == id)
        .and_then(county_from_election_data);
    if derived.is_some() {
        return derived;
    }
    let mut county = mock::county_by_id(id)?;
    if let Some(patched) = lean_for_curated_county(data, &county) {
        county.political_lean = patched;
    }
    Some(county)
}

/// Finds a county entity by 5-digit FIPS.
pub fn county_by_fips(data: &[CountyElectionData], fips: &str) -> Option<County> {
    parser::election_data_for_county(data, fips).and_then(county_from_election_data)
}

/// Builds the full list of states with leans classified from the
/// statewide pool of recent elections. States absent from the dataset
/// come back as swing.
pub fn build_states(data: &[CountyElectionData]) -> Vec<State> {
    states::STATES
        .iter()
        .map(|info| {
            let counties = parser::election_data_for_state(data, info.abbr);
            let political_lean = lean::calculate_state_lean(&counties, DEFAULT_RECENT_ELECTIONS);
            State {
                id: info.abbr.to_string(),
                name: info.name.to_string(),
                abbreviation: info.abbr.to_string(),
                population: info.population,
                political_lean,
                top_issues: Vec::new(),
                coordinates: crate::model::Coordinates {
                    lat: info.lat,
                    lng: info.lng,
                },
            }
        })
        .collect()
}
