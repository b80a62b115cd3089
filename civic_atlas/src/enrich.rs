//! Joins County entities with Census demographic records.
//!
//! Matching tries the full 5-digit FIPS, then the normalized name, then
//! a heuristic read of the county id. A matched county gets its
//! population, income and demographics replaced wholesale; an unmatched
//! county passes through untouched, so enrichment never drops or adds
//! entries and applying it twice changes nothing.

use std::collections::HashMap;

use log::{debug, warn};

use crate::aggregate::normalize_county_name;
use crate::model::{
    AgeDistribution, AgeProfile, CensusCountyData, County, Demographics, EducationBreakdown,
    RaceBreakdown,
};
use crate::states;

// Coarse three-bucket distribution keyed off the median age alone. Real
// age-bracket tables would do better; this mirrors the served data.
fn age_distribution_from_median(median_age: f64) -> AgeDistribution {
    if median_age < 35.0 {
        AgeDistribution {
            from_18_to_34: 35,
            from_35_to_54: 30,
            over_55: 35,
        }
    } else if median_age < 45.0 {
        AgeDistribution {
            from_18_to_34: 25,
            from_35_to_54: 35,
            over_55: 40,
        }
    } else {
        AgeDistribution {
            from_18_to_34: 20,
            from_35_to_54: 30,
            over_55: 50,
        }
    }
}

// Census "some other race" and "two or more races" fold into one
// display bucket.
fn race_from_census(census: &CensusCountyData) -> RaceBreakdown {
    RaceBreakdown {
        white: census.race.white,
        black: census.race.black,
        asian: census.race.asian,
        native_american: census.race.native_american,
        pacific_islander: census.race.pacific_islander,
        hispanic: census.race.hispanic,
        other: census.race.other + census.race.two_or_more,
    }
}

fn education_from_census(census: &CensusCountyData) -> EducationBreakdown {
    EducationBreakdown {
        less_than_high_school: census.education.less_than_high_school,
        high_school: census.education.high_school,
        some_college: census.education.some_college,
        associates: census.education.associates,
        bachelors: census.education.bachelors,
        graduate: census.education.graduate,
    }
}

/// Replaces a county's population, income and demographics with Census
/// figures. Identity fields, lean, issues and coordinates survive. The
/// mean income is not carried; the entity only displays the median.
pub fn enrich_county_with_census(county: &County, census: &CensusCountyData) -> County {
    County {
        population: census.population,
        median_income: census.median_income,
        demographics: Demographics {
            age: AgeProfile {
                median: census.median_age,
                distribution: age_distribution_from_median(census.median_age),
            },
            race: race_from_census(census),
            education: education_from_census(census),
        },
        ..county.clone()
    }
}

// Reads a county FIPS out of an id string: a bare 5-digit id carries
// the state prefix, a trailing all-numeric segment after a dash is the
// county part, and a bare 3-digit id is the county part itself.
fn extract_county_fips(county_id: &str) -> Option<String> {
    fn is_digits(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
    }
    if county_id.len() == 5 && is_digits(county_id) {
        return Some(county_id[2..].to_string());
    }
    if let Some((_, last)) = county_id.rsplit_once('-') {
        if is_digits(last) {
            return Some(last.to_string());
        }
    }
    if county_id.len() == 3 && is_digits(county_id) {
        return Some(county_id.to_string());
    }
    None
}

/// Enriches a list of counties against one state's Census records,
/// keyed by full 5-digit FIPS.
///
/// Every input yields exactly one output in the same position. A record
/// can match more than one county, but a county takes at most one
/// record, found by the first of: stored FIPS, normalized name, id
/// heuristic.
pub fn enrich_counties(
    counties: &[County],
    census_map: &HashMap<String, CensusCountyData>,
) -> Vec<County> {
    // Secondary index by normalized record name. Names that collide
    // keep the last record seen; the id is logged because the winner
    // is effectively arbitrary.
    let mut census_by_name: HashMap<String, &CensusCountyData> = HashMap::new();
    for data in census_map.values() {
        let key = normalize_county_name(&data.name);
        if let Some(previous) = census_by_name.insert(key.clone(), data) {
            debug!(
                "enrich_counties: name index collision on {:?} ({} replaces {})",
                key,
                data.full_fips(),
                previous.full_fips()
            );
        }
    }

    let mut matched = 0usize;
    let enriched: Vec<County> = counties
        .iter()
        .map(|county| {
            let mut census: Option<&CensusCountyData> = None;
            if let Some(fips) = &county.fips {
                census = census_map.get(fips);
            }
            if census.is_none() {
                census = census_by_name
                    .get(&normalize_county_name(&county.name))
                    .copied();
            }
            if census.is_none() {
                // Last resort: guess the FIPS from the id. Logged so
                // data-quality passes can spot ids relying on it.
                if let Some(county_part) = extract_county_fips(&county.id) {
                    let state_fips = states::state_fips(&county.state_id).unwrap_or("");
                    let full = format!("{}{:0>3}", state_fips, county_part);
                    debug!(
                        "enrich_counties: trying heuristic id match {} -> {}",
                        county.id, full
                    );
                    census = census_map.get(&full);
                }
            }
            match census {
                Some(data) => {
                    matched += 1;
                    enrich_county_with_census(county, data)
                }
                None => county.clone(),
            }
        })
        .collect();
    debug!(
        "enrich_counties: {} of {} counties matched",
        matched,
        counties.len()
    );
    enriched
}

/// Enriches a mixed-state collection by grouping on state FIPS and
/// joining each group against that state's records.
///
/// Groups keep their first-appearance order. Counties with an unknown
/// state abbreviation cannot be grouped and come back unchanged at the
/// end of the list. Output length always equals input length.
pub fn enrich_all(
    counties: &[County],
    census_by_state: &HashMap<String, HashMap<String, CensusCountyData>>,
) -> Vec<County> {
    if census_by_state.is_empty() {
        warn!("enrich_all: no Census data loaded, returning counties as-is");
        return counties.to_vec();
    }

    let mut state_order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&County>> = HashMap::new();
    let mut ungrouped: Vec<&County> = Vec::new();
    for county in counties {
        match states::state_fips(&county.state_id) {
            Some(fips) => {
                let entry = grouped.entry(fips.to_string()).or_default();
                if entry.is_empty() {
                    state_order.push(fips.to_string());
                }
                entry.push(county);
            }
            None => ungrouped.push(county),
        }
    }

    let mut result: Vec<County> = Vec::with_capacity(counties.len());
    for state_fips in &state_order {
        let group: Vec<County> = grouped[state_fips].iter().map(|c| (*c).clone()).collect();
        match census_by_state.get(state_fips) {
            Some(census_map) if !census_map.is_empty() => {
                result.extend(enrich_counties(&group, census_map));
            }
            _ => result.extend(group),
        }
    }
    for county in ungrouped {
        result.push(county.clone());
    }
    result
}
