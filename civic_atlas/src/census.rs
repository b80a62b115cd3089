//! American Community Survey ingest.
//!
//! Works from raw ACS 5-year table extracts saved as JSON, one file per
//! table per state: `acs-<table>-<stateFips>.json`. Each extract keeps
//! the upstream response shape: an array of rows whose first row is the
//! header. Every value is a string or null, and the last two columns are
//! the state and county FIPS codes.
//!
//! The four tables are merged by full 5-digit FIPS into
//! [`CensusCountyData`] records, which a build step serializes to
//! `county-demographics-<stateFips>.json` for serving.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use futures::future::join_all;
use log::{debug, warn};

use crate::model::{AtlasError, CensusCountyData, CensusEducation, CensusRace};

/// Table extracts consumed per state, in merge order.
pub const ACS_TABLES: [&str; 4] = ["population", "race", "education", "income"];

/// File name of one raw table extract.
pub fn acs_extract_file_name(table: &str, state_fips: &str) -> String {
    format!("acs-{}-{}.json", table, state_fips)
}

/// File name of the merged per-state demographics file.
pub fn demographics_file_name(state_fips: &str) -> String {
    format!("county-demographics-{}.json", state_fips)
}

/// Keys merged records by full 5-digit FIPS for joining.
pub fn census_map(records: Vec<CensusCountyData>) -> HashMap<String, CensusCountyData> {
    records.into_iter().map(|r| (r.full_fips(), r)).collect()
}

// A raw extract row. Cells are string-or-null in the upstream format.
type AcsRow = Vec<Option<String>>;

// The survey reports suppressed or absent values as null, "null", an
// empty string, or a non-numeric token. All of those read as 0.
fn parse_value(cell: Option<&str>) -> f64 {
    let raw = match cell {
        Some(s) => s.trim(),
        None => return 0.0,
    };
    if raw.is_empty() || raw == "null" {
        return 0.0;
    }
    raw.parse::<f64>().unwrap_or(0.0)
}

// Share of total as a percentage rounded to one decimal place.
fn percentage(count: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    ((count / total) * 100.0 * 10.0).round() / 10.0
}

// Negative sentinel values (suppressed estimates) clamp to 0 when a
// field narrows to an unsigned count.
fn to_count(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn cell(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|v| v.as_deref())
}

fn number(row: &[Option<String>], idx: usize) -> f64 {
    parse_value(cell(row, idx))
}

// Joins the two geography columns into a 5-digit key. Rows without
// geography cannot be merged and are dropped.
fn row_fips(row: &[Option<String>], state_idx: usize, county_idx: usize) -> Option<String> {
    let state = cell(row, state_idx)?;
    let county = cell(row, county_idx)?;
    Some(format!("{}{}", state, county))
}

fn parse_acs_rows(content: &str, table: &str) -> Result<Vec<AcsRow>, AtlasError> {
    let rows: Vec<AcsRow> =
        serde_json::from_str(content).map_err(|e| AtlasError::ExternalService {
            detail: format!("unreadable {} extract: {}", table, e),
        })?;
    if rows.is_empty() {
        return Err(AtlasError::ExternalService {
            detail: format!("{} extract has no header row", table),
        });
    }
    Ok(rows.into_iter().skip(1).collect())
}

#[derive(PartialEq, Debug, Clone)]
struct PopulationEntry {
    name: String,
    population: f64,
    median_age: f64,
}

#[derive(PartialEq, Debug, Clone)]
struct IncomeEntry {
    median: f64,
    mean: f64,
}

// Columns: NAME, B01003_001E (population), B01002_001E (median age),
// state, county.
fn parse_population_table(content: &str) -> Result<HashMap<String, PopulationEntry>, AtlasError> {
    let mut result: HashMap<String, PopulationEntry> = HashMap::new();
    for row in parse_acs_rows(content, "population")? {
        let fips = match row_fips(&row, 3, 4) {
            Some(f) => f,
            None => {
                debug!("parse_population_table: row without geography, dropped");
                continue;
            }
        };
        result.insert(
            fips,
            PopulationEntry {
                name: cell(&row, 0).unwrap_or_default().to_string(),
                population: number(&row, 1),
                median_age: number(&row, 2),
            },
        );
    }
    Ok(result)
}

// Columns: NAME, B02001_001E (total), then the seven race counts
// B02001_002E..008E, B03002_012E (Hispanic or Latino), state, county.
fn parse_race_table(content: &str) -> Result<HashMap<String, CensusRace>, AtlasError> {
    let mut result: HashMap<String, CensusRace> = HashMap::new();
    for row in parse_acs_rows(content, "race")? {
        let fips = match row_fips(&row, 10, 11) {
            Some(f) => f,
            None => {
                debug!("parse_race_table: row without geography, dropped");
                continue;
            }
        };
        let total = number(&row, 1);
        result.insert(
            fips,
            CensusRace {
                white: percentage(number(&row, 2), total),
                black: percentage(number(&row, 3), total),
                native_american: percentage(number(&row, 4), total),
                asian: percentage(number(&row, 5), total),
                pacific_islander: percentage(number(&row, 6), total),
                other: percentage(number(&row, 7), total),
                two_or_more: percentage(number(&row, 8), total),
                hispanic: percentage(number(&row, 9), total),
            },
        );
    }
    Ok(result)
}

// Columns: NAME, DP02_0059E (population 25+), DP02_0060E (less than
// 9th grade), DP02_0061E (9th-12th no diploma), then high school, some
// college, associate's, bachelor's, graduate, state, county. The two
// sub-high-school counts fold into one bucket.
fn parse_education_table(content: &str) -> Result<HashMap<String, CensusEducation>, AtlasError> {
    let mut result: HashMap<String, CensusEducation> = HashMap::new();
    for row in parse_acs_rows(content, "education")? {
        let fips = match row_fips(&row, 9, 10) {
            Some(f) => f,
            None => {
                debug!("parse_education_table: row without geography, dropped");
                continue;
            }
        };
        let total = number(&row, 1);
        if total == 0.0 {
            result.insert(fips, CensusEducation::default());
            continue;
        }
        let less_than_high_school = number(&row, 2) + number(&row, 3);
        result.insert(
            fips,
            CensusEducation {
                less_than_high_school: percentage(less_than_high_school, total),
                high_school: percentage(number(&row, 4), total),
                some_college: percentage(number(&row, 5), total),
                associates: percentage(number(&row, 6), total),
                bachelors: percentage(number(&row, 7), total),
                graduate: percentage(number(&row, 8), total),
            },
        );
    }
    Ok(result)
}

// Columns: NAME, DP03_0062E (median household income), DP03_0063E
// (mean household income), state, county.
fn parse_income_table(content: &str) -> Result<HashMap<String, IncomeEntry>, AtlasError> {
    let mut result: HashMap<String, IncomeEntry> = HashMap::new();
    for row in parse_acs_rows(content, "income")? {
        let fips = match row_fips(&row, 3, 4) {
            Some(f) => f,
            None => {
                debug!("parse_income_table: row without geography, dropped");
                continue;
            }
        };
        result.insert(
            fips,
            IncomeEntry {
                median: number(&row, 1),
                mean: number(&row, 2),
            },
        );
    }
    Ok(result)
}

fn merge_state_tables(
    state_fips: &str,
    population: HashMap<String, PopulationEntry>,
    race: HashMap<String, CensusRace>,
    education: HashMap<String, CensusEducation>,
    income: HashMap<String, IncomeEntry>,
) -> Vec<CensusCountyData> {
    let all_fips: BTreeSet<String> = population
        .keys()
        .chain(race.keys())
        .chain(education.keys())
        .chain(income.keys())
        .cloned()
        .collect();

    let mut records: Vec<CensusCountyData> = Vec::with_capacity(all_fips.len());
    for fips in all_fips {
        let pop = match population.get(&fips) {
            Some(p) => p,
            None => {
                warn!("merge_state_tables: no population entry for {}, dropped", fips);
                continue;
            }
        };
        let income_entry = income.get(&fips);
        records.push(CensusCountyData {
            county_fips: fips.get(2..).unwrap_or_default().to_string(),
            state_fips: state_fips.to_string(),
            name: pop.name.clone(),
            population: to_count(pop.population),
            median_age: pop.median_age,
            race: race.get(&fips).cloned().unwrap_or_default(),
            education: education.get(&fips).cloned().unwrap_or_default(),
            median_income: to_count(income_entry.map(|i| i.median).unwrap_or(0.0)),
            mean_income: to_count(income_entry.map(|i| i.mean).unwrap_or(0.0)),
        });
    }
    records
}

/// Builds per-county demographics for one state from the four raw table
/// extracts. Counties appear in FIPS order; a county missing from the
/// population table is dropped, while missing race, education or income
/// entries degrade to zero blocks.
pub fn build_state_demographics(
    state_fips: &str,
    population_raw: &str,
    race_raw: &str,
    education_raw: &str,
    income_raw: &str,
) -> Result<Vec<CensusCountyData>, AtlasError> {
    let records = merge_state_tables(
        state_fips,
        parse_population_table(population_raw)?,
        parse_race_table(race_raw)?,
        parse_education_table(education_raw)?,
        parse_income_table(income_raw)?,
    );
    debug!(
        "build_state_demographics: {} counties for state {}",
        records.len(),
        state_fips
    );
    Ok(records)
}

async fn read_extract(
    census_dir: &Path,
    state_fips: &str,
    table: &str,
) -> Result<String, AtlasError> {
    let path = census_dir.join(acs_extract_file_name(table, state_fips));
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AtlasError::ExternalService {
            detail: format!("cannot read {}: {}", path.display(), e),
        })
}

/// Loads and merges the four table extracts for one state, reading the
/// files concurrently.
pub async fn load_state_demographics(
    census_dir: &Path,
    state_fips: &str,
) -> Result<Vec<CensusCountyData>, AtlasError> {
    let reads = ACS_TABLES.map(|table| read_extract(census_dir, state_fips, table));
    let mut contents: Vec<String> = Vec::with_capacity(ACS_TABLES.len());
    for result in join_all(reads).await {
        contents.push(result?);
    }
    // join_all keeps ACS_TABLES order.
    build_state_demographics(
        state_fips,
        &contents[0],
        &contents[1],
        &contents[2],
        &contents[3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const POPULATION_EXTRACT: &str = r#"[
      ["NAME","B01003_001E","B01002_001E","state","county"],
      ["Alameda County, California","1622188","38.1","06","001"],
      ["Alpine County, California","1190","46.9","06","003"]
    ]"#;

    const RACE_EXTRACT: &str = r#"[
      ["NAME","B02001_001E","B02001_002E","B02001_003E","B02001_004E","B02001_005E","B02001_006E","B02001_007E","B02001_008E","B03002_012E","state","county"],
      ["Alameda County, California","1622188","480000","160000","8000","500000","14000","180000","280188","360000","06","001"]
    ]"#;

    const EDUCATION_EXTRACT: &str = r#"[
      ["NAME","DP02_0059E","DP02_0060E","DP02_0061E","DP02_0062E","DP02_0063E","DP02_0064E","DP02_0065E","DP02_0066E","state","county"],
      ["Alameda County, California","1150000","46000","57500","172500","218500","69000","345000","241500","06","001"],
      ["Alpine County, California","0","0","0","0","0","0","0","0","06","003"]
    ]"#;

    const INCOME_EXTRACT: &str = r#"[
      ["NAME","DP03_0062E","DP03_0063E","state","county"],
      ["Alameda County, California","122488","160000","06","001"],
      ["Alpine County, California",null,"98000","06","003"]
    ]"#;

    fn build_sample() -> Vec<CensusCountyData> {
        build_state_demographics(
            "06",
            POPULATION_EXTRACT,
            RACE_EXTRACT,
            EDUCATION_EXTRACT,
            INCOME_EXTRACT,
        )
        .unwrap()
    }

    #[test]
    fn parses_values_with_survey_nulls() {
        assert_eq!(parse_value(Some("1234")), 1234.0);
        assert_eq!(parse_value(Some("38.1")), 38.1);
        assert_eq!(parse_value(Some("null")), 0.0);
        assert_eq!(parse_value(Some("")), 0.0);
        assert_eq!(parse_value(Some("N")), 0.0);
        assert_eq!(parse_value(None), 0.0);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        assert_eq!(percentage(480000.0, 1622188.0), 29.6);
        assert_eq!(percentage(1.0, 3.0), 33.3);
        assert_eq!(percentage(2.0, 3.0), 66.7);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn merges_tables_by_fips() {
        let records = build_sample();
        assert_eq!(records.len(), 2);
        let alameda = &records[0];
        assert_eq!(alameda.county_fips, "001");
        assert_eq!(alameda.state_fips, "06");
        assert_eq!(alameda.full_fips(), "06001");
        assert_eq!(alameda.name, "Alameda County, California");
        assert_eq!(alameda.population, 1622188);
        assert_eq!(alameda.median_age, 38.1);
        assert_eq!(alameda.median_income, 122488);
        assert_eq!(alameda.mean_income, 160000);
        assert_eq!(alameda.race.white, 29.6);
        assert_eq!(alameda.race.asian, 30.8);
        assert_eq!(alameda.race.hispanic, 22.2);
        // 46000 + 57500 over a 25+ population of 1150000.
        assert_eq!(alameda.education.less_than_high_school, 9.0);
        assert_eq!(alameda.education.bachelors, 30.0);
    }

    #[test]
    fn missing_tables_degrade_to_zero_blocks() {
        let records = build_sample();
        let alpine = &records[1];
        assert_eq!(alpine.county_fips, "003");
        // No race row for Alpine, zero 25+ population, null income.
        assert_eq!(alpine.race, CensusRace::default());
        assert_eq!(alpine.education, CensusEducation::default());
        assert_eq!(alpine.median_income, 0);
        assert_eq!(alpine.mean_income, 98000);
    }

    #[test]
    fn county_without_population_row_is_dropped() {
        let population = r#"[
          ["NAME","B01003_001E","B01002_001E","state","county"],
          ["Alameda County, California","1622188","38.1","06","001"]
        ]"#;
        let race = r#"[
          ["NAME","B02001_001E","B02001_002E","B02001_003E","B02001_004E","B02001_005E","B02001_006E","B02001_007E","B02001_008E","B03002_012E","state","county"],
          ["Ghost County","100","50","10","5","15","5","5","10","20","06","999"]
        ]"#;
        let empty_education = r#"[["NAME","DP02_0059E","DP02_0060E","DP02_0061E","DP02_0062E","DP02_0063E","DP02_0064E","DP02_0065E","DP02_0066E","state","county"]]"#;
        let empty_income = r#"[["NAME","DP03_0062E","DP03_0063E","state","county"]]"#;
        let records =
            build_state_demographics("06", population, race, empty_education, empty_income)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].county_fips, "001");
    }

    #[test]
    fn suppressed_income_sentinel_clamps_to_zero() {
        let income = r#"[
          ["NAME","DP03_0062E","DP03_0063E","state","county"],
          ["Alameda County, California","-666666666","160000","06","001"]
        ]"#;
        let records = build_state_demographics(
            "06",
            POPULATION_EXTRACT,
            RACE_EXTRACT,
            EDUCATION_EXTRACT,
            income,
        )
        .unwrap();
        assert_eq!(records[0].median_income, 0);
    }

    #[test]
    fn malformed_extract_is_an_external_service_error() {
        let err =
            build_state_demographics("06", "not json", RACE_EXTRACT, EDUCATION_EXTRACT, INCOME_EXTRACT)
                .unwrap_err();
        assert!(matches!(err, AtlasError::ExternalService { .. }));
        let err = build_state_demographics("06", "[]", RACE_EXTRACT, EDUCATION_EXTRACT, INCOME_EXTRACT)
            .unwrap_err();
        assert!(matches!(err, AtlasError::ExternalService { .. }));
    }

    #[test]
    fn census_map_keys_by_full_fips() {
        let map = census_map(build_sample());
        assert!(map.contains_key("06001"));
        assert!(map.contains_key("06003"));
    }

    #[test]
    fn file_names() {
        assert_eq!(acs_extract_file_name("race", "06"), "acs-race-06.json");
        assert_eq!(
            demographics_file_name("48"),
            "county-demographics-48.json"
        );
    }

    #[tokio::test]
    async fn loads_extracts_concurrently_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let extracts = [
            ("population", POPULATION_EXTRACT),
            ("race", RACE_EXTRACT),
            ("education", EDUCATION_EXTRACT),
            ("income", INCOME_EXTRACT),
        ];
        for (table, content) in extracts {
            let path = dir.path().join(acs_extract_file_name(table, "06"));
            let mut file = std::fs::File::create(path).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        }
        let records = load_state_demographics(dir.path(), "06").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_fips(), "06001");
    }

    #[tokio::test]
    async fn missing_extract_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_state_demographics(dir.path(), "06").await.unwrap_err();
        assert!(matches!(err, AtlasError::ExternalService { .. }));
    }
}
