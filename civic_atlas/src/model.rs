// ********* Election data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One candidate's tally within a single county and year.
///
/// The percentage is relative to the total ballots cast in the county for
/// that year, not to the two-party total used by the classifier.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTally {
    pub name: String,
    pub party: String,
    pub votes: u64,
    pub percentage: f64,
}

/// A county's complete result for one election year.
///
/// Candidates are sorted descending by vote count. Rows labeled OTHER are
/// excluded from the list but still counted in `total_votes`.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionResult {
    pub year: u32,
    #[serde(rename = "countyFips")]
    pub county_fips: String,
    #[serde(rename = "countyName")]
    pub county_name: String,
    #[serde(rename = "stateAbbr")]
    pub state_abbr: String,
    #[serde(rename = "stateName")]
    pub state_name: String,
    pub candidates: Vec<CandidateTally>,
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,
}

/// A county's full multi-year election history, keyed by 5-digit FIPS.
///
/// Elections are sorted by year descending (most recent first).
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CountyElectionData {
    #[serde(rename = "countyFips")]
    pub county_fips: String,
    #[serde(rename = "countyName")]
    pub county_name: String,
    #[serde(rename = "stateAbbr")]
    pub state_abbr: String,
    #[serde(rename = "stateName")]
    pub state_name: String,
    pub elections: Vec<ElectionResult>,
}

/// Five-point categorical summary of an area's recent two-party vote split.
///
/// Always derived from vote aggregates, never stored as ground truth.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PoliticalLean {
    #[serde(rename = "strongly-democratic")]
    StronglyDemocratic,
    #[serde(rename = "democratic")]
    Democratic,
    #[serde(rename = "swing")]
    Swing,
    #[serde(rename = "republican")]
    Republican,
    #[serde(rename = "strongly-republican")]
    StronglyRepublican,
}

impl PoliticalLean {
    pub const ALL: [PoliticalLean; 5] = [
        PoliticalLean::StronglyDemocratic,
        PoliticalLean::Democratic,
        PoliticalLean::Swing,
        PoliticalLean::Republican,
        PoliticalLean::StronglyRepublican,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoliticalLean::StronglyDemocratic => "strongly-democratic",
            PoliticalLean::Democratic => "democratic",
            PoliticalLean::Swing => "swing",
            PoliticalLean::Republican => "republican",
            PoliticalLean::StronglyRepublican => "strongly-republican",
        }
    }

    /// The map display color associated with each lean.
    pub fn color(&self) -> &'static str {
        match self {
            PoliticalLean::StronglyDemocratic => "#1e40af",
            PoliticalLean::Democratic => "#3b82f6",
            PoliticalLean::Swing => "#8b5cf6",
            PoliticalLean::Republican => "#dc2626",
            PoliticalLean::StronglyRepublican => "#991b1b",
        }
    }
}

impl Display for PoliticalLean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ********* Display entities ***********

#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Population share per coarse age bracket, in percent.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgeDistribution {
    #[serde(rename = "18-34")]
    pub from_18_to_34: u32,
    #[serde(rename = "35-54")]
    pub from_35_to_54: u32,
    #[serde(rename = "55+")]
    pub over_55: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AgeProfile {
    pub median: f64,
    pub distribution: AgeDistribution,
}

/// Race shares in percent, keyed by display category.
///
/// Absent source categories default to 0 rather than being dropped, so the
/// record shape is the same for placeholder, hand-authored and Census data.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceBreakdown {
    #[serde(rename = "White", default)]
    pub white: f64,
    #[serde(rename = "Black or African American", default)]
    pub black: f64,
    #[serde(rename = "Asian", default)]
    pub asian: f64,
    #[serde(rename = "American Indian and Alaska Native", default)]
    pub native_american: f64,
    #[serde(rename = "Native Hawaiian and Other Pacific Islander", default)]
    pub pacific_islander: f64,
    #[serde(rename = "Hispanic or Latino", default)]
    pub hispanic: f64,
    #[serde(rename = "Other", default)]
    pub other: f64,
}

/// Educational attainment shares in percent, keyed by display category.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationBreakdown {
    #[serde(rename = "Less than High School", default)]
    pub less_than_high_school: f64,
    #[serde(rename = "High School", default)]
    pub high_school: f64,
    #[serde(rename = "Some College", default)]
    pub some_college: f64,
    #[serde(rename = "Associate's Degree", default)]
    pub associates: f64,
    #[serde(rename = "Bachelor's Degree", default)]
    pub bachelors: f64,
    #[serde(rename = "Graduate Degree", default)]
    pub graduate: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub age: AgeProfile,
    pub race: RaceBreakdown,
    pub education: EducationBreakdown,
}

/// The display entity for a county.
///
/// `fips` is the join key to Census data and must be preserved through
/// every enrichment step.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct County {
    pub id: String,
    pub name: String,
    #[serde(rename = "stateId")]
    pub state_id: String,
    #[serde(rename = "stateName")]
    pub state_name: String,
    pub population: u64,
    #[serde(rename = "politicalLean")]
    pub political_lean: PoliticalLean,
    #[serde(rename = "medianIncome")]
    pub median_income: u64,
    pub demographics: Demographics,
    #[serde(rename = "topIssues")]
    pub top_issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fips: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub population: u64,
    #[serde(rename = "politicalLean")]
    pub political_lean: PoliticalLean,
    #[serde(rename = "topIssues")]
    pub top_issues: Vec<String>,
    pub coordinates: Coordinates,
}

// ********* Personas ***********

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdInfo {
    pub size: u32,
    pub income: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub issue: String,
    pub importance: u32,
    pub description: String,
}

/// A hand-authored resident profile attached to a county.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    #[serde(rename = "countyId")]
    pub county_id: String,
    pub name: String,
    pub age: u32,
    pub occupation: String,
    #[serde(rename = "householdInfo")]
    pub household_info: HouseholdInfo,
    #[serde(rename = "politicalAlignment")]
    pub political_alignment: PoliticalLean,
    #[serde(rename = "topPriorities")]
    pub top_priorities: Vec<Priority>,
    pub background: String,
}

// ********* Census records ***********

/// ACS race shares in percent, as stored in the per-state census files.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CensusRace {
    pub white: f64,
    pub black: f64,
    pub asian: f64,
    #[serde(rename = "nativeAmerican")]
    pub native_american: f64,
    #[serde(rename = "pacificIslander")]
    pub pacific_islander: f64,
    pub other: f64,
    #[serde(rename = "twoOrMore")]
    pub two_or_more: f64,
    pub hispanic: f64,
}

/// ACS educational attainment shares in percent (population 25 and over).
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CensusEducation {
    #[serde(rename = "lessThanHighSchool")]
    pub less_than_high_school: f64,
    #[serde(rename = "highSchool")]
    pub high_school: f64,
    #[serde(rename = "someCollege")]
    pub some_college: f64,
    pub associates: f64,
    pub bachelors: f64,
    pub graduate: f64,
}

/// One county's demographic record from the ACS 5-year estimates.
///
/// `county_fips` is the 3-digit county part; the full 5-digit join key is
/// `state_fips` + `county_fips` zero-padded to 3.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CensusCountyData {
    #[serde(rename = "countyFips")]
    pub county_fips: String,
    #[serde(rename = "stateFips")]
    pub state_fips: String,
    pub name: String,
    pub population: u64,
    #[serde(rename = "medianAge")]
    pub median_age: f64,
    pub race: CensusRace,
    pub education: CensusEducation,
    #[serde(rename = "medianIncome")]
    pub median_income: u64,
    #[serde(rename = "meanIncome")]
    pub mean_income: u64,
}

impl CensusCountyData {
    /// The full 5-digit FIPS key for this record.
    pub fn full_fips(&self) -> String {
        format!("{}{:0>3}", self.state_fips, self.county_fips)
    }
}

// ********* Errors ***********

/// Errors surfaced at the seams of the pipeline.
///
/// None of these are fatal to a run: parsers skip malformed rows, and the
/// data store substitutes empty collections for missing or unreadable
/// sources.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AtlasError {
    /// A required source (file or dataset key) is absent.
    MissingData { key: String },
    /// A source line that cannot be interpreted; skipped by parsers.
    MalformedRow { lineno: u64, reason: String },
    /// A census or ACS source exists but cannot be read or decoded.
    ExternalService { detail: String },
    /// The election file header lacks a required column.
    MissingColumn { column: String },
}

impl Error for AtlasError {}

impl Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::MissingData { key } => write!(f, "missing data for {}", key),
            AtlasError::MalformedRow { lineno, reason } => {
                write!(f, "malformed row at line {}: {}", lineno, reason)
            }
            AtlasError::ExternalService { detail } => {
                write!(f, "external data source error: {}", detail)
            }
            AtlasError::MissingColumn { column } => {
                write!(f, "header is missing required column {}", column)
            }
        }
    }
}
