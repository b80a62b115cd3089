//! Curated fallback dataset.
//!
//! A small hand-written set of states, counties and personas, used when
//! the parsed election file has nothing for a requested state. This is
//! editorial placeholder content, not derived data, so the figures here
//! are only ever served as a last resort.

use crate::model::{
    AgeDistribution, AgeProfile, Coordinates, County, Demographics, EducationBreakdown,
    HouseholdInfo, Persona, PoliticalLean, Priority, RaceBreakdown, State,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn priority(issue: &str, importance: u32, description: &str) -> Priority {
    Priority {
        issue: issue.to_string(),
        importance,
        description: description.to_string(),
    }
}

fn state(
    abbr: &str,
    name: &str,
    population: u64,
    political_lean: PoliticalLean,
    top_issues: &[&str],
    lat: f64,
    lng: f64,
) -> State {
    State {
        id: abbr.to_string(),
        name: name.to_string(),
        abbreviation: abbr.to_string(),
        population,
        political_lean,
        top_issues: strings(top_issues),
        coordinates: Coordinates { lat, lng },
    }
}

/// The ten largest battleground and anchor states.
pub fn states() -> Vec<State> {
    vec![
        state(
            "CA",
            "California",
            39538223,
            PoliticalLean::StronglyDemocratic,
            &["Climate Change", "Housing Affordability"],
            36.7783,
            -119.4179,
        ),
        state(
            "TX",
            "Texas",
            29145505,
            PoliticalLean::Republican,
            &["Immigration", "Energy"],
            31.9686,
            -99.9018,
        ),
        state(
            "FL",
            "Florida",
            21538187,
            PoliticalLean::Republican,
            &["Climate Change", "Tourism"],
            27.7663,
            -81.6868,
        ),
        state(
            "NY",
            "New York",
            20201249,
            PoliticalLean::StronglyDemocratic,
            &["Healthcare", "Urban Development"],
            42.1657,
            -74.9481,
        ),
        state(
            "PA",
            "Pennsylvania",
            13002700,
            PoliticalLean::Swing,
            &["Manufacturing", "Healthcare"],
            40.5908,
            -77.2098,
        ),
        state(
            "OH",
            "Ohio",
            11799448,
            PoliticalLean::Swing,
            &["Manufacturing", "Education"],
            40.3888,
            -82.7649,
        ),
        state(
            "GA",
            "Georgia",
            10711908,
            PoliticalLean::Swing,
            &["Voting Rights", "Economic Development"],
            33.0406,
            -83.6431,
        ),
        state(
            "NC",
            "North Carolina",
            10439388,
            PoliticalLean::Swing,
            &["Education", "Healthcare"],
            35.5397,
            -79.8431,
        ),
        state(
            "MI",
            "Michigan",
            10037334,
            PoliticalLean::Swing,
            &["Automotive Industry", "Water Quality"],
            43.3266,
            -84.5361,
        ),
        state(
            "AZ",
            "Arizona",
            7151502,
            PoliticalLean::Swing,
            &["Water Resources", "Immigration"],
            34.0489,
            -111.0937,
        ),
    ]
}

/// Five populous counties with hand-filled demographics.
pub fn counties() -> Vec<County> {
    vec![
        County {
            id: "CA-LA".to_string(),
            name: "Los Angeles County".to_string(),
            state_id: "CA".to_string(),
            state_name: "California".to_string(),
            population: 10014009,
            political_lean: PoliticalLean::StronglyDemocratic,
            median_income: 71000,
            demographics: Demographics {
                age: AgeProfile {
                    median: 37.0,
                    distribution: AgeDistribution {
                        from_18_to_34: 28,
                        from_35_to_54: 28,
                        over_55: 44,
                    },
                },
                race: RaceBreakdown {
                    white: 48.0,
                    hispanic: 49.0,
                    asian: 15.0,
                    black: 8.0,
                    other: 5.0,
                    ..Default::default()
                },
                education: EducationBreakdown {
                    high_school: 25.0,
                    some_college: 20.0,
                    bachelors: 35.0,
                    graduate: 20.0,
                    ..Default::default()
                },
            },
            top_issues: strings(&["Housing Affordability", "Homelessness", "Climate Change"]),
            coordinates: Some(Coordinates {
                lat: 34.0522,
                lng: -118.2437,
            }),
            fips: None,
        },
        County {
            id: "TX-Harris".to_string(),
            name: "Harris County".to_string(),
            state_id: "TX".to_string(),
            state_name: "Texas".to_string(),
            population: 4731145,
            political_lean: PoliticalLean::Democratic,
            median_income: 61000,
            demographics: Demographics {
                age: AgeProfile {
                    median: 34.0,
                    distribution: AgeDistribution {
                        from_18_to_34: 32,
                        from_35_to_54: 28,
                        over_55: 40,
                    },
                },
                race: RaceBreakdown {
                    white: 40.0,
                    hispanic: 42.0,
                    black: 19.0,
                    asian: 7.0,
                    other: 2.0,
                    ..Default::default()
                },
                education: EducationBreakdown {
                    high_school: 28.0,
                    some_college: 22.0,
                    bachelors: 28.0,
                    graduate: 22.0,
                    ..Default::default()
                },
            },
            top_issues: strings(&["Energy", "Immigration", "Healthcare"]),
            coordinates: Some(Coordinates {
                lat: 29.7604,
                lng: -95.3698,
            }),
            fips: None,
        },
        County {
            id: "PA-Allegheny".to_string(),
            name: "Allegheny County".to_string(),
            state_id: "PA".to_string(),
            state_name: "Pennsylvania".to_string(),
            population: 1223348,
            political_lean: PoliticalLean::Democratic,
            median_income: 58000,
            demographics: Demographics {
                age: AgeProfile {
                    median: 41.0,
                    distribution: AgeDistribution {
                        from_18_to_34: 24,
                        from_35_to_54: 26,
                        over_55: 50,
                    },
                },
                race: RaceBreakdown {
                    white: 81.0,
                    black: 13.0,
                    asian: 4.0,
                    other: 2.0,
                    ..Default::default()
                },
                education: EducationBreakdown {
                    high_school: 30.0,
                    some_college: 20.0,
                    bachelors: 30.0,
                    graduate: 20.0,
                    ..Default::default()
                },
            },
            top_issues: strings(&["Manufacturing", "Healthcare", "Education"]),
            coordinates: Some(Coordinates {
                lat: 40.4406,
                lng: -79.9959,
            }),
            fips: None,
        },
        County {
            id: "OH-Cuyahoga".to_string(),
            name: "Cuyahoga County".to_string(),
            state_id: "OH".to_string(),
            state_name: "Ohio".to_string(),
            population: 1248512,
            political_lean: PoliticalLean::Democratic,
            median_income: 52000,
            demographics: Demographics {
                age: AgeProfile {
                    median: 40.0,
                    distribution: AgeDistribution {
                        from_18_to_34: 25,
                        from_35_to_54: 26,
                        over_55: 49,
                    },
                },
                race: RaceBreakdown {
                    white: 63.0,
                    black: 30.0,
                    asian: 4.0,
                    other: 3.0,
                    ..Default::default()
                },
                education: EducationBreakdown {
                    high_school: 32.0,
                    some_college: 22.0,
                    bachelors: 28.0,
                    graduate: 18.0,
                    ..Default::default()
                },
            },
            top_issues: strings(&["Manufacturing", "Healthcare", "Education"]),
            coordinates: Some(Coordinates {
                lat: 41.4993,
                lng: -81.6944,
            }),
            fips: None,
        },
        County {
            id: "TX-Montgomery".to_string(),
            name: "Montgomery County".to_string(),
            state_id: "TX".to_string(),
            state_name: "Texas".to_string(),
            population: 620000,
            political_lean: PoliticalLean::StronglyRepublican,
            median_income: 85000,
            demographics: Demographics {
                age: AgeProfile {
                    median: 38.0,
                    distribution: AgeDistribution {
                        from_18_to_34: 28,
                        from_35_to_54: 30,
                        over_55: 42,
                    },
                },
                race: RaceBreakdown {
                    white: 78.0,
                    hispanic: 15.0,
                    black: 4.0,
                    asian: 3.0,
                    other: 1.0,
                    ..Default::default()
                },
                education: EducationBreakdown {
                    high_school: 20.0,
                    some_college: 18.0,
                    bachelors: 35.0,
                    graduate: 27.0,
                    ..Default::default()
                },
            },
            top_issues: strings(&["Taxes", "Energy", "Property Rights"]),
            coordinates: Some(Coordinates {
                lat: 30.3072,
                lng: -95.4920,
            }),
            fips: None,
        },
    ]
}

/// One representative resident per curated county.
pub fn personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "persona-1".to_string(),
            county_id: "CA-LA".to_string(),
            name: "Alex Martinez".to_string(),
            age: 32,
            occupation: "Social Media Manager".to_string(),
            household_info: HouseholdInfo {
                size: 2,
                income: 65000,
                kind: "Renting apartment with partner".to_string(),
            },
            political_alignment: PoliticalLean::Democratic,
            top_priorities: vec![
                priority(
                    "Housing Affordability",
                    95,
                    "Rent takes up 60% of income. Struggling to save for a down payment despite working full-time.",
                ),
                priority(
                    "Climate Change",
                    85,
                    "Worried about wildfires and air quality. Supports renewable energy transition.",
                ),
                priority(
                    "Healthcare Access",
                    75,
                    "Employer insurance is expensive. Needs better mental health coverage.",
                ),
            ],
            background: "Alex moved to LA five years ago for work opportunities. Enjoys the \
                         diversity and culture but struggles with the high cost of living. Active \
                         in local community organizing around housing issues."
                .to_string(),
        },
        Persona {
            id: "persona-2".to_string(),
            county_id: "TX-Harris".to_string(),
            name: "Alex Johnson".to_string(),
            age: 45,
            occupation: "Oil & Gas Operations Manager".to_string(),
            household_info: HouseholdInfo {
                size: 4,
                income: 95000,
                kind: "Owns home, two children".to_string(),
            },
            political_alignment: PoliticalLean::Republican,
            top_priorities: vec![
                priority(
                    "Energy Industry",
                    90,
                    "Job security depends on energy sector. Concerned about regulations affecting the industry.",
                ),
                priority(
                    "Taxes",
                    80,
                    "Wants lower taxes to support family savings and children's education fund.",
                ),
                priority(
                    "Immigration",
                    70,
                    "Supports legal immigration but concerned about border security and job competition.",
                ),
            ],
            background: "Alex has worked in the energy industry for 20 years. Lives in a suburban \
                         neighborhood, values family stability and economic opportunity. Active in \
                         local church and community sports."
                .to_string(),
        },
        Persona {
            id: "persona-3".to_string(),
            county_id: "PA-Allegheny".to_string(),
            name: "Alex Chen".to_string(),
            age: 38,
            occupation: "Manufacturing Technician".to_string(),
            household_info: HouseholdInfo {
                size: 3,
                income: 55000,
                kind: "Owns home, one child".to_string(),
            },
            political_alignment: PoliticalLean::Swing,
            top_priorities: vec![
                priority(
                    "Manufacturing Jobs",
                    92,
                    "Worried about factory closures and automation. Needs job training programs.",
                ),
                priority(
                    "Healthcare",
                    88,
                    "Family has pre-existing conditions. Needs affordable, comprehensive coverage.",
                ),
                priority(
                    "Education",
                    75,
                    "Wants better public schools and affordable college options for child.",
                ),
            ],
            background: "Alex's family has lived in the Pittsburgh area for three generations. \
                         Worked in manufacturing since high school. Values hard work and community \
                         but feels left behind by economic changes."
                .to_string(),
        },
        Persona {
            id: "persona-4".to_string(),
            county_id: "TX-Montgomery".to_string(),
            name: "Alex Thompson".to_string(),
            age: 52,
            occupation: "Small Business Owner (Construction)".to_string(),
            household_info: HouseholdInfo {
                size: 2,
                income: 110000,
                kind: "Owns home, empty nesters".to_string(),
            },
            political_alignment: PoliticalLean::StronglyRepublican,
            top_priorities: vec![
                priority(
                    "Property Rights",
                    95,
                    "Concerned about regulations affecting business operations and property values.",
                ),
                priority(
                    "Taxes",
                    90,
                    "Wants lower business taxes and fewer regulations to grow the business.",
                ),
                priority(
                    "Energy",
                    75,
                    "Supports local energy industry and lower energy costs for business.",
                ),
            ],
            background: "Alex started a construction business 25 years ago. Values independence, \
                         hard work, and limited government intervention. Active in local business \
                         associations and conservative political groups."
                .to_string(),
        },
    ]
}

pub fn state_by_id(id: &str) -> Option<State> {
    states().into_iter().find(|s| s.id == id)
}

pub fn counties_for_state(state_id: &str) -> Vec<County> {
    counties()
        .into_iter()
        .filter(|c| c.state_id == state_id)
        .collect()
}

pub fn county_by_id(id: &str) -> Option<County> {
    counties().into_iter().find(|c| c.id == id)
}

pub fn persona_for_county(county_id: &str) -> Option<Persona> {
    personas().into_iter().find(|p| p.county_id == county_id)
}

pub fn persona_by_id(id: &str) -> Option<Persona> {
    personas().into_iter().find(|p| p.id == id)
}

/// County FIPS behind each curated county id, for patching the curated
/// lean with parsed election results when those exist.
pub fn election_fips_for_county_id(county_id: &str) -> Option<&'static str> {
    match county_id {
        "CA-LA" => Some("06037"),
        "TX-Harris" => Some("48201"),
        "PA-Allegheny" => Some("42003"),
        "OH-Cuyahoga" => Some("39035"),
        "TX-Montgomery" => Some("48339"),
        _ => None,
    }
}
