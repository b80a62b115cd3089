//! Static reference tables for the 50 states and the District of Columbia:
//! postal abbreviation, 2-digit FIPS code, full name, 2023 population
//! estimate and approximate geographic center.

/// Reference data for one state.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct StateInfo {
    pub abbr: &'static str,
    pub fips: &'static str,
    pub name: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
}

pub const STATES: [StateInfo; 51] = [
    StateInfo { abbr: "AL", fips: "01", name: "Alabama", population: 5074296, lat: 32.806671, lng: -86.791130 },
    StateInfo { abbr: "AK", fips: "02", name: "Alaska", population: 733583, lat: 61.370716, lng: -152.404419 },
    StateInfo { abbr: "AZ", fips: "04", name: "Arizona", population: 7276316, lat: 33.729759, lng: -111.431221 },
    StateInfo { abbr: "AR", fips: "05", name: "Arkansas", population: 3060151, lat: 34.969704, lng: -92.373123 },
    StateInfo { abbr: "CA", fips: "06", name: "California", population: 39029342, lat: 36.116203, lng: -119.681564 },
    StateInfo { abbr: "CO", fips: "08", name: "Colorado", population: 5839926, lat: 39.059811, lng: -105.311104 },
    StateInfo { abbr: "CT", fips: "09", name: "Connecticut", population: 3605944, lat: 41.597782, lng: -72.755371 },
    StateInfo { abbr: "DE", fips: "10", name: "Delaware", population: 1018396, lat: 39.318523, lng: -75.507141 },
    StateInfo { abbr: "DC", fips: "11", name: "District of Columbia", population: 671803, lat: 38.907192, lng: -77.036873 },
    StateInfo { abbr: "FL", fips: "12", name: "Florida", population: 22244823, lat: 27.766279, lng: -81.686783 },
    StateInfo { abbr: "GA", fips: "13", name: "Georgia", population: 10912876, lat: 33.040619, lng: -83.643074 },
    StateInfo { abbr: "HI", fips: "15", name: "Hawaii", population: 1440196, lat: 21.094318, lng: -157.498337 },
    StateInfo { abbr: "ID", fips: "16", name: "Idaho", population: 1900920, lat: 44.240459, lng: -114.478828 },
    StateInfo { abbr: "IL", fips: "17", name: "Illinois", population: 12671469, lat: 40.349457, lng: -88.986137 },
    StateInfo { abbr: "IN", fips: "18", name: "Indiana", population: 6833037, lat: 39.849426, lng: -86.258278 },
    StateInfo { abbr: "IA", fips: "19", name: "Iowa", population: 3200517, lat: 42.011539, lng: -93.210526 },
    StateInfo { abbr: "KS", fips: "20", name: "Kansas", population: 2937150, lat: 38.526600, lng: -96.726486 },
    StateInfo { abbr: "KY", fips: "21", name: "Kentucky", population: 4512310, lat: 37.668140, lng: -84.670067 },
    StateInfo { abbr: "LA", fips: "22", name: "Louisiana", population: 4657757, lat: 31.169546, lng: -91.867805 },
    StateInfo { abbr: "ME", fips: "23", name: "Maine", population: 1385340, lat: 44.323535, lng: -69.765261 },
    StateInfo { abbr: "MD", fips: "24", name: "Maryland", population: 6165129, lat: 39.063946, lng: -76.802101 },
    StateInfo { abbr: "MA", fips: "25", name: "Massachusetts", population: 6984723, lat: 42.230171, lng: -71.530106 },
    StateInfo { abbr: "MI", fips: "26", name: "Michigan", population: 10037261, lat: 43.326618, lng: -84.536095 },
    StateInfo { abbr: "MN", fips: "27", name: "Minnesota", population: 5706494, lat: 45.694454, lng: -93.900192 },
    StateInfo { abbr: "MS", fips: "28", name: "Mississippi", population: 2940057, lat: 32.741646, lng: -89.678696 },
    StateInfo { abbr: "MO", fips: "29", name: "Missouri", population: 6168189, lat: 38.572954, lng: -92.189283 },
    StateInfo { abbr: "MT", fips: "30", name: "Montana", population: 1122867, lat: 46.921925, lng: -110.454353 },
    StateInfo { abbr: "NE", fips: "31", name: "Nebraska", population: 1967923, lat: 41.125370, lng: -98.268082 },
    StateInfo { abbr: "NV", fips: "32", name: "Nevada", population: 3177776, lat: 38.313515, lng: -117.055374 },
    StateInfo { abbr: "NH", fips: "33", name: "New Hampshire", population: 1395231, lat: 43.452492, lng: -71.563896 },
    StateInfo { abbr: "NJ", fips: "34", name: "New Jersey", population: 9261699, lat: 40.298904, lng: -74.521011 },
    StateInfo { abbr: "NM", fips: "35", name: "New Mexico", population: 2117522, lat: 34.840515, lng: -106.248482 },
    StateInfo { abbr: "NY", fips: "36", name: "New York", population: 19835913, lat: 42.165726, lng: -74.948051 },
    StateInfo { abbr: "NC", fips: "37", name: "North Carolina", population: 10698973, lat: 35.630066, lng: -79.806419 },
    StateInfo { abbr: "ND", fips: "38", name: "North Dakota", population: 779094, lat: 47.528912, lng: -99.784012 },
    StateInfo { abbr: "OH", fips: "39", name: "Ohio", population: 11780017, lat: 40.388783, lng: -82.764915 },
    StateInfo { abbr: "OK", fips: "40", name: "Oklahoma", population: 4019800, lat: 35.565342, lng: -96.928917 },
    StateInfo { abbr: "OR", fips: "41", name: "Oregon", population: 4240137, lat: 44.572021, lng: -122.070938 },
    StateInfo { abbr: "PA", fips: "42", name: "Pennsylvania", population: 13002700, lat: 40.590752, lng: -77.209755 },
    StateInfo { abbr: "RI", fips: "44", name: "Rhode Island", population: 1095610, lat: 41.680893, lng: -71.511780 },
    StateInfo { abbr: "SC", fips: "45", name: "South Carolina", population: 5282634, lat: 33.856892, lng: -80.945007 },
    StateInfo { abbr: "SD", fips: "46", name: "South Dakota", population: 909824, lat: 44.299782, lng: -99.438828 },
    StateInfo { abbr: "TN", fips: "47", name: "Tennessee", population: 7051339, lat: 35.747845, lng: -86.692345 },
    StateInfo { abbr: "TX", fips: "48", name: "Texas", population: 30029572, lat: 31.054487, lng: -97.563461 },
    StateInfo { abbr: "UT", fips: "49", name: "Utah", population: 3380800, lat: 40.150032, lng: -111.862434 },
    StateInfo { abbr: "VT", fips: "50", name: "Vermont", population: 647064, lat: 44.045876, lng: -72.710686 },
    StateInfo { abbr: "VA", fips: "51", name: "Virginia", population: 8683619, lat: 37.769337, lng: -78.169968 },
    StateInfo { abbr: "WA", fips: "53", name: "Washington", population: 7785786, lat: 47.400902, lng: -121.490494 },
    StateInfo { abbr: "WV", fips: "54", name: "West Virginia", population: 1782959, lat: 38.491226, lng: -80.954453 },
    StateInfo { abbr: "WI", fips: "55", name: "Wisconsin", population: 5895908, lat: 44.268543, lng: -89.616508 },
    StateInfo { abbr: "WY", fips: "56", name: "Wyoming", population: 581381, lat: 42.755966, lng: -107.302490 },
];

/// Looks up a state by postal abbreviation, case-insensitively.
pub fn state_by_abbr(abbr: &str) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.abbr.eq_ignore_ascii_case(abbr))
}

/// Looks up a state by its 2-digit FIPS code.
pub fn state_by_fips(fips: &str) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.fips == fips)
}

pub fn state_fips(abbr: &str) -> Option<&'static str> {
    state_by_abbr(abbr).map(|s| s.fips)
}

pub fn state_name(abbr: &str) -> Option<&'static str> {
    state_by_abbr(abbr).map(|s| s.name)
}
