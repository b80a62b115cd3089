pub use crate::model::*;

use crate::parser::{self, RawElectionRow};

// The county that subsequent tallies are recorded against.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct CountyContext {
    pub(crate) county_fips: String,
    pub(crate) county_name: String,
    pub(crate) state_abbr: String,
    pub(crate) state_name: String,
}

/// A builder for assembling election records in memory.
///
/// Rows added here go through the same grouping and ordering as file
/// parsing, so a built dataset behaves exactly like a parsed one.
///
/// ```
/// pub use civic_atlas::builder::Builder;
/// # use civic_atlas::AtlasError;
///
/// let mut builder = Builder::new().county("6037", "LOS ANGELES", "CA", "CALIFORNIA");
///
/// builder.add_tally(2020, "JOSEPH R BIDEN JR", "DEMOCRAT", 3028885, 4263443)?;
/// builder.add_tally(2020, "DONALD J TRUMP", "REPUBLICAN", 1145530, 4263443)?;
///
/// let counties = builder.build();
/// assert_eq!(counties.len(), 1);
/// # Ok::<(), AtlasError>(())
/// ```
#[derive(Default)]
pub struct Builder {
    pub(crate) _county: Option<CountyContext>,
    pub(crate) _rows: Vec<RawElectionRow>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _county: None,
            _rows: Vec::new(),
        }
    }

    /// Sets the county that subsequent tallies belong to.
    ///
    /// Short FIPS values are zero-padded here, like on file ingest.
    pub fn county(
        self,
        county_fips: &str,
        county_name: &str,
        state_abbr: &str,
        state_name: &str,
    ) -> Builder {
        Builder {
            _county: Some(CountyContext {
                county_fips: parser::pad_county_fips(county_fips),
                county_name: county_name.to_string(),
                state_abbr: state_abbr.to_string(),
                state_name: state_name.to_string(),
            }),
            _rows: self._rows,
        }
    }

    /// Adds one candidate tally for the current county.
    ///
    /// `total_votes` is the county-wide total for that year. The source
    /// files repeat it on every row and so does the builder; the value on
    /// the first tally of each county and year wins.
    pub fn add_tally(
        &mut self,
        year: u32,
        candidate: &str,
        party: &str,
        votes: u64,
        total_votes: u64,
    ) -> Result<(), AtlasError> {
        let county = self._county.clone().ok_or_else(|| AtlasError::MissingData {
            key: "builder county context".to_string(),
        })?;
        self.add_row(&RawElectionRow {
            year,
            state_abbr: county.state_abbr,
            state_name: county.state_name,
            county_name: county.county_name,
            county_fips: county.county_fips,
            candidate: candidate.to_string(),
            party: party.to_string(),
            candidate_votes: votes,
            total_votes,
        });
        Ok(())
    }

    /// Adds a fully specified source row.
    pub fn add_row(&mut self, row: &RawElectionRow) {
        self._rows.push(row.clone());
    }

    pub fn build(self) -> Vec<CountyElectionData> {
        parser::assemble_counties(self._rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_without_a_county_is_an_error() {
        let mut builder = Builder::new();
        let err = builder
            .add_tally(2020, "SOMEONE", "DEMOCRAT", 10, 20)
            .unwrap_err();
        assert!(matches!(err, AtlasError::MissingData { .. }));
    }

    #[test]
    fn built_counties_group_and_sort_like_parsed_ones() {
        let mut builder = Builder::new().county("48201", "HARRIS", "TX", "TEXAS");
        builder
            .add_tally(2016, "HILLARY CLINTON", "DEMOCRAT", 707914, 1312442)
            .unwrap();
        builder
            .add_tally(2020, "DONALD J TRUMP", "REPUBLICAN", 700630, 1640818)
            .unwrap();
        builder
            .add_tally(2020, "JOSEPH R BIDEN JR", "DEMOCRAT", 918193, 1640818)
            .unwrap();
        let mut builder = builder.county("6037", "LOS ANGELES", "CA", "CALIFORNIA");
        builder
            .add_tally(2020, "JOSEPH R BIDEN JR", "DEMOCRAT", 3028885, 4263443)
            .unwrap();

        let counties = builder.build();
        // County FIPS order, years descending, candidates by votes descending.
        let fips: Vec<&str> = counties.iter().map(|c| c.county_fips.as_str()).collect();
        assert_eq!(fips, vec!["06037", "48201"]);
        let harris = &counties[1];
        assert_eq!(harris.state_abbr, "TX");
        let years: Vec<u32> = harris.elections.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2020, 2016]);
        assert_eq!(harris.elections[0].candidates[0].party, "DEMOCRAT");
    }

    #[test]
    fn switching_counties_keeps_earlier_rows() {
        let mut builder = Builder::new().county("1", "A", "AL", "ALABAMA");
        builder.add_tally(2020, "X", "DEMOCRAT", 1, 2).unwrap();
        let mut builder = builder.county("2", "B", "AL", "ALABAMA");
        builder.add_tally(2020, "Y", "REPUBLICAN", 1, 2).unwrap();
        let counties = builder.build();
        assert_eq!(counties.len(), 2);
        assert_eq!(counties[0].county_fips, "00001");
    }
}
