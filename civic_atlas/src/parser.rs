//! Parsing of the tab-separated county election results file.
//!
//! The expected input is the MIT Election Lab county-level presidential
//! returns (`countypres_2000-2024.tab`): one row per candidate per county
//! per year, with a header row naming the columns. Column order is not
//! assumed; positions are located by name.

use std::collections::HashMap;

use log::{debug, warn};

use crate::model::{AtlasError, CandidateTally, CountyElectionData, ElectionResult};

/// One source line: a single candidate's tally in one county and year.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawElectionRow {
    pub year: u32,
    pub state_abbr: String,
    pub state_name: String,
    pub county_name: String,
    /// Zero-padded to 5 digits on ingest.
    pub county_fips: String,
    pub candidate: String,
    pub party: String,
    pub candidate_votes: u64,
    pub total_votes: u64,
}

/// Left-pads a county FIPS value with zeros to 5 digits.
///
/// Source files carry 1-5 digit values; the padded string form is the
/// canonical key everywhere downstream. Never parse these as numbers.
pub fn pad_county_fips(raw: &str) -> String {
    format!("{:0>5}", raw)
}

// Column positions located by name in the header row.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ColumnIndex {
    year: usize,
    state: usize,
    state_po: usize,
    county_name: usize,
    county_fips: usize,
    candidate: usize,
    party: usize,
    candidatevotes: usize,
    totalvotes: usize,
    // Header column count; shorter rows are malformed.
    width: usize,
}

fn find_column(header: &csv::StringRecord, name: &str) -> Result<usize, AtlasError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AtlasError::MissingColumn {
            column: name.to_string(),
        })
}

impl ColumnIndex {
    fn from_header(header: &csv::StringRecord) -> Result<ColumnIndex, AtlasError> {
        Ok(ColumnIndex {
            year: find_column(header, "year")?,
            state: find_column(header, "state")?,
            state_po: find_column(header, "state_po")?,
            county_name: find_column(header, "county_name")?,
            county_fips: find_column(header, "county_fips")?,
            candidate: find_column(header, "candidate")?,
            party: find_column(header, "party")?,
            candidatevotes: find_column(header, "candidatevotes")?,
            totalvotes: find_column(header, "totalvotes")?,
            width: header.len(),
        })
    }
}

fn parse_row(
    rec: &csv::StringRecord,
    cols: &ColumnIndex,
    lineno: u64,
) -> Result<RawElectionRow, AtlasError> {
    if rec.len() < cols.width {
        return Err(AtlasError::MalformedRow {
            lineno,
            reason: format!("{} columns, header has {}", rec.len(), cols.width),
        });
    }
    let year = rec[cols.year]
        .trim()
        .parse::<u32>()
        .map_err(|_| AtlasError::MalformedRow {
            lineno,
            reason: format!("unreadable year {:?}", &rec[cols.year]),
        })?;
    Ok(RawElectionRow {
        year,
        state_abbr: rec[cols.state_po].to_string(),
        state_name: rec[cols.state].to_string(),
        county_name: rec[cols.county_name].to_string(),
        county_fips: pad_county_fips(&rec[cols.county_fips]),
        candidate: rec[cols.candidate].to_string(),
        party: rec[cols.party].to_string(),
        // The source occasionally carries blank tallies; read those as 0.
        candidate_votes: rec[cols.candidatevotes].trim().parse::<u64>().unwrap_or(0),
        total_votes: rec[cols.totalvotes].trim().parse::<u64>().unwrap_or(0),
    })
}

/// Parses the full text of an election results file into per-county,
/// per-year structured results.
///
/// Rows are grouped by 5-digit county FIPS, then by year. Within each
/// group, rows labeled OTHER (candidate or party) are dropped from the
/// candidate list but remain counted in the group total, which is read
/// once from the first row since the source repeats it on every row.
/// Malformed lines are skipped and logged; they never fail the parse.
///
/// Each county's elections come back sorted by year descending. Counties
/// with no surviving election are omitted. The result is sorted by county
/// FIPS so repeated parses of the same content are identical.
pub fn parse_election_data(content: &str) -> Result<Vec<CountyElectionData>, AtlasError> {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = rdr.into_records();

    let header = match records.next() {
        Some(Ok(rec)) => rec,
        _ => {
            return Err(AtlasError::MissingData {
                key: "election file header row".to_string(),
            })
        }
    };
    let cols = ColumnIndex::from_header(&header)?;

    let mut rows: Vec<RawElectionRow> = Vec::new();
    let mut skipped: u64 = 0;

    for (idx, rec_r) in records.enumerate() {
        let lineno = (idx + 2) as u64;
        let rec = match rec_r {
            Ok(r) => r,
            Err(e) => {
                debug!("parse_election_data: line {}: {}", lineno, e);
                skipped += 1;
                continue;
            }
        };
        // Blank lines come through as a single empty field.
        if rec.len() == 1 && rec.get(0).map(|s| s.trim().is_empty()).unwrap_or(true) {
            continue;
        }
        match parse_row(&rec, &cols, lineno) {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!("parse_election_data: skipping: {}", e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!("parse_election_data: skipped {} malformed lines", skipped);
    }

    let result = assemble_counties(rows);
    debug!("parse_election_data: {} counties parsed", result.len());
    Ok(result)
}

// Grouping and ordering shared by file parsing and the in-memory builder.
pub(crate) fn assemble_counties(rows: Vec<RawElectionRow>) -> Vec<CountyElectionData> {
    // county FIPS -> year -> rows, in insertion order within each group.
    let mut by_county: HashMap<String, HashMap<u32, Vec<RawElectionRow>>> = HashMap::new();
    for row in rows {
        by_county
            .entry(row.county_fips.clone())
            .or_default()
            .entry(row.year)
            .or_default()
            .push(row);
    }

    let mut result: Vec<CountyElectionData> = Vec::new();
    for (county_fips, year_map) in by_county {
        let mut elections: Vec<ElectionResult> = Vec::new();
        for (year, rows) in year_map {
            let total_votes = rows[0].total_votes;
            let mut candidates: Vec<CandidateTally> = rows
                .iter()
                .filter(|r| r.candidate != "OTHER" && r.party != "OTHER")
                .map(|r| CandidateTally {
                    name: r.candidate.clone(),
                    party: r.party.clone(),
                    votes: r.candidate_votes,
                    percentage: if total_votes > 0 {
                        r.candidate_votes as f64 / total_votes as f64
                    } else {
                        0.0
                    },
                })
                .collect();
            candidates.sort_by(|a, b| b.votes.cmp(&a.votes));
            if candidates.is_empty() {
                continue;
            }
            elections.push(ElectionResult {
                year,
                county_fips: county_fips.clone(),
                county_name: rows[0].county_name.clone(),
                state_abbr: rows[0].state_abbr.clone(),
                state_name: rows[0].state_name.clone(),
                candidates,
                total_votes,
            });
        }
        if elections.is_empty() {
            continue;
        }
        elections.sort_by(|a, b| b.year.cmp(&a.year));
        result.push(CountyElectionData {
            county_fips: county_fips.clone(),
            county_name: elections[0].county_name.clone(),
            state_abbr: elections[0].state_abbr.clone(),
            state_name: elections[0].state_name.clone(),
            elections,
        });
    }
    result.sort_by(|a, b| a.county_fips.cmp(&b.county_fips));
    result
}

/// Finds one county's history by FIPS, padding short values on the way in.
pub fn election_data_for_county<'a>(
    data: &'a [CountyElectionData],
    county_fips: &str,
) -> Option<&'a CountyElectionData> {
    let padded = pad_county_fips(county_fips);
    data.iter().find(|d| d.county_fips == padded)
}

/// All counties of one state, matched by abbreviation case-insensitively.
pub fn election_data_for_state<'a>(
    data: &'a [CountyElectionData],
    state_abbr: &str,
) -> Vec<&'a CountyElectionData> {
    data.iter()
        .filter(|d| d.state_abbr.eq_ignore_ascii_case(state_abbr))
        .collect()
}

/// Every county's result for one year, across the whole dataset.
pub fn election_results_for_year<'a>(
    data: &'a [CountyElectionData],
    year: u32,
) -> Vec<&'a ElectionResult> {
    data.iter()
        .filter_map(|county| county.elections.iter().find(|e| e.year == year))
        .collect()
}

/// The most recent election year present, with 2000 as the floor.
pub fn most_recent_election_year(data: &[CountyElectionData]) -> u32 {
    let mut max_year = 2000;
    for county in data {
        for election in &county.elections {
            if election.year > max_year {
                max_year = election.year;
            }
        }
    }
    max_year
}

#[cfg(test)]
mod tests {
    use super::*;

    // Header uses a scrambled column order on purpose.
    fn sample_content() -> String {
        let header = "state_po\tyear\tstate\tcounty_name\tcounty_fips\toffice\tcandidate\tparty\tcandidatevotes\ttotalvotes";
        let rows = vec![
            "CA\t2020\tCALIFORNIA\tLOS ANGELES\t6037\tUS PRESIDENT\tJOSEPH R BIDEN JR\tDEMOCRAT\t3028885\t4263443",
            "CA\t2020\tCALIFORNIA\tLOS ANGELES\t6037\tUS PRESIDENT\tDONALD J TRUMP\tREPUBLICAN\t1145530\t4263443",
            "CA\t2020\tCALIFORNIA\tLOS ANGELES\t6037\tUS PRESIDENT\tOTHER\tOTHER\t89028\t4263443",
            "CA\t2016\tCALIFORNIA\tLOS ANGELES\t6037\tUS PRESIDENT\tHILLARY CLINTON\tDEMOCRAT\t2464364\t3434308",
            "CA\t2016\tCALIFORNIA\tLOS ANGELES\t6037\tUS PRESIDENT\tDONALD TRUMP\tREPUBLICAN\t769743\t3434308",
            // Short row, skipped.
            "CA\t2016\tCALIFORNIA",
            "TX\t2020\tTEXAS\tHARRIS\t48201\tUS PRESIDENT\tDONALD J TRUMP\tREPUBLICAN\t700630\t1640818",
            "TX\t2020\tTEXAS\tHARRIS\t48201\tUS PRESIDENT\tJOSEPH R BIDEN JR\tDEMOCRAT\t918193\t1640818",
            // County whose only rows are OTHER: dropped entirely.
            "TX\t2020\tTEXAS\tLOVING\t48301\tUS PRESIDENT\tOTHER\tOTHER\t64\t64",
        ];
        format!("{}\n{}\n", header, rows.join("\n"))
    }

    #[test]
    fn groups_by_county_and_year() {
        let data = parse_election_data(&sample_content()).unwrap();
        assert_eq!(data.len(), 2);
        let la = election_data_for_county(&data, "6037").unwrap();
        assert_eq!(la.county_fips, "06037");
        assert_eq!(la.county_name, "LOS ANGELES");
        assert_eq!(la.state_abbr, "CA");
        assert_eq!(la.state_name, "CALIFORNIA");
        // Most recent first.
        let years: Vec<u32> = la.elections.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2020, 2016]);
    }

    #[test]
    fn other_rows_excluded_but_counted_in_total() {
        let data = parse_election_data(&sample_content()).unwrap();
        let la = election_data_for_county(&data, "06037").unwrap();
        let e2020 = &la.elections[0];
        assert_eq!(e2020.total_votes, 4263443);
        assert_eq!(e2020.candidates.len(), 2);
        assert!(e2020.candidates.iter().all(|c| c.party != "OTHER"));
    }

    #[test]
    fn candidates_sorted_descending_by_votes() {
        let data = parse_election_data(&sample_content()).unwrap();
        for county in &data {
            for election in &county.elections {
                for pair in election.candidates.windows(2) {
                    assert!(pair[0].votes > pair[1].votes);
                }
            }
        }
        let tx = election_data_for_county(&data, "48201").unwrap();
        assert_eq!(tx.elections[0].candidates[0].party, "DEMOCRAT");
    }

    #[test]
    fn percentages_sum_below_one() {
        let data = parse_election_data(&sample_content()).unwrap();
        for county in &data {
            for election in &county.elections {
                let sum: f64 = election.candidates.iter().map(|c| c.percentage).sum();
                assert!(sum <= 1.0 + 1e-9, "sum {} for {:?}", sum, election.year);
            }
        }
        let la = election_data_for_county(&data, "06037").unwrap();
        let biden = &la.elections[0].candidates[0];
        assert!((biden.percentage - 3028885.0 / 4263443.0).abs() < 1e-12);
    }

    #[test]
    fn all_other_county_is_omitted() {
        let data = parse_election_data(&sample_content()).unwrap();
        assert!(election_data_for_county(&data, "48301").is_none());
    }

    #[test]
    fn zero_total_votes_yields_zero_percentage() {
        let content = "year\tstate\tstate_po\tcounty_name\tcounty_fips\tcandidate\tparty\tcandidatevotes\ttotalvotes\n\
                       2020\tTEXAS\tTX\tEMPTY\t48999\tA CANDIDATE\tDEMOCRAT\t0\t0\n";
        let data = parse_election_data(content).unwrap();
        assert_eq!(data[0].elections[0].candidates[0].percentage, 0.0);
    }

    #[test]
    fn missing_header_column_is_an_error() {
        let content = "year\tstate\tcounty_name\n2020\tTEXAS\tHARRIS\n";
        let err = parse_election_data(content).unwrap_err();
        assert_eq!(
            err,
            AtlasError::MissingColumn {
                column: "state_po".to_string()
            }
        );
    }

    #[test]
    fn malformed_rows_do_not_fail_the_parse() {
        // A short row and an unreadable year, between two good rows.
        let content = "year\tstate\tstate_po\tcounty_name\tcounty_fips\tcandidate\tparty\tcandidatevotes\ttotalvotes\n\
                       2020\tOHIO\tOH\tCUYAHOGA\t39035\tCANDIDATE A\tDEMOCRAT\t300\t500\n\
                       oops\n\
                       n/a\tOHIO\tOH\tCUYAHOGA\t39035\tCANDIDATE B\tREPUBLICAN\t200\t500\n\
                       2020\tOHIO\tOH\tCUYAHOGA\t39035\tCANDIDATE C\tREPUBLICAN\t200\t500\n";
        let data = parse_election_data(content).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].elections[0].candidates.len(), 2);
    }

    #[test]
    fn fips_padding() {
        assert_eq!(pad_county_fips("6037"), "06037");
        assert_eq!(pad_county_fips("37"), "00037");
        assert_eq!(pad_county_fips("48201"), "48201");
    }

    #[test]
    fn year_accessors() {
        let data = parse_election_data(&sample_content()).unwrap();
        assert_eq!(most_recent_election_year(&data), 2020);
        assert_eq!(election_results_for_year(&data, 2020).len(), 2);
        assert_eq!(election_results_for_year(&data, 2016).len(), 1);
        assert_eq!(election_data_for_state(&data, "ca").len(), 1);
        assert_eq!(election_data_for_state(&data, "NV").len(), 0);
    }

    #[test]
    fn empty_file_reports_missing_header() {
        let err = parse_election_data("").unwrap_err();
        assert!(matches!(err, AtlasError::MissingData { .. }));
    }

    #[test]
    fn parsed_history_classifies_over_a_blended_window() {
        let content = "year\tstate\tstate_po\tcounty_name\tcounty_fips\tcandidate\tparty\tcandidatevotes\ttotalvotes\n\
                       2024\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE D\tDEMOCRAT\t650\t1000\n\
                       2024\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE R\tREPUBLICAN\t350\t1000\n\
                       2020\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE D\tDEMOCRAT\t620\t1000\n\
                       2020\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE R\tREPUBLICAN\t380\t1000\n\
                       2016\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE D\tDEMOCRAT\t580\t1000\n\
                       2016\tCALIFORNIA\tCA\tLOS ANGELES\t6037\tCANDIDATE R\tREPUBLICAN\t420\t1000\n";
        let data = parse_election_data(content).unwrap();
        // 1850 of 3000 two-party votes across the three years.
        let lean = crate::lean::calculate_political_lean(&data[0].elections, 3);
        assert_eq!(lean, crate::model::PoliticalLean::StronglyDemocratic);
    }
}
