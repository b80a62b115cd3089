use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use civic_atlas::census;
use civic_atlas::store::DataStore;
use civic_atlas::{AtlasError, County, PoliticalLean};

use crate::args::Args;

// Relative to the working directory, see the manual for the layout.
const DEFAULT_DATA_PATH: &str = "data/countypres_2000-2024.tab";
const DEFAULT_CENSUS_DIR: &str = "data/census";

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Error reading {path}"))]
    ReadingInput { source: std::io::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput { source: std::io::Error, path: String },
    #[snafu(display(""))]
    EncodingJson { source: serde_json::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error building demographics for state {state_fips}"))]
    BuildingDemographics {
        source: AtlasError,
        state_fips: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type CliResult<T> = Result<T, CliError>;

fn read_reference(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(ReadingInputSnafu { path })?;
    debug!("read_reference: read {} bytes from {}", contents.len(), path);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Merges the raw ACS extracts of every state found in `extracts_dir` and
/// writes one county demographics file per state into `out_dir`.
///
/// States are located by their `acs-population-<fips>.json` file. A state
/// with a population extract but a missing or unreadable companion table
/// is an error here, unlike at serving time: ingest is the one place
/// where incomplete inputs should stop the run.
async fn run_ingest(extracts_dir: &Path, out_dir: &Path) -> CliResult<()> {
    let mut state_fips: Vec<String> = Vec::new();
    let entries = fs::read_dir(extracts_dir).context(ReadingInputSnafu {
        path: extracts_dir.display().to_string(),
    })?;
    for entry in entries {
        let entry = entry.context(ReadingInputSnafu {
            path: extracts_dir.display().to_string(),
        })?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(fips) = name
            .strip_prefix("acs-population-")
            .and_then(|rest| rest.strip_suffix(".json"))
        {
            state_fips.push(fips.to_string());
        }
    }
    state_fips.sort();
    if state_fips.is_empty() {
        whatever!(
            "No ACS extract files found in {}",
            extracts_dir.display()
        );
    }
    info!(
        "run_ingest: found extracts for {} states in {}",
        state_fips.len(),
        extracts_dir.display()
    );

    for fips in &state_fips {
        let records = census::load_state_demographics(extracts_dir, fips)
            .await
            .context(BuildingDemographicsSnafu {
                state_fips: fips.clone(),
            })?;
        let path = out_dir.join(census::demographics_file_name(fips));
        let pretty = serde_json::to_string_pretty(&records).context(EncodingJsonSnafu {})?;
        fs::write(&path, pretty).context(WritingOutputSnafu {
            path: path.display().to_string(),
        })?;
        info!(
            "run_ingest: wrote {} counties to {}",
            records.len(),
            path.display()
        );
    }
    Ok(())
}

pub async fn run(args: &Args) -> CliResult<()> {
    if let Some(extracts_dir) = &args.ingest_acs {
        let out_dir = args
            .census_dir
            .clone()
            .unwrap_or_else(|| extracts_dir.clone());
        return run_ingest(Path::new(extracts_dir), Path::new(&out_dir)).await;
    }

    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let census_dir = args
        .census_dir
        .clone()
        .unwrap_or_else(|| DEFAULT_CENSUS_DIR.to_string());
    let store = DataStore::new(PathBuf::from(data_path), PathBuf::from(census_dir));

    let states = store.states().await;
    let year = store.most_recent_election_year().await;

    let state_abbrs: Vec<String> = match &args.state {
        Some(abbr) => vec![abbr.clone()],
        None => {
            let elections = store.elections().await;
            let mut abbrs: Vec<String> = elections.iter().map(|d| d.state_abbr.clone()).collect();
            abbrs.sort();
            abbrs.dedup();
            abbrs
        }
    };
    // Census reads for different states run concurrently; the store
    // deduplicates loads per state.
    let batches = join_all(
        state_abbrs
            .iter()
            .map(|abbr| store.counties_for_state(abbr)),
    )
    .await;
    let counties: Vec<County> = batches.into_iter().flatten().collect();
    info!(
        "run: {} counties across {} states",
        counties.len(),
        state_abbrs.len()
    );

    let output = json!({
        "electionYear": year,
        "states": states,
        "counties": counties,
    });
    let pretty = serde_json::to_string_pretty(&output).context(EncodingJsonSnafu {})?;
    if let Some(path) = &args.out {
        fs::write(path, &pretty).context(WritingOutputSnafu { path })?;
        info!("run: wrote output to {}", path);
    }

    let mut lean_tallies: JSMap<String, JSValue> = JSMap::new();
    for lean in PoliticalLean::ALL {
        let count = counties.iter().filter(|c| c.political_lean == lean).count();
        lean_tallies.insert(lean.as_str().to_string(), json!(count));
    }
    let stats = json!({
        "electionYear": year,
        "stateCount": states.len(),
        "countyCount": counties.len(),
        "countyLeans": lean_tallies,
    });
    let pretty_stats = serde_json::to_string_pretty(&stats).context(EncodingJsonSnafu {})?;
    println!("summary:{}", pretty_stats);

    // The reference output, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = read_reference(reference_path)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(EncodingJsonSnafu {})?;
        if pretty_reference != pretty {
            warn!("run: found differences with the reference output");
            print_diff(pretty_reference.as_str(), pretty.as_ref(), "\n");
            whatever!("Difference detected between generated output and reference output");
        }
    }

    Ok(())
}
