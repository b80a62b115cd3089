//! Process-wide data store.
//!
//! Owns the two cached datasets: the parsed election file, read once,
//! and the per-state Census demographics files, each read on first use.
//! Loads are single-flight, so concurrent requests for the same state
//! share one read instead of racing. A load that fails is cached as
//! empty and logged; callers always get data, possibly degraded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, OnceCell};

use crate::aggregate;
use crate::census;
use crate::enrich;
use crate::lean;
use crate::mock;
use crate::model::{
    AtlasError, CensusCountyData, County, CountyElectionData, Persona, PoliticalLean, State,
};
use crate::parser;
use crate::states;

type CensusStateMap = Arc<HashMap<String, CensusCountyData>>;

pub struct DataStore {
    election_path: PathBuf,
    census_dir: PathBuf,
    elections: OnceCell<Arc<Vec<CountyElectionData>>>,
    census: Mutex<HashMap<String, Arc<OnceCell<CensusStateMap>>>>,
}

impl DataStore {
    pub fn new(election_path: PathBuf, census_dir: PathBuf) -> DataStore {
        DataStore {
            election_path,
            census_dir,
            elections: OnceCell::new(),
            census: Mutex::new(HashMap::new()),
        }
    }

    async fn load_elections(&self) -> Result<Vec<CountyElectionData>, AtlasError> {
        let content = tokio::fs::read_to_string(&self.election_path)
            .await
            .map_err(|e| AtlasError::MissingData {
                key: format!("{}: {}", self.election_path.display(), e),
            })?;
        parser::parse_election_data(&content)
    }

    /// The parsed election dataset, loaded on first call and shared
    /// afterwards. An unreadable or unparseable file degrades to an
    /// empty dataset.
    pub async fn elections(&self) -> Arc<Vec<CountyElectionData>> {
        self.elections
            .get_or_init(|| async {
                match self.load_elections().await {
                    Ok(data) => {
                        info!("elections: loaded {} counties", data.len());
                        Arc::new(data)
                    }
                    Err(e) => {
                        warn!("elections: {}, serving empty dataset", e);
                        Arc::new(Vec::new())
                    }
                }
            })
            .await
            .clone()
    }

    async fn load_census_state(
        &self,
        state_fips: &str,
    ) -> Result<HashMap<String, CensusCountyData>, AtlasError> {
        let path = self
            .census_dir
            .join(census::demographics_file_name(state_fips));
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AtlasError::ExternalService {
                detail: format!("cannot read {}: {}", path.display(), e),
            })?;
        let records: Vec<CensusCountyData> =
            serde_json::from_str(&content).map_err(|e| AtlasError::ExternalService {
                detail: format!("unreadable {}: {}", path.display(), e),
            })?;
        Ok(census::census_map(records))
    }

    /// One state's Census records keyed by full 5-digit FIPS, loaded on
    /// first call. A state without a demographics file caches as empty.
    pub async fn census_for_state(&self, state_fips: &str) -> CensusStateMap {
        let cell = {
            let mut cells = self.census.lock().await;
            cells
                .entry(state_fips.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        cell.get_or_init(|| async {
            match self.load_census_state(state_fips).await {
                Ok(map) => {
                    info!(
                        "census_for_state: loaded {} counties for state {}",
                        map.len(),
                        state_fips
                    );
                    Arc::new(map)
                }
                Err(e) => {
                    warn!("census_for_state: {}, serving empty map", e);
                    Arc::new(HashMap::new())
                }
            }
        })
        .await
        .clone()
    }

    /// State FIPS codes with a demographics file on disk, sorted.
    pub async fn available_census_states(&self) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.census_dir).await {
            Ok(dir) => dir,
            Err(e) => {
                warn!(
                    "available_census_states: cannot read {}: {}",
                    self.census_dir.display(),
                    e
                );
                return found;
            }
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(fips) = name
                .strip_prefix("county-demographics-")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                found.push(fips.to_string());
            }
        }
        found.sort();
        found
    }

    /// All states with leans classified from the election dataset.
    pub async fn states(&self) -> Vec<State> {
        let elections = self.elections().await;
        aggregate::build_states(&elections)
    }

    /// A state's counties: election-derived where possible, curated
    /// otherwise, Census-enriched when the state has records.
    pub async fn counties_for_state(&self, state_abbr: &str) -> Vec<County> {
        let elections = self.elections().await;
        let counties = aggregate::counties_for_state(&elections, state_abbr);
        self.enrich_for_state(counties, state_abbr).await
    }

    /// A single county by id, enriched the same way as the state list.
    pub async fn county_by_id(&self, id: &str) -> Option<County> {
        let elections = self.elections().await;
        let county = aggregate::county_by_id(&elections, id)?;
        let state_abbr = county.state_id.clone();
        let enriched = self.enrich_for_state(vec![county], &state_abbr).await;
        enriched.into_iter().next()
    }

    /// A single county by 5-digit FIPS, enriched.
    pub async fn county_by_fips(&self, fips: &str) -> Option<County> {
        let elections = self.elections().await;
        let county = aggregate::county_by_fips(&elections, fips)?;
        let state_abbr = county.state_id.clone();
        let enriched = self.enrich_for_state(vec![county], &state_abbr).await;
        enriched.into_iter().next()
    }

    /// A county's lean by FIPS, straight from its election history.
    pub async fn lean_for_county(&self, fips: &str) -> Option<PoliticalLean> {
        let elections = self.elections().await;
        parser::election_data_for_county(&elections, fips)
            .map(|d| lean::calculate_political_lean(&d.elections, lean::DEFAULT_RECENT_ELECTIONS))
    }

    async fn enrich_for_state(&self, counties: Vec<County>, state_abbr: &str) -> Vec<County> {
        let state_fips = match states::state_fips(state_abbr) {
            Some(fips) => fips,
            None => {
                debug!(
                    "enrich_for_state: unknown state {}, skipping enrichment",
                    state_abbr
                );
                return counties;
            }
        };
        let census_map = self.census_for_state(state_fips).await;
        if census_map.is_empty() {
            return counties;
        }
        enrich::enrich_counties(&counties, &census_map)
    }

    /// The curated persona attached to a county, when one exists.
    pub fn persona_for_county(&self, county_id: &str) -> Option<Persona> {
        mock::persona_for_county(county_id)
    }

    /// Most recent election year in the dataset, floored at 2000.
    pub async fn most_recent_election_year(&self) -> u32 {
        let elections = self.elections().await;
        parser::most_recent_election_year(&elections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    const ELECTION_TAB: &str = "year\tstate\tstate_po\tcounty_name\tcounty_fips\tcandidate\tparty\tcandidatevotes\ttotalvotes\n\
        2020\tCALIFORNIA\tCA\tALAMEDA\t6001\tJOSEPH R BIDEN JR\tDEMOCRAT\t617659\t770000\n\
        2020\tCALIFORNIA\tCA\tALAMEDA\t6001\tDONALD J TRUMP\tREPUBLICAN\t136309\t770000\n";

    const CENSUS_06: &str = r#"[
      {
        "countyFips": "001",
        "stateFips": "06",
        "name": "Alameda County, California",
        "population": 1622188,
        "medianAge": 38.1,
        "race": {"white": 29.6, "black": 9.9, "asian": 30.8, "nativeAmerican": 0.5, "pacificIslander": 0.9, "other": 11.1, "twoOrMore": 17.3, "hispanic": 22.2},
        "education": {"lessThanHighSchool": 9.0, "highSchool": 15.0, "someCollege": 19.0, "associates": 6.0, "bachelors": 30.0, "graduate": 21.0},
        "medianIncome": 122488,
        "meanIncome": 160000
      }
    ]"#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn store_with_fixtures() -> (tempfile::TempDir, DataStore) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "elections.tab", ELECTION_TAB);
        write_file(dir.path(), "county-demographics-06.json", CENSUS_06);
        let store = DataStore::new(
            dir.path().join("elections.tab"),
            dir.path().to_path_buf(),
        );
        (dir, store)
    }

    #[tokio::test]
    async fn serves_enriched_counties_for_a_state() {
        let (_dir, store) = store_with_fixtures();
        let counties = store.counties_for_state("CA").await;
        assert_eq!(counties.len(), 1);
        let alameda = &counties[0];
        assert_eq!(alameda.id, "CA-ALAMEDA");
        assert_eq!(alameda.political_lean, PoliticalLean::StronglyDemocratic);
        // Census figures replaced the turnout-based estimates.
        assert_eq!(alameda.population, 1622188);
        assert_eq!(alameda.median_income, 122488);
        assert_eq!(alameda.demographics.age.median, 38.1);
    }

    #[tokio::test]
    async fn state_without_census_file_keeps_estimates() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "elections.tab",
            "year\tstate\tstate_po\tcounty_name\tcounty_fips\tcandidate\tparty\tcandidatevotes\ttotalvotes\n\
             2020\tTEXAS\tTX\tHARRIS\t48201\tJOSEPH R BIDEN JR\tDEMOCRAT\t918193\t1640818\n\
             2020\tTEXAS\tTX\tHARRIS\t48201\tDONALD J TRUMP\tREPUBLICAN\t700630\t1640818\n",
        );
        let store = DataStore::new(dir.path().join("elections.tab"), dir.path().to_path_buf());
        let counties = store.counties_for_state("TX").await;
        assert_eq!(counties.len(), 1);
        // Turnout-based estimate: 1640818 / 0.60 rounded.
        assert_eq!(counties[0].population, 2_734_697);
    }

    #[tokio::test]
    async fn missing_election_file_degrades_to_curated_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path().join("absent.tab"), dir.path().to_path_buf());
        assert!(store.elections().await.is_empty());
        let states = store.states().await;
        assert_eq!(states.len(), 51);
        assert!(states.iter().all(|s| s.political_lean == PoliticalLean::Swing));
        // The curated counties stand in for a state with no parsed rows.
        let counties = store.counties_for_state("TX").await;
        assert_eq!(counties.len(), 2);
        assert_eq!(counties[0].id, "TX-Harris");
    }

    #[tokio::test]
    async fn census_loads_are_shared_between_concurrent_callers() {
        let (_dir, store) = store_with_fixtures();
        let (a, b) = futures::future::join(
            store.census_for_state("06"),
            store.census_for_state("06"),
        )
        .await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 1);
        // A later call hits the cache.
        let c = store.census_for_state("06").await;
        assert!(Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn missing_census_state_is_cached_as_empty() {
        let (_dir, store) = store_with_fixtures();
        let map = store.census_for_state("48").await;
        assert!(map.is_empty());
        let again = store.census_for_state("48").await;
        assert!(Arc::ptr_eq(&map, &again));
    }

    #[tokio::test]
    async fn lists_available_census_states_from_directory() {
        let (dir, store) = store_with_fixtures();
        write_file(dir.path(), "county-demographics-48.json", "[]");
        write_file(dir.path(), "acs-race-06.json", "[]");
        assert_eq!(
            store.available_census_states().await,
            vec!["06".to_string(), "48".to_string()]
        );
    }

    #[tokio::test]
    async fn county_lookups_and_personas() {
        let (_dir, store) = store_with_fixtures();
        let by_id = store.county_by_id("CA-ALAMEDA").await.unwrap();
        assert_eq!(by_id.population, 1622188);
        let by_fips = store.county_by_fips("6001").await.unwrap();
        assert_eq!(by_fips.id, "CA-ALAMEDA");
        assert!(store.county_by_id("ZZ-Nowhere").await.is_none());
        assert_eq!(
            store.lean_for_county("6001").await,
            Some(PoliticalLean::StronglyDemocratic)
        );
        assert!(store.lean_for_county("99999").await.is_none());
        // Personas only exist for curated counties.
        assert!(store.persona_for_county("CA-LA").is_some());
        assert!(store.persona_for_county("CA-ALAMEDA").is_none());
        assert_eq!(store.most_recent_election_year().await, 2020);
    }
}
