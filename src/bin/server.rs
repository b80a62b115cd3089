use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use log::{info, warn};
use serde_json::{json, Value as JSValue};
use tower_http::cors::CorsLayer;

use civic_atlas::census;
use civic_atlas::store::DataStore;

/// Serves states, counties, personas and Census demographics over HTTP.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct ServerArgs {
    /// (file path, optional) The tab-separated county election results file. Without it, the
    /// server falls back to a small curated dataset.
    #[clap(short, long, value_parser)]
    data: Option<String>,

    /// (directory path, optional) The directory holding the per-state county demographics files.
    #[clap(long, value_parser)]
    census_dir: Option<String>,

    /// The address and port to listen on.
    #[clap(short, long, value_parser, default_value = "127.0.0.1:3000")]
    listen: String,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<DataStore>,
    census_dir: PathBuf,
}

fn error_json(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/states - All states, with leans classified from the election data
async fn get_states(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.states().await)
}

/// GET /api/states/:id - One state by two-letter id
async fn get_state(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let found = state
        .store
        .states()
        .await
        .into_iter()
        .find(|s| s.id.eq_ignore_ascii_case(&id));
    match found {
        Some(s) => (StatusCode::OK, Json(s)).into_response(),
        None => error_json(StatusCode::NOT_FOUND, format!("State not found: {}", id)),
    }
}

/// GET /api/states/:id/counties - The counties of one state, Census-enriched
async fn get_state_counties(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.store.counties_for_state(&id).await)
}

/// GET /api/counties/:id - One county, by id or by 5-digit FIPS
async fn get_county(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let county = if id.chars().all(|c| c.is_ascii_digit()) {
        state.store.county_by_fips(&id).await
    } else {
        state.store.county_by_id(&id).await
    };
    match county {
        Some(c) => (StatusCode::OK, Json(c)).into_response(),
        None => error_json(StatusCode::NOT_FOUND, format!("County not found: {}", id)),
    }
}

/// GET /api/personas?countyId=CA-LA - The curated persona of a county
async fn get_persona(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let county_id = match params.get("countyId") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return error_json(
                StatusCode::BAD_REQUEST,
                "countyId parameter is required".to_string(),
            )
        }
    };
    match state.store.persona_for_county(county_id) {
        Some(p) => (StatusCode::OK, Json(p)).into_response(),
        None => error_json(
            StatusCode::NOT_FOUND,
            format!("No persona for county {}", county_id),
        ),
    }
}

/// GET /api/census/states - State FIPS codes with demographics on disk
async fn get_census_states(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.available_census_states().await)
}

/// GET /api/census?stateFips=06 - One state's county demographics file
///
/// Served straight from disk on every request; responses carry a one-hour
/// cache header instead.
async fn get_census(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let state_fips = match params.get("stateFips") {
        Some(fips) if !fips.is_empty() => fips.clone(),
        _ => {
            return error_json(
                StatusCode::BAD_REQUEST,
                "stateFips parameter is required".to_string(),
            )
        }
    };
    // The FIPS value becomes part of a file name; reject anything else.
    if !state_fips.chars().all(|c| c.is_ascii_digit()) {
        return error_json(
            StatusCode::NOT_FOUND,
            format!("Census data not found for state FIPS {}", state_fips),
        );
    }

    let path = state
        .census_dir
        .join(census::demographics_file_name(&state_fips));
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return error_json(
                StatusCode::NOT_FOUND,
                format!("Census data not found for state FIPS {}", state_fips),
            )
        }
        Err(e) => {
            warn!("get_census: cannot read {}: {}", path.display(), e);
            return error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load Census data".to_string(),
            );
        }
    };
    match serde_json::from_str::<JSValue>(&content) {
        Ok(data) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "public, max-age=3600")],
            Json(data),
        )
            .into_response(),
        Err(e) => {
            warn!("get_census: unreadable {}: {}", path.display(), e);
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load Census data".to_string(),
            )
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/states", get(get_states))
        .route("/states/:id", get(get_state))
        .route("/states/:id/counties", get(get_state_counties))
        .route("/counties/:id", get(get_county))
        .route("/personas", get(get_persona))
        .route("/census", get(get_census))
        .route("/census/states", get(get_census_states))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = ServerArgs::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| "data/countypres_2000-2024.tab".to_string());
    let census_dir = args
        .census_dir
        .clone()
        .unwrap_or_else(|| "data/census".to_string());
    let state = AppState {
        store: Arc::new(DataStore::new(
            PathBuf::from(data_path),
            PathBuf::from(&census_dir),
        )),
        census_dir: PathBuf::from(census_dir),
    };

    let listener = match tokio::net::TcpListener::bind(&args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Cannot listen on {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };
    info!("serving on http://{}", args.listen);
    if let Err(e) = axum::serve(listener, app(state)).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

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

    fn fixture_app(dir: &std::path::Path) -> Router {
        std::fs::write(dir.join("elections.tab"), ELECTION_TAB).unwrap();
        std::fs::write(dir.join("county-demographics-06.json"), CENSUS_06).unwrap();
        std::fs::write(dir.join("county-demographics-99.json"), "not json").unwrap();
        let state = AppState {
            store: Arc::new(DataStore::new(
                dir.join("elections.tab"),
                dir.to_path_buf(),
            )),
            census_dir: dir.to_path_buf(),
        };
        app(state)
    }

    async fn get_response(router: &Router, uri: &str) -> Response {
        router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> JSValue {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn census_endpoint_statuses_and_cache_header() {
        let dir = tempfile::tempdir().unwrap();
        let router = fixture_app(dir.path());

        let missing = get_response(&router, "/api/census").await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let js = body_json(missing).await;
        assert_eq!(js["error"], "stateFips parameter is required");

        let ok = get_response(&router, "/api/census?stateFips=06").await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(
            ok.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );
        let js = body_json(ok).await;
        assert_eq!(js.as_array().unwrap().len(), 1);
        assert_eq!(js[0]["countyFips"], "001");

        let absent = get_response(&router, "/api/census?stateFips=48").await;
        assert_eq!(absent.status(), StatusCode::NOT_FOUND);
        let js = body_json(absent).await;
        assert_eq!(js["error"], "Census data not found for state FIPS 48");

        let broken = get_response(&router, "/api/census?stateFips=99").await;
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let js = body_json(broken).await;
        assert_eq!(js["error"], "Failed to load Census data");

        // Values that do not look like a FIPS never reach the file system.
        let traversal = get_response(&router, "/api/census?stateFips=..%2F06").await;
        assert_eq!(traversal.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn state_and_county_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let router = fixture_app(dir.path());

        let states = body_json(get_response(&router, "/api/states").await).await;
        assert_eq!(states.as_array().unwrap().len(), 51);

        let ca = get_response(&router, "/api/states/ca").await;
        assert_eq!(ca.status(), StatusCode::OK);
        assert_eq!(body_json(ca).await["id"], "CA");
        let nowhere = get_response(&router, "/api/states/zz").await;
        assert_eq!(nowhere.status(), StatusCode::NOT_FOUND);

        let counties = body_json(get_response(&router, "/api/states/CA/counties").await).await;
        let counties = counties.as_array().unwrap();
        assert_eq!(counties.len(), 1);
        assert_eq!(counties[0]["id"], "CA-ALAMEDA");
        // Census enrichment is applied on the way out.
        assert_eq!(counties[0]["population"], 1622188);

        let by_id = get_response(&router, "/api/counties/CA-ALAMEDA").await;
        assert_eq!(by_id.status(), StatusCode::OK);
        let by_fips = get_response(&router, "/api/counties/06001").await;
        assert_eq!(body_json(by_fips).await["id"], "CA-ALAMEDA");
        let unknown = get_response(&router, "/api/counties/ZZ-Nowhere").await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn persona_and_listing_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let router = fixture_app(dir.path());

        let missing = get_response(&router, "/api/personas").await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(missing).await["error"],
            "countyId parameter is required"
        );

        let persona = get_response(&router, "/api/personas?countyId=CA-LA").await;
        assert_eq!(persona.status(), StatusCode::OK);
        let js = body_json(persona).await;
        assert_eq!(js["id"], "persona-1");
        assert_eq!(js["countyId"], "CA-LA");

        let none = get_response(&router, "/api/personas?countyId=CA-ALAMEDA").await;
        assert_eq!(none.status(), StatusCode::NOT_FOUND);

        let listing = body_json(get_response(&router, "/api/census/states").await).await;
        assert_eq!(listing, json!(["06", "99"]));

        let health = get_response(&router, "/api/health").await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(body_json(health).await["status"], "ok");
    }
}
