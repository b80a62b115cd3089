use clap::Parser;

/// Builds states and counties from county-level election results, with optional Census enrichment.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The tab-separated county election results file. Without it, the tool
    /// falls back to a small curated dataset.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (directory path, optional) The directory holding the per-state county demographics files
    /// produced by --ingest-acs. When present, county records are enriched with Census data.
    #[clap(long, value_parser)]
    pub census_dir: Option<String>,

    /// (two-letter abbreviation, optional) Restricts the output to the counties of one state.
    /// Without it, every state with election data contributes its counties.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// (file path or empty) If specified, the summary will be written in JSON format to the given
    /// location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, civatlas will
    /// check that the generated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (directory path) If specified, reads the raw ACS extract files found in the given directory,
    /// writes one county demographics file per state and exits. The files go to --census-dir when
    /// set, next to the extracts otherwise.
    #[clap(long, value_parser)]
    pub ingest_acs: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
