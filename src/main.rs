use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

mod args;
mod atlas;

use crate::args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("main: arguments: {:?}", args);

    if let Err(e) = atlas::run(&args).await {
        eprintln!("An error occurred: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        } else {
            eprintln!("No trace found");
        }
        std::process::exit(1);
    }
}
