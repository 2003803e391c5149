//! CLI entry point for the spot pattern mosaic builder

use clap::Parser;
use spotmosaic::io::cli::{Cli, MosaicProcessor};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match MosaicProcessor::new(cli).process() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
