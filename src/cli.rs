//! Command-line interface definitions.
//!
//! The job is a batch run with no knobs beyond "run with this config":
//! every operational option (sources, cutoff, keywords, markers, output
//! paths) lives in the YAML configuration file.

use clap::Parser;

/// Command-line arguments for the aggregation run.
///
/// # Examples
///
/// ```sh
/// azzurri_news --config ./azzurri_news.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "azzurri_news.yaml")]
    pub config: String,
}
