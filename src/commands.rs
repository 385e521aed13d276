//! CLI command definitions
//!
//! Defines the clap commands for the benchmark harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run every section of a scenario file and record command durations
    Run {
        /// Path to the scenario file
        scenario: PathBuf,

        /// Number of times the whole scenario is replayed
        #[arg(long, short = 'n', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        run_count: u32,

        /// Prefix of the results and log file names (default: output)
        #[arg(long)]
        output_prefix: Option<String>,

        /// Directory for the results and log files (default: current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Echo commands instead of executing them
        #[arg(long)]
        dry_run: bool,

        /// Compiler wrappers to sweep, comma-separated: none, sccache
        #[arg(long)]
        rustc_wrapper: Option<String>,

        /// Test runners to sweep, comma-separated: test, nextest
        #[arg(long)]
        test_runner: Option<String>,

        /// Run the cleanup command at the start of every toolchain cycle
        #[arg(long)]
        clean_each_cycle: bool,

        /// Configuration file (default: platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse and validate a scenario file without running anything
    Parse {
        /// Path to the scenario file
        scenario: PathBuf,

        /// Print the parsed sections as JSON
        #[arg(long)]
        json: bool,
    },
}
