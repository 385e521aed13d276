//! matrix-bench - replay a matrix of build/test commands and time them
//!
//! Reads a scenario file of parametrized command sections, runs every
//! variant combination sequentially and writes a table of durations.

use clap::Parser;
use matrix_bench::{cli, commands::Commands};

#[derive(Parser)]
#[command(name = "matrix-bench", about = "Benchmark build/test commands across variant matrices")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
