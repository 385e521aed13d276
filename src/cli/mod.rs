//! CLI command handling
//!
//! Resolves configuration, wires logging and dispatches to the parser and
//! benchmark runner.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use crate::bench::{
    parse_list, run_sections, Executor, Report, RunSettings, RustcWrapper, ShellLauncher,
    TestRunner, Toolchain,
};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{logging, paths, Error, Result};
use crate::scenario::{self, Section};

/// Timestamp format embedded in output file names
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            scenario,
            run_count,
            output_prefix,
            output_dir,
            dry_run,
            rustc_wrapper,
            test_runner,
            clean_each_cycle,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            let options = RunOptions {
                scenario,
                run_count,
                output_prefix: output_prefix.unwrap_or(config.run.output_prefix),
                output_dir: output_dir.unwrap_or(config.run.output_dir),
                dry_run,
                rustc_wrapper: rustc_wrapper.unwrap_or(config.toolchain.rustc_wrapper),
                test_runner: test_runner.unwrap_or(config.toolchain.test_runner),
                sccache_path: config.toolchain.sccache_path,
                clean_command: config.run.clean_command,
                clean_each_cycle: clean_each_cycle || config.run.clean_each_cycle,
                shell: config.run.shell,
            };
            run(options).await
        }

        Commands::Parse { scenario, json } => {
            logging::init_cli();
            let sections = scenario::parse_file(&scenario)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else {
                print_summary(&scenario, &sections);
            }
            Ok(())
        }
    }
}

/// Fully resolved inputs of a `run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scenario: PathBuf,
    pub run_count: u32,
    pub output_prefix: String,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    /// Comma-separated wrapper list
    pub rustc_wrapper: String,
    /// Comma-separated test-runner list
    pub test_runner: String,
    pub sccache_path: Option<PathBuf>,
    pub clean_command: String,
    pub clean_each_cycle: bool,
    pub shell: String,
}

async fn run(options: RunOptions) -> Result<()> {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    paths::ensure_output_dir(&options.output_dir)?;
    let (log_path, log_file) =
        paths::create_output_file(&options.output_dir, &options.output_prefix, &timestamp, "log")
            .map_err(|e| file_write_error(&options.output_dir, e))?;
    let _guard = logging::init_run(log_file);

    let results_file = execute(&options, &timestamp).await?;
    info!("log written to {}", log_path.display());
    info!("test results available in: {}", results_file.display());
    Ok(())
}

/// Parse, run and report; returns the path of the results file
///
/// Nothing is written unless every command succeeds. An existing results
/// file is never overwritten.
pub async fn execute(options: &RunOptions, timestamp: &str) -> Result<PathBuf> {
    let sections = scenario::parse_file(&options.scenario)?;
    info!(
        scenario = %options.scenario.display(),
        sections = sections.len(),
        "scenario parsed"
    );

    let wrappers: Vec<RustcWrapper> = parse_list(&options.rustc_wrapper)?;
    let runners: Vec<TestRunner> = parse_list(&options.test_runner)?;
    let toolchains = Toolchain::sweep(
        &wrappers,
        &runners,
        options.sccache_path.as_deref(),
        options.dry_run,
    )?;
    for toolchain in &toolchains {
        info!(toolchain = %toolchain, dry_run = options.dry_run, "toolchain selected");
    }

    let settings = RunSettings {
        run_count: options.run_count,
        clean_command: options.clean_command.clone(),
        clean_each_cycle: options.clean_each_cycle,
        base_dir: scenario_dir(&options.scenario),
    };
    let executor = Executor::new(ShellLauncher::new(&options.shell, options.dry_run));
    let results = run_sections(&sections, &executor, &toolchains, &settings).await?;

    let report = Report::from_table(&results);
    info!("results\n{}", report.render_table());

    paths::ensure_output_dir(&options.output_dir)?;
    let (results_file, file) =
        paths::create_output_file(&options.output_dir, &options.output_prefix, timestamp, "tsv")
            .map_err(|e| file_write_error(&options.output_dir, e))?;
    report
        .write_tsv(file)
        .map_err(|e| file_write_error(&results_file, e))?;

    println!("\n{} {}", "✓".green().bold(), "Benchmark finished".green().bold());
    Ok(results_file)
}

/// Directory holding the scenario file; `.` for a bare file name
fn scenario_dir(scenario: &Path) -> PathBuf {
    match scenario.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_write_error(path: &Path, error: std::io::Error) -> Error {
    Error::FileWrite {
        path: path.display().to_string(),
        error: error.to_string(),
    }
}

fn print_summary(path: &Path, sections: &[Section]) {
    println!(
        "{} {} ({} section(s))",
        "Scenario:".blue().bold(),
        path.display().to_string().white().bold(),
        sections.len()
    );

    let mut total = 0;
    for (i, section) in sections.iter().enumerate() {
        let iterations = section.iteration_count();
        let invocations = iterations * section.commands().len();
        total += invocations;

        println!(
            "\n{} {} (line {}): {} command(s), {} axis/axes, {} iteration(s)",
            "Section".cyan(),
            i + 1,
            section.line(),
            section.commands().len(),
            section.variants().len(),
            iterations
        );
        for (step, command) in section.steps().iter().zip(section.commands()) {
            println!("  [{}] {}", step, command.dimmed());
        }
        for axis in section.variants() {
            println!("  variants: {}", axis.join(", ").dimmed());
        }
        for (key, value) in section.options() {
            println!("  option {}={}", key, value);
        }
    }

    println!("\n{} {} command invocation(s) per run", "✓".green(), total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_dir() {
        assert_eq!(scenario_dir(Path::new("bench.txt")), PathBuf::from("."));
        assert_eq!(
            scenario_dir(Path::new("scenarios/bench.txt")),
            PathBuf::from("scenarios")
        );
        assert_eq!(scenario_dir(Path::new("/abs/bench.txt")), PathBuf::from("/abs"));
    }
}
