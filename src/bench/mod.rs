//! Benchmark execution
//!
//! Runs the commands of parsed scenario sections, records their wall-clock
//! durations and reduces repeated runs into a report.

pub mod executor;
pub mod report;
pub mod results;
pub mod runner;
pub mod stats;
pub mod toolchain;

pub use executor::{Executor, Launch, Launcher, ShellLauncher};
pub use report::Report;
pub use results::{ResultKey, ResultRow, ResultTable, CYCLE_STEP, TOTAL_COMMAND};
pub use runner::{run_sections, RunSettings};
pub use toolchain::{parse_list, RustcWrapper, TestRunner, Toolchain};
