//! matrix-bench - benchmark harness for build/test command matrices
//!
//! Parses scenario files into sections of parametrized commands, expands
//! each section into the cartesian product of its variant axes, runs the
//! resulting commands one at a time and reports per-configuration timing
//! statistics.

pub mod bench;
pub mod cli;
pub mod commands;
pub mod common;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use scenario::Section;
