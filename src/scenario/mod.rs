//! Scenario files
//!
//! Parses the line-oriented scenario format into [`Section`]s and expands
//! each section into the cartesian product of its variant axes.

mod parser;
mod section;

pub use parser::{parse_file, parse_lines, parse_str};
pub use section::{Combination, Invocation, Iteration, Iterations, Section};
