//! Accumulated duration samples
//!
//! One row per (step, toolchain, combination, command). Rows keep
//! first-recorded order so the report is reproducible for the same scenario.

use indexmap::IndexMap;

use super::stats;
use super::toolchain::{RustcWrapper, TestRunner, Toolchain};

/// Step name of the per-cycle total rows
pub const CYCLE_STEP: &str = "cycle";

/// Command column of total rows
pub const TOTAL_COMMAND: &str = "total";

/// Identity of one measured configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub step: String,
    pub wrapper: RustcWrapper,
    pub runner: TestRunner,
    pub combination: String,
    pub command: String,
}

impl ResultKey {
    pub fn new(toolchain: &Toolchain, step: &str, combination: &str, command: &str) -> Self {
        Self {
            step: step.to_string(),
            wrapper: toolchain.wrapper(),
            runner: toolchain.runner(),
            combination: combination.to_string(),
            command: command.to_string(),
        }
    }

    /// `step;combination`, the grouping label used in logs
    pub fn group(&self) -> String {
        format!("{};{}", self.step, self.combination)
    }
}

/// Samples recorded under one key, in recording order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub key: ResultKey,
    pub samples: Vec<f64>,
}

impl ResultRow {
    pub fn average(&self) -> f64 {
        stats::average(&self.samples)
    }

    pub fn median(&self) -> f64 {
        stats::median(&self.samples)
    }
}

/// Table of all rows recorded during a run
#[derive(Debug, Default)]
pub struct ResultTable {
    rows: IndexMap<ResultKey, Vec<f64>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, creating the row on first use
    pub fn record(
        &mut self,
        toolchain: &Toolchain,
        step: &str,
        combination: &str,
        command: &str,
        duration: f64,
    ) {
        self.rows
            .entry(ResultKey::new(toolchain, step, combination, command))
            .or_default()
            .push(duration);
    }

    /// Record a section or cycle total under `step`
    pub fn record_total(&mut self, toolchain: &Toolchain, step: &str, duration: f64) {
        self.record(toolchain, step, "", TOTAL_COMMAND, duration);
    }

    pub fn samples(&self, key: &ResultKey) -> Option<&[f64]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Rows in first-recorded order
    pub fn rows(&self) -> impl Iterator<Item = ResultRow> + '_ {
        self.rows.iter().map(|(key, samples)| ResultRow {
            key: key.clone(),
            samples: samples.clone(),
        })
    }

    /// Longest sample list in the table
    pub fn max_samples(&self) -> usize {
        self.rows.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nextest() -> Toolchain {
        Toolchain::resolve(RustcWrapper::None, TestRunner::Nextest, None, false).unwrap()
    }

    #[test]
    fn test_record_appends_under_single_key() {
        let toolchain = Toolchain::default();
        let mut table = ResultTable::new();
        table.record(&toolchain, "step", "combo", "cmd", 1.0);
        table.record(&toolchain, "step", "combo", "cmd", 2.0);

        assert_eq!(table.rows().count(), 1);
        let key = ResultKey::new(&toolchain, "step", "combo", "cmd");
        assert_eq!(table.samples(&key), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_distinct_keys_keep_insertion_order() {
        let toolchain = Toolchain::default();
        let mut table = ResultTable::new();
        table.record(&toolchain, "b", "", "cmd", 1.0);
        table.record(&toolchain, "a", "x=\"1\"", "cmd x=\"1\"", 2.0);
        table.record(&toolchain, "b", "", "cmd", 3.0);
        table.record(&toolchain, "a", "x=\"2\"", "cmd x=\"2\"", 4.0);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].key.step, "b");
        assert_eq!(rows[0].samples, vec![1.0, 3.0]);
        assert_eq!(rows[1].key.combination, "x=\"1\"");
        assert_eq!(rows[2].key.combination, "x=\"2\"");
        assert_eq!(table.max_samples(), 2);
    }

    #[test]
    fn test_toolchains_are_separate_rows() {
        let mut table = ResultTable::new();
        table.record(&Toolchain::default(), "t", "", "cargo test", 1.0);
        table.record(&nextest(), "t", "", "cargo test", 2.0);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key.runner, TestRunner::CargoTest);
        assert_eq!(rows[1].key.runner, TestRunner::Nextest);
        assert_eq!(rows[1].samples, vec![2.0]);
    }

    #[test]
    fn test_record_total() {
        let mut table = ResultTable::new();
        table.record_total(&nextest(), CYCLE_STEP, 12.5);

        let row = table.rows().next().unwrap();
        assert_eq!(row.key.step, "cycle");
        assert_eq!(row.key.combination, "");
        assert_eq!(row.key.command, TOTAL_COMMAND);
        assert_eq!(row.samples, vec![12.5]);
    }

    #[test]
    fn test_row_statistics() {
        let toolchain = Toolchain::default();
        let mut table = ResultTable::new();
        for d in [4.0, 1.0, 3.0, 2.0] {
            table.record(&toolchain, "s", "c", "cmd", d);
        }
        let row = table.rows().next().unwrap();
        assert_eq!(row.average(), 2.5);
        assert_eq!(row.median(), 2.5);
    }

    #[test]
    fn test_group_label() {
        let key = ResultKey::new(
            &Toolchain::default(),
            "build",
            "mode=\"debug\"",
            "cargo build mode=\"debug\"",
        );
        assert_eq!(key.group(), "build;mode=\"debug\"");
    }
}
