//! Results reporting
//!
//! One row per result key with columns
//! `step, rustc wrapper, test runner, command, run 1..N, average, median`.
//! The same rows are rendered as an aligned console table and written as a
//! tab-separated file.

use std::io::{self, Write};

use tracing::warn;

use super::results::ResultTable;

/// Leading text columns of every row
const KEY_HEADERS: [&str; 4] = ["step", "rustc wrapper", "test runner", "command"];

/// Headers and formatted cells ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// Build the report from a completed result table
    ///
    /// N is the longest sample list; shorter rows leave trailing run cells empty.
    pub fn from_table(table: &ResultTable) -> Self {
        let run_count = table.max_samples();

        let mut headers: Vec<String> = KEY_HEADERS.iter().map(|h| h.to_string()).collect();
        headers.extend((1..=run_count).map(|i| format!("run {}", i)));
        headers.push("average".to_string());
        headers.push("median".to_string());

        let rows = table
            .rows()
            .map(|row| {
                if row.samples.len() != run_count {
                    warn!(
                        key = %row.key.group(),
                        rustc_wrapper = %row.key.wrapper,
                        test_runner = %row.key.runner,
                        command = %row.key.command,
                        "row has {} sample(s), expected {}",
                        row.samples.len(),
                        run_count
                    );
                }

                let mut cells = vec![
                    row.key.step.clone(),
                    row.key.wrapper.to_string(),
                    row.key.runner.to_string(),
                    row.key.command.clone(),
                ];
                cells.extend(
                    (0..run_count).map(|i| row.samples.get(i).map(format_secs).unwrap_or_default()),
                );
                cells.push(format_secs(&row.average()));
                cells.push(format_secs(&row.median()));
                cells
            })
            .collect();

        Self { headers, rows }
    }

    /// Render as an aligned plain-text table
    pub fn render_table(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        push_line(&mut output, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut output, &rule, &widths);
        for row in &self.rows {
            push_line(&mut output, row, &widths);
        }
        output
    }

    /// Render as tab-separated values, header row first
    pub fn render_tsv(&self) -> String {
        let mut output = String::new();
        for line in std::iter::once(&self.headers).chain(&self.rows) {
            output.push_str(&line.join("\t"));
            output.push('\n');
        }
        output
    }

    /// Write the tab-separated rendering to `out`
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.render_tsv().as_bytes())?;
        out.flush()
    }
}

fn format_secs(secs: &f64) -> String {
    format!("{:.3}", secs)
}

/// Text columns are left-aligned, numeric ones right-aligned
fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let last = widths.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i < KEY_HEADERS.len() {
            output.push_str(&format!("{:<width$}", cell, width = width));
        } else {
            output.push_str(&format!("{:>width$}", cell, width = width));
        }
        if i != last {
            output.push_str("  ");
        }
    }
    let trimmed = output.trim_end_matches(' ').len();
    output.truncate(trimmed);
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::results::CYCLE_STEP;
    use crate::bench::toolchain::{RustcWrapper, TestRunner, Toolchain};

    fn sample_table() -> ResultTable {
        let none = Toolchain::default();
        let mut table = ResultTable::new();
        table.record(&none, "build", "mode=\"debug\"", "cargo build mode=\"debug\"", 1.0);
        table.record(&none, "build", "mode=\"release\"", "cargo build mode=\"release\"", 3.0);
        table.record(&none, "build", "mode=\"debug\"", "cargo build mode=\"debug\"", 2.0);
        table.record(&none, "build", "mode=\"release\"", "cargo build mode=\"release\"", 5.0);
        table
    }

    #[test]
    fn test_headers_and_rows() {
        let report = Report::from_table(&sample_table());
        assert_eq!(
            report.headers,
            vec![
                "step",
                "rustc wrapper",
                "test runner",
                "command",
                "run 1",
                "run 2",
                "average",
                "median"
            ]
        );
        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.rows[0],
            vec![
                "build",
                "none",
                "test",
                "cargo build mode=\"debug\"",
                "1.000",
                "2.000",
                "1.500",
                "1.500"
            ]
        );
        assert_eq!(
            &report.rows[1][3..],
            ["cargo build mode=\"release\"", "3.000", "5.000", "4.000", "4.000"]
        );
    }

    #[test]
    fn test_toolchain_columns() {
        let sccache = Toolchain::resolve(
            RustcWrapper::Sccache,
            TestRunner::Nextest,
            Some(std::path::Path::new("/fake/sccache")),
            false,
        )
        .unwrap();
        let mut table = ResultTable::new();
        table.record(&sccache, "t", "", "cargo nextest run", 1.0);
        table.record_total(&sccache, CYCLE_STEP, 4.0);

        let report = Report::from_table(&table);
        assert_eq!(report.rows[0][..4], ["t", "sccache", "nextest", "cargo nextest run"]);
        assert_eq!(report.rows[1][..4], ["cycle", "sccache", "nextest", "total"]);
    }

    #[test]
    fn test_uneven_rows_are_padded() {
        let none = Toolchain::default();
        let mut table = ResultTable::new();
        table.record(&none, "a", "", "x", 1.0);
        table.record(&none, "a", "", "x", 1.0);
        table.record(&none, "b", "", "y", 2.0);
        let report = Report::from_table(&table);
        assert_eq!(
            report.rows[1],
            vec!["b", "none", "test", "y", "2.000", "", "2.000", "2.000"]
        );
    }

    #[test]
    fn test_render_tsv() {
        let report = Report::from_table(&sample_table());
        let tsv = report.render_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "step\trustc wrapper\ttest runner\tcommand\trun 1\trun 2\taverage\tmedian"
        );
        assert_eq!(lines[1].split('\t').count(), 8);
    }

    #[test]
    fn test_render_table_alignment() {
        let report = Report::from_table(&sample_table());
        let table = report.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("step "));
        assert!(lines[1].starts_with("-----"));
        assert!(lines[3].contains("none           test         cargo build mode=\"release\""));
        assert!(lines[3].ends_with("4.000"));
    }

    #[test]
    fn test_empty_table() {
        let report = Report::from_table(&ResultTable::new());
        assert_eq!(
            report.headers,
            vec!["step", "rustc wrapper", "test runner", "command", "average", "median"]
        );
        assert!(report.rows.is_empty());
    }

    #[test]
    fn test_write_tsv() {
        let mut out = Vec::new();
        Report::from_table(&sample_table()).write_tsv(&mut out).unwrap();
        let content = String::from_utf8(out).unwrap();
        assert!(content.starts_with("step\trustc wrapper"));
        assert_eq!(content.lines().count(), 3);
    }
}
