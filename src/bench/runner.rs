//! Benchmark driver
//!
//! Replays every section `run_count` times. Each repetition is a series of
//! cycles, one per selected toolchain, and every cycle runs all sections.
//! Inside a section, iterations follow the cartesian order and commands
//! their declared order.

use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;
use tracing::info;

use super::executor::{Executor, Launcher};
use super::results::{ResultTable, CYCLE_STEP};
use super::stats::round_millis;
use super::toolchain::Toolchain;
use crate::common::paths::resolve_relative;
use crate::common::Result;
use crate::scenario::Section;

/// Settings for one benchmark run
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Number of repetitions of the full section list
    pub run_count: u32,
    /// Cleanup command, run from `base_dir`
    pub clean_command: String,
    /// Also run the cleanup once at the start of every cycle
    pub clean_each_cycle: bool,
    /// Scenario directory; relative `workdir` options resolve against it
    pub base_dir: PathBuf,
}

/// Run all sections under every toolchain and collect the duration samples
///
/// Stops at the first failing command; nothing recorded so far is returned.
pub async fn run_sections<L: Launcher>(
    sections: &[Section],
    executor: &Executor<L>,
    toolchains: &[Toolchain],
    settings: &RunSettings,
) -> Result<ResultTable> {
    let mut results = ResultTable::new();

    for run in 1..=settings.run_count {
        for toolchain in toolchains {
            let cycle = Cycle {
                executor,
                toolchain,
                settings,
            };
            cycle.run(sections, run, &mut results).await?;
        }
    }

    Ok(results)
}

/// Label of a section's total row
fn section_step(number: usize) -> String {
    format!("section {}", number)
}

/// One pass over all sections with a fixed toolchain
struct Cycle<'a, L> {
    executor: &'a Executor<L>,
    toolchain: &'a Toolchain,
    settings: &'a RunSettings,
}

impl<L: Launcher> Cycle<'_, L> {
    async fn run(&self, sections: &[Section], run: u32, results: &mut ResultTable) -> Result<()> {
        println!(
            "\n{} {}/{} ({})",
            "Run".blue().bold(),
            run,
            self.settings.run_count,
            self.toolchain
        );

        if self.settings.clean_each_cycle {
            self.clean().await?;
        }
        let cycle_start = Instant::now();

        for (idx, section) in sections.iter().enumerate() {
            self.run_section(section, idx + 1, sections.len(), results).await?;
        }

        let elapsed = round_millis(cycle_start.elapsed().as_secs_f64());
        results.record_total(self.toolchain, CYCLE_STEP, elapsed);
        info!(
            run,
            run_count = self.settings.run_count,
            toolchain = %self.toolchain,
            "cycle finished in {:.3}s",
            elapsed
        );
        Ok(())
    }

    async fn clean(&self) -> Result<()> {
        self.executor
            .execute(
                &self.settings.clean_command,
                Some(self.settings.base_dir.as_path()),
                self.toolchain,
                false,
            )
            .await?;
        Ok(())
    }

    async fn run_section(
        &self,
        section: &Section,
        number: usize,
        total: usize,
        results: &mut ResultTable,
    ) -> Result<()> {
        let workdir: Option<PathBuf> = section
            .workdir()
            .map(|dir| resolve_relative(&self.settings.base_dir, Path::new(dir)));
        let iterations = section.iteration_count();

        println!(
            "{} {}/{} (line {}, {} iteration(s))",
            "Section".cyan(),
            number,
            total,
            section.line(),
            iterations
        );
        let section_start = Instant::now();

        for (i, iteration) in section.iterations().enumerate() {
            let label = iteration.combination.label();
            info!(
                section = number,
                iteration = i + 1,
                iterations,
                combination = %label,
                "starting iteration"
            );
            let iteration_start = Instant::now();

            for invocation in &iteration.invocations {
                if section.clean_before() {
                    self.clean().await?;
                }

                let command = self.toolchain.rewrite(&invocation.command);
                let measured = self
                    .executor
                    .execute(&command, workdir.as_deref(), self.toolchain, true)
                    .await?;
                if let Some(duration) = measured {
                    results.record(self.toolchain, invocation.step, &label, &command, duration);
                    println!(
                        "  {} [{}] {} {}",
                        "✓".green(),
                        invocation.step,
                        command.dimmed(),
                        format!("{:.3}s", duration).yellow()
                    );
                }
            }

            info!(
                section = number,
                iteration = i + 1,
                "iteration finished in {:.3}s",
                round_millis(iteration_start.elapsed().as_secs_f64())
            );
        }

        let elapsed = round_millis(section_start.elapsed().as_secs_f64());
        results.record_total(self.toolchain, &section_step(number), elapsed);
        info!(section = number, "section finished in {:.3}s", elapsed);
        Ok(())
    }
}
