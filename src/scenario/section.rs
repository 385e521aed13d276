//! Parsed scenario sections and their variant expansion
//!
//! A [`Section`] declares variant axes and a list of command templates. Its
//! iterations are the cartesian product of the axes, enumerated with the
//! first axis varying slowest.

use serde::Serialize;
use std::collections::BTreeMap;

/// Values of `clean_before` that enable the cleanup invocation
const TRUTHY: &[&str] = &["1", "true", "yes", "on"];

/// One sealed `# begin` / `# end` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Line of the `# begin` marker (1-based)
    pub(crate) line: usize,
    /// Axes of pre-formatted `axis="value"` tokens
    pub(crate) variants: Vec<Vec<String>>,
    /// Command templates, in declared order
    pub(crate) commands: Vec<String>,
    /// Step name for each command, by position
    pub(crate) steps: Vec<String>,
    /// Free-form options (`clean_before`, `workdir`)
    pub(crate) options: BTreeMap<String, String>,
}

impl Section {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn variants(&self) -> &[Vec<String>] {
        &self.variants
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Whether a cleanup invocation runs before every command
    pub fn clean_before(&self) -> bool {
        self.options
            .get("clean_before")
            .map(|v| TRUTHY.contains(&v.trim().to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Working directory for this section's commands, if set
    pub fn workdir(&self) -> Option<&str> {
        self.options
            .get("workdir")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Number of combinations (product of axis sizes; 1 with no axes)
    pub fn iteration_count(&self) -> usize {
        self.variants.iter().map(Vec::len).product()
    }

    /// Enumerate every combination of this section's axes
    pub fn iterations(&self) -> Iterations<'_> {
        Iterations {
            section: self,
            indices: vec![0; self.variants.len()],
            done: self.variants.iter().any(Vec::is_empty),
        }
    }
}

/// One token chosen from each axis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination(Vec<String>);

impl Combination {
    /// Canonical label: the tokens joined by single spaces
    pub fn label(&self) -> String {
        self.0.join(" ")
    }

    /// Append this combination's tokens to a command template
    pub fn apply(&self, template: &str) -> String {
        if self.0.is_empty() {
            template.to_string()
        } else {
            format!("{} {}", template, self.label())
        }
    }
}

/// A concrete command with the step it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub step: &'a str,
    pub command: String,
}

/// All commands of a section for one combination
#[derive(Debug, Clone)]
pub struct Iteration<'a> {
    pub combination: Combination,
    pub invocations: Vec<Invocation<'a>>,
}

/// Iterator over a section's cartesian product
pub struct Iterations<'a> {
    section: &'a Section,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Iterator for Iterations<'a> {
    type Item = Iteration<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let axes = &self.section.variants;
        let combination = Combination(
            axes.iter()
                .zip(&self.indices)
                .map(|(axis, &i)| axis[i].clone())
                .collect(),
        );

        let invocations = self
            .section
            .commands
            .iter()
            .zip(&self.section.steps)
            .map(|(template, step)| Invocation {
                step: step.as_str(),
                command: combination.apply(template),
            })
            .collect();

        // Odometer: last axis varies fastest
        self.done = true;
        for pos in (0..axes.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < axes[pos].len() {
                self.done = false;
                break;
            }
            self.indices[pos] = 0;
        }

        Some(Iteration {
            combination,
            invocations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(variants: &[&[&str]], commands: &[&str], steps: &[&str]) -> Section {
        Section {
            line: 1,
            variants: variants
                .iter()
                .map(|axis| axis.iter().map(|s| s.to_string()).collect())
                .collect(),
            commands: commands.iter().map(|s| s.to_string()).collect(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            options: BTreeMap::new(),
        }
    }

    #[test]
    fn test_no_axes_yields_single_empty_combination() {
        let s = section(&[], &["cargo build", "cargo test"], &["build", "test"]);
        let iterations: Vec<_> = s.iterations().collect();
        assert_eq!(s.iteration_count(), 1);
        assert_eq!(iterations.len(), 1);
        assert_eq!(iterations[0].combination.label(), "");
        assert_eq!(iterations[0].invocations[0].command, "cargo build");
        assert_eq!(iterations[0].invocations[1].command, "cargo test");
    }

    #[test]
    fn test_first_axis_varies_slowest() {
        let s = section(
            &[&["a=\"1\"", "a=\"2\""], &["b=\"x\"", "b=\"y\"", "b=\"z\""]],
            &["run"],
            &["step"],
        );
        let labels: Vec<String> = s.iterations().map(|it| it.combination.label()).collect();
        assert_eq!(
            labels,
            vec![
                "a=\"1\" b=\"x\"",
                "a=\"1\" b=\"y\"",
                "a=\"1\" b=\"z\"",
                "a=\"2\" b=\"x\"",
                "a=\"2\" b=\"y\"",
                "a=\"2\" b=\"z\"",
            ]
        );
    }

    #[test]
    fn test_product_size_and_commands_per_iteration() {
        let s = section(
            &[&["a=\"1\"", "a=\"2\""], &["b=\"1\""], &["c=\"1\"", "c=\"2\"", "c=\"3\""]],
            &["one", "two"],
            &["s1", "s2"],
        );
        assert_eq!(s.iteration_count(), 6);
        let iterations: Vec<_> = s.iterations().collect();
        assert_eq!(iterations.len(), 6);
        for it in &iterations {
            assert_eq!(it.invocations.len(), 2);
            assert_eq!(it.invocations[0].step, "s1");
            assert_eq!(it.invocations[1].step, "s2");
        }
    }

    #[test]
    fn test_single_value_axis_is_kept() {
        let s = section(&[&["mode=\"debug\""]], &["cargo build"], &["build"]);
        let iterations: Vec<_> = s.iterations().collect();
        assert_eq!(iterations.len(), 1);
        assert_eq!(
            iterations[0].invocations[0].command,
            "cargo build mode=\"debug\""
        );
    }

    #[test]
    fn test_clean_before_truthiness() {
        let mut s = section(&[], &["x"], &["x"]);
        assert!(!s.clean_before());
        for value in ["1", "true", "TRUE", "yes", "on"] {
            s.options.insert("clean_before".into(), value.into());
            assert!(s.clean_before(), "{value} should be truthy");
        }
        for value in ["0", "false", "no", ""] {
            s.options.insert("clean_before".into(), value.into());
            assert!(!s.clean_before(), "{value} should be falsy");
        }
    }

    #[test]
    fn test_workdir_option() {
        let mut s = section(&[], &["x"], &["x"]);
        assert_eq!(s.workdir(), None);
        s.options.insert("workdir".into(), "sbor".into());
        assert_eq!(s.workdir(), Some("sbor"));
    }
}
