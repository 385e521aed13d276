//! Scenario text parser
//!
//! Scenario files are plain text. Metadata lives on `#` directive lines;
//! every other non-empty line inside a section is a literal command:
//!
//! ```text
//! # begin
//! # name=build
//! cargo build
//! # variants mode=debug,release
//! # options clean_before=true
//! # end
//! ```
//!
//! Parsing is a two-state machine (outside / inside a section). Lines
//! outside a section are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use super::section::Section;
use crate::common::{Error, Result};

/// Classification of a single scenario line
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    /// Blank line, bare `#`, or free-form comment
    Skip,
    Begin,
    End,
    Name(&'a str),
    Variants(&'a str),
    Options(&'a str),
    Command(&'a str),
}

fn classify(line: &str) -> Directive<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Directive::Skip;
    }

    let Some(rest) = line.strip_prefix('#') else {
        return Directive::Command(line);
    };
    let rest = rest.trim_start();

    if rest == "begin" {
        Directive::Begin
    } else if rest == "end" {
        Directive::End
    } else if let Some(name) = rest.strip_prefix("name=") {
        Directive::Name(name.trim())
    } else if let Some(body) = directive_body(rest, "variants") {
        Directive::Variants(body)
    } else if let Some(body) = directive_body(rest, "options") {
        Directive::Options(body)
    } else {
        Directive::Skip
    }
}

/// Match `<keyword> <body>`, requiring whitespace after the keyword
fn directive_body<'a>(rest: &'a str, keyword: &str) -> Option<&'a str> {
    let body = rest.strip_prefix(keyword)?;
    if body.is_empty() || body.starts_with(char::is_whitespace) {
        Some(body.trim())
    } else {
        None
    }
}

/// Section under construction
#[derive(Debug, Default)]
struct SectionBuilder {
    line: usize,
    variants: Vec<Vec<String>>,
    commands: Vec<String>,
    steps: Vec<String>,
    options: BTreeMap<String, String>,
}

impl fmt::Display for SectionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "steps={:?} commands={:?} variants={:?} options={:?}",
            self.steps, self.commands, self.variants, self.options
        )
    }
}

impl SectionBuilder {
    fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    /// `axis1=v1,v2;axis2=v3` -> one token list per axis
    fn add_variants(&mut self, body: &str, line: usize) -> Result<()> {
        for axis in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, values) = axis.split_once('=').ok_or_else(|| {
                Error::malformed(
                    line,
                    format!("variant axis '{}' has no '='", axis),
                    self.to_string(),
                )
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::malformed(
                    line,
                    format!("variant axis '{}' has no name", axis),
                    self.to_string(),
                ));
            }
            let tokens = values
                .split(',')
                .map(|value| format!("{}=\"{}\"", name, value.trim()))
                .collect();
            self.variants.push(tokens);
        }
        Ok(())
    }

    /// `k1=v1;k2=v2` -> flat map, later keys overwrite earlier ones
    fn add_options(&mut self, body: &str, line: usize) -> Result<()> {
        for pair in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::malformed(
                    line,
                    format!("option '{}' has no '='", pair),
                    self.to_string(),
                )
            })?;
            self.options
                .insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(())
    }

    fn seal(self, line: usize) -> Result<Section> {
        if self.steps.len() != self.commands.len() {
            return Err(Error::malformed(
                line,
                format!(
                    "{} step name(s) for {} command(s)",
                    self.steps.len(),
                    self.commands.len()
                ),
                self.to_string(),
            ));
        }
        Ok(Section {
            line: self.line,
            variants: self.variants,
            commands: self.commands,
            steps: self.steps,
            options: self.options,
        })
    }
}

enum State {
    Outside,
    Inside(SectionBuilder),
}

/// Parse scenario lines into sealed sections, in file order
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Section>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sections = Vec::new();
    let mut state = State::Outside;

    for (idx, raw) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        let directive = classify(raw.as_ref());

        state = match (state, directive) {
            (State::Outside, Directive::Begin) => State::Inside(SectionBuilder::new(line_no)),
            (State::Outside, Directive::Skip) => State::Outside,
            (State::Outside, other) => {
                debug!(line = line_no, directive = ?other, "ignoring line outside of a section");
                State::Outside
            }

            (State::Inside(builder), Directive::Begin) => {
                warn!(
                    line = line_no,
                    opened = builder.line,
                    "'# begin' inside an open section; discarding {}",
                    builder
                );
                State::Inside(SectionBuilder::new(line_no))
            }
            (State::Inside(builder), Directive::End) => {
                let section = builder.seal(line_no)?;
                debug!(
                    line = section.line,
                    commands = section.commands.len(),
                    axes = section.variants.len(),
                    "section parsed"
                );
                sections.push(section);
                State::Outside
            }
            (State::Inside(mut builder), Directive::Name(name)) => {
                builder.steps.push(name.to_string());
                State::Inside(builder)
            }
            (State::Inside(mut builder), Directive::Variants(body)) => {
                builder.add_variants(body, line_no)?;
                State::Inside(builder)
            }
            (State::Inside(mut builder), Directive::Options(body)) => {
                builder.add_options(body, line_no)?;
                State::Inside(builder)
            }
            (State::Inside(mut builder), Directive::Command(command)) => {
                builder.commands.push(command.to_string());
                State::Inside(builder)
            }
            (inside @ State::Inside(_), Directive::Skip) => inside,
        };
    }

    if let State::Inside(builder) = state {
        return Err(Error::UnterminatedSection {
            line: builder.line,
            partial: builder.to_string(),
        });
    }

    Ok(sections)
}

/// Parse scenario text
pub fn parse_str(text: &str) -> Result<Vec<Section>> {
    parse_lines(text.lines())
}

/// Read and parse a scenario file
pub fn parse_file(path: &Path) -> Result<Vec<Section>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ScenarioRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_str(&content)
}
