//! Build-cache wrapper and test-runner selection
//!
//! The selection is applied to each spawned command's environment rather
//! than to the harness process, so iterations never leak settings into
//! each other.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::common::{Error, Result};

const RUSTC_WRAPPER_VAR: &str = "RUSTC_WRAPPER";

/// Compiler wrapper handed to cargo through `RUSTC_WRAPPER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RustcWrapper {
    #[default]
    None,
    Sccache,
}

impl FromStr for RustcWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "none" => Ok(Self::None),
            "sccache" => Ok(Self::Sccache),
            other => Err(Error::unsupported("rustc wrapper", other)),
        }
    }
}

impl fmt::Display for RustcWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Sccache => write!(f, "sccache"),
        }
    }
}

/// How `cargo test` commands are run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestRunner {
    #[default]
    CargoTest,
    Nextest,
}

impl FromStr for TestRunner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "test" => Ok(Self::CargoTest),
            "nextest" | "nextest run" => Ok(Self::Nextest),
            other => Err(Error::unsupported("test runner", other)),
        }
    }
}

impl fmt::Display for TestRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CargoTest => write!(f, "test"),
            Self::Nextest => write!(f, "nextest"),
        }
    }
}

/// Parse a comma-separated selection, dropping repeats but keeping order
pub fn parse_list<T>(values: &str) -> Result<Vec<T>>
where
    T: FromStr<Err = Error> + PartialEq,
{
    let mut parsed = Vec::new();
    for value in values.split(',') {
        let value: T = value.parse()?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }
    Ok(parsed)
}

/// Environment change to apply to a child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Set(&'static str, PathBuf),
    Remove(&'static str),
}

/// Resolved toolchain selection for a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toolchain {
    wrapper: RustcWrapper,
    wrapper_path: Option<PathBuf>,
    runner: TestRunner,
}

impl Toolchain {
    /// Resolve the wrapper binary for the selection
    ///
    /// `sccache` uses `configured_path` when given, otherwise searches PATH.
    /// With `lenient` (dry runs) a missing binary falls back to the bare name.
    pub fn resolve(
        wrapper: RustcWrapper,
        runner: TestRunner,
        configured_path: Option<&Path>,
        lenient: bool,
    ) -> Result<Self> {
        let wrapper_path = match wrapper {
            RustcWrapper::None => None,
            RustcWrapper::Sccache => Some(match configured_path {
                Some(path) => path.to_path_buf(),
                None => match which::which("sccache") {
                    Ok(path) => path,
                    Err(_) if lenient => {
                        warn!("sccache not found on PATH; using bare name for dry run");
                        PathBuf::from("sccache")
                    }
                    Err(_) => return Err(Error::WrapperNotFound("sccache".to_string())),
                },
            }),
        };

        Ok(Self {
            wrapper,
            wrapper_path,
            runner,
        })
    }

    /// Resolve every (wrapper, runner) pair, wrapper varying slowest
    pub fn sweep(
        wrappers: &[RustcWrapper],
        runners: &[TestRunner],
        configured_path: Option<&Path>,
        lenient: bool,
    ) -> Result<Vec<Self>> {
        let mut toolchains = Vec::with_capacity(wrappers.len() * runners.len());
        for &wrapper in wrappers {
            for &runner in runners {
                toolchains.push(Self::resolve(wrapper, runner, configured_path, lenient)?);
            }
        }
        Ok(toolchains)
    }

    pub fn wrapper(&self) -> RustcWrapper {
        self.wrapper
    }

    pub fn runner(&self) -> TestRunner {
        self.runner
    }

    /// Environment change every child process gets
    pub fn env_change(&self) -> EnvChange {
        match &self.wrapper_path {
            Some(path) => EnvChange::Set(RUSTC_WRAPPER_VAR, path.clone()),
            None => EnvChange::Remove(RUSTC_WRAPPER_VAR),
        }
    }

    /// Rewrite a concrete command for the selected test runner
    ///
    /// Only a leading `cargo test` is replaced; the remainder is kept as is.
    pub fn rewrite(&self, command: &str) -> String {
        if self.runner == TestRunner::Nextest {
            if let Some(rest) = strip_cargo_test(command) {
                return format!("cargo nextest run{}", rest);
            }
        }
        command.to_string()
    }
}

/// Text following a leading `cargo test`, starting with its separator
fn strip_cargo_test(command: &str) -> Option<&str> {
    let rest = command.trim_start().strip_prefix("cargo")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix("test")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rustc_wrapper={} test_runner={}", self.wrapper, self.runner)
    }
}
