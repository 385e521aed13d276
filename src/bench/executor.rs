//! Command execution and timing
//!
//! Commands are handed verbatim to a shell and awaited one at a time. A
//! non-zero exit status is fatal for the whole run.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use super::stats::round_millis;
use super::toolchain::{EnvChange, Toolchain};
use crate::common::{Error, Result};

/// One process launch request
#[derive(Debug, Clone)]
pub struct Launch<'a> {
    pub command: &'a str,
    pub workdir: Option<&'a Path>,
    pub env: &'a EnvChange,
}

/// Starts a command and waits for it to finish
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run the command to completion; `Err` on spawn failure or non-zero exit
    async fn launch(&self, launch: &Launch<'_>) -> Result<()>;
}

/// Launches commands through a shell (`<shell> -c <command>`)
///
/// In dry-run mode the command is only echoed.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    shell: String,
    dry_run: bool,
}

impl ShellLauncher {
    pub fn new(shell: impl Into<String>, dry_run: bool) -> Self {
        Self {
            shell: shell.into(),
            dry_run,
        }
    }

    fn build(&self, launch: &Launch<'_>) -> TokioCommand {
        let mut cmd = if self.dry_run {
            let mut echo = TokioCommand::new("echo");
            echo.arg(launch.command);
            echo
        } else {
            let mut sh = TokioCommand::new(&self.shell);
            sh.arg("-c").arg(launch.command);
            match launch.env {
                EnvChange::Set(key, value) => {
                    sh.env(key, value);
                }
                EnvChange::Remove(key) => {
                    sh.env_remove(key);
                }
            }
            sh
        };

        if let Some(dir) = launch.workdir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

#[async_trait]
impl Launcher for ShellLauncher {
    async fn launch(&self, launch: &Launch<'_>) -> Result<()> {
        let status = self
            .build(launch)
            .status()
            .await
            .map_err(|e| Error::CommandSpawn {
                command: launch.command.to_string(),
                error: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::command_failed(launch.command, status.code()));
        }
        Ok(())
    }
}

/// Runs concrete commands under a toolchain and measures them
pub struct Executor<L> {
    launcher: L,
}

impl<L: Launcher> Executor<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Execute one command, returning its duration in seconds when measured
    pub async fn execute(
        &self,
        command: &str,
        workdir: Option<&Path>,
        toolchain: &Toolchain,
        measure: bool,
    ) -> Result<Option<f64>> {
        debug!(command, workdir = ?workdir, %toolchain, "launching");
        let env = toolchain.env_change();
        let launch = Launch {
            command,
            workdir,
            env: &env,
        };

        let start = Instant::now();
        self.launcher.launch(&launch).await?;
        let elapsed = round_millis(start.elapsed().as_secs_f64());

        if measure {
            info!(command, duration = elapsed, "command finished in {:.3}s", elapsed);
            Ok(Some(elapsed))
        } else {
            Ok(None)
        }
    }
}
