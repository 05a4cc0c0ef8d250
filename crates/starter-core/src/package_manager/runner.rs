//! External process execution
//!
//! Everything the scaffolder spawns goes through [`CommandRunner`] so the
//! orchestrator can be driven by a fake in tests.

use super::profile::CommandLine;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// What to do with the child's stdio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pass output through to the user's terminal
    Inherit,
    /// Discard all output
    Suppress,
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command to completion and reports its exit status.
///
/// An `Err` means the process could not be spawned at all.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(
        &self,
        command: &CommandLine,
        cwd: Option<&Path>,
        output: OutputMode,
    ) -> io::Result<CommandStatus>;
}

/// Spawns real processes with tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        command: &CommandLine,
        cwd: Option<&Path>,
        output: OutputMode,
    ) -> io::Result<CommandStatus> {
        let mut cmd = TokioCommand::new(command.program);
        cmd.args(command.args);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        match output {
            OutputMode::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Suppress => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }

        tracing::debug!(command = %command, ?cwd, ?output, "spawning");
        let status = cmd.status().await?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}
