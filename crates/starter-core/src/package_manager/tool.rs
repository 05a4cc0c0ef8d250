//! Availability checks, self-heal, and dependency installation for one package manager

use super::profile::{CommandLine, PackageManagerProfile};
use super::runner::{CommandRunner, OutputMode};
use crate::error::{Result, ScaffoldError};
use colored::Colorize;
use std::path::Path;

/// Result of a version probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

/// How the manager became usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The binary was already on PATH
    AlreadyInstalled,
    /// The binary was installed with the fallback installer during this run
    SelfHealed,
}

/// Drives one package manager through a [`CommandRunner`]
pub struct PackageManagerTool<'a, R: CommandRunner> {
    profile: &'static PackageManagerProfile,
    runner: &'a R,
}

impl<'a, R: CommandRunner> PackageManagerTool<'a, R> {
    pub fn new(profile: &'static PackageManagerProfile, runner: &'a R) -> Self {
        Self { profile, runner }
    }

    /// Run the version probe with output suppressed.
    /// Spawn failures and non-zero exits both count as unavailable.
    pub async fn probe(&self) -> Availability {
        match self
            .runner
            .run(&self.profile.probe, None, OutputMode::Suppress)
            .await
        {
            Ok(status) if status.success() => Availability::Available,
            Ok(status) => {
                tracing::debug!(manager = %self.profile.id, code = ?status.code, "probe failed");
                Availability::Unavailable
            }
            Err(e) => {
                tracing::debug!(manager = %self.profile.id, error = %e, "probe could not spawn");
                Availability::Unavailable
            }
        }
    }

    /// Make sure the manager can be used, attempting the fallback installer once
    /// when `allow_self_heal` is set and the profile has one.
    pub async fn ensure_available(&self, allow_self_heal: bool) -> Result<Readiness> {
        if self.probe().await == Availability::Available {
            return Ok(Readiness::AlreadyInstalled);
        }

        let manager = self.profile.id.to_string();

        let installer = match (allow_self_heal, self.profile.fallback_installer) {
            (true, Some(installer)) => installer,
            _ => {
                return Err(ScaffoldError::PackageManagerUnavailable {
                    hint: format!("Please install it first: {}", self.profile.docs_url),
                    manager,
                });
            }
        };

        tracing::warn!(manager = %manager, installer = %installer, "not detected, attempting install");
        self.run_fallback(&installer).await?;

        if self.probe().await == Availability::Available {
            tracing::info!(manager = %manager, "installed successfully");
            Ok(Readiness::SelfHealed)
        } else {
            Err(ScaffoldError::PackageManagerUnavailable {
                hint: format!(
                    "`{}` finished but {} is still not on PATH. Please install it manually: {}",
                    installer, manager, self.profile.docs_url
                ),
                manager,
            })
        }
    }

    async fn run_fallback(&self, installer: &CommandLine) -> Result<()> {
        println!();
        println!("{} {}", "Running:".dimmed(), installer.to_string().yellow());
        println!();

        let failed = |detail: String| ScaffoldError::PackageManagerUnavailable {
            manager: self.profile.id.to_string(),
            hint: format!(
                "Automatic install via `{}` {}. Please install it manually: {}",
                installer, detail, self.profile.docs_url
            ),
        };

        match self.runner.run(installer, None, OutputMode::Inherit).await {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(failed(format!(
                "exited with code {}",
                status.code.unwrap_or(-1)
            ))),
            Err(e) => Err(failed(format!("could not start ({})", e))),
        }
    }

    /// Install the project's dependencies, streaming output to the terminal
    pub async fn install(&self, project_dir: &Path) -> Result<()> {
        let command = &self.profile.install;
        tracing::info!(command = %command, dir = %project_dir.display(), "installing dependencies");

        let failed = |code: Option<i32>| ScaffoldError::InstallFailed {
            command: command.to_string(),
            dir: project_dir.to_path_buf(),
            code,
        };

        match self
            .runner
            .run(command, Some(project_dir), OutputMode::Inherit)
            .await
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(failed(status.code)),
            Err(source) => {
                tracing::debug!(error = %source, "install could not spawn");
                Err(ScaffoldError::InstallSpawn {
                    command: command.to_string(),
                    dir: project_dir.to_path_buf(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::profile::PackageManager;
    use crate::package_manager::runner::CommandStatus;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;

    /// Replays scripted results and records every command it was asked to run
    struct ScriptedRunner {
        results: RefCell<VecDeque<io::Result<CommandStatus>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(results: Vec<io::Result<CommandStatus>>) -> Self {
            Self {
                results: RefCell::new(results.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            command: &CommandLine,
            _cwd: Option<&Path>,
            _output: OutputMode,
        ) -> io::Result<CommandStatus> {
            self.calls.borrow_mut().push(command.to_string());
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(CommandStatus::from_code(0)))
        }
    }

    fn spawn_error() -> io::Result<CommandStatus> {
        Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
    }

    #[tokio::test]
    async fn test_probe_available() {
        let runner = ScriptedRunner::new(vec![Ok(CommandStatus::from_code(0))]);
        let tool = PackageManagerTool::new(PackageManager::Pnpm.profile(), &runner);
        assert_eq!(tool.probe().await, Availability::Available);
        assert_eq!(runner.calls(), vec!["pnpm --version"]);
    }

    #[tokio::test]
    async fn test_probe_nonzero_and_spawn_failure_are_unavailable() {
        let runner = ScriptedRunner::new(vec![Ok(CommandStatus::from_code(127)), spawn_error()]);
        let tool = PackageManagerTool::new(PackageManager::Yarn.profile(), &runner);
        assert_eq!(tool.probe().await, Availability::Unavailable);
        assert_eq!(tool.probe().await, Availability::Unavailable);
    }

    #[tokio::test]
    async fn test_missing_npm_fails_without_self_heal() {
        let runner = ScriptedRunner::new(vec![spawn_error()]);
        let tool = PackageManagerTool::new(PackageManager::Npm.profile(), &runner);
        let err = tool.ensure_available(true).await.unwrap_err();
        assert_eq!(err.kind(), "PackageManagerUnavailable");
        assert_eq!(runner.calls(), vec!["npm --version"]);
    }

    #[tokio::test]
    async fn test_bun_self_heal_succeeds() {
        let runner = ScriptedRunner::new(vec![
            spawn_error(),
            Ok(CommandStatus::from_code(0)),
            Ok(CommandStatus::from_code(0)),
        ]);
        let tool = PackageManagerTool::new(PackageManager::Bun.profile(), &runner);
        let readiness = tool.ensure_available(true).await.unwrap();
        assert_eq!(readiness, Readiness::SelfHealed);
        assert_eq!(
            runner.calls(),
            vec!["bun --version", "npm install -g bun", "bun --version"]
        );
    }

    #[tokio::test]
    async fn test_bun_self_heal_attempted_once() {
        let runner = ScriptedRunner::new(vec![spawn_error(), Ok(CommandStatus::from_code(1))]);
        let tool = PackageManagerTool::new(PackageManager::Bun.profile(), &runner);
        let err = tool.ensure_available(true).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::PackageManagerUnavailable { .. }));
        assert_eq!(runner.calls(), vec!["bun --version", "npm install -g bun"]);
    }

    #[tokio::test]
    async fn test_bun_without_self_heal_fails_fast() {
        let runner = ScriptedRunner::new(vec![spawn_error()]);
        let tool = PackageManagerTool::new(PackageManager::Bun.profile(), &runner);
        assert!(tool.ensure_available(false).await.is_err());
        assert_eq!(runner.calls(), vec!["bun --version"]);
    }

    #[tokio::test]
    async fn test_install_reports_exit_code() {
        let runner = ScriptedRunner::new(vec![Ok(CommandStatus::from_code(2))]);
        let tool = PackageManagerTool::new(PackageManager::Pnpm.profile(), &runner);
        let err = tool.install(Path::new("/tmp/app")).await.unwrap_err();
        match err {
            ScaffoldError::InstallFailed { command, code, .. } => {
                assert_eq!(command, "pnpm install");
                assert_eq!(code, Some(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_spawn_failure_keeps_cause() {
        let runner = ScriptedRunner::new(vec![spawn_error()]);
        let tool = PackageManagerTool::new(PackageManager::Bun.profile(), &runner);
        let err = tool.install(Path::new("/tmp/app")).await.unwrap_err();
        match &err {
            ScaffoldError::InstallSpawn { command, source, .. } => {
                assert_eq!(command, "bun install");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("could not be started"));
        assert_eq!(err.kind(), "InstallFailed");
    }
}
