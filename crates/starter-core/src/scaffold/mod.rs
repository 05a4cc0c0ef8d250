//! Scaffolding orchestrator
//!
//! Runs one [`ProjectRequest`] through a fixed sequence of stages:
//!
//! ```text
//! Validating -> Preparing -> Materializing -> ManifestWriting -> AuxWriting -> Installing -> Done
//!      \____________\______________\_______________\________________\____________\--> Failed
//! ```
//!
//! Each stage completes before the next begins. Nothing is rolled back: once
//! files have been written, a failure leaves them on disk and the error says
//! how to resume by hand.

pub mod auxiliary;
pub mod request;

use crate::error::{RequestError, Result, ScaffoldError};
use crate::manifest::{self, Manifest};
use crate::package_manager::{CommandRunner, PackageManagerTool, Readiness};
use crate::templates::{self, PatchOutcome, SkipReason, TemplateManifest};
use std::fmt;
use std::path::{Path, PathBuf};

pub use request::{is_valid_project_name, ProjectRequest};

/// Orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Preparing,
    Materializing,
    ManifestWriting,
    AuxWriting,
    Installing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Preparing => "preparing",
            Stage::Materializing => "materializing",
            Stage::ManifestWriting => "manifest-writing",
            Stage::AuxWriting => "aux-writing",
            Stage::Installing => "installing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receives stage transitions, e.g. to drive a spinner
pub trait StageObserver {
    fn entered(&mut self, stage: Stage);
}

impl<F: FnMut(Stage)> StageObserver for F {
    fn entered(&mut self, stage: Stage) {
        self(stage)
    }
}

/// Non-fatal problems collected during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldWarning {
    MissingConfigFile(&'static str),
    PatchSkipped {
        patch: &'static str,
        file: &'static str,
        reason: SkipReason,
    },
    TemplateNewerThanCli(String),
}

impl fmt::Display for ScaffoldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaffoldWarning::MissingConfigFile(file) => {
                write!(f, "Could not find {} in template", file)
            }
            ScaffoldWarning::PatchSkipped {
                patch,
                file,
                reason,
            } => write!(f, "Skipped {} patch for {}: {}", patch, file, reason),
            ScaffoldWarning::TemplateNewerThanCli(message) => f.write_str(message),
        }
    }
}

/// Run options that are not part of the user's project choices
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub template_root: PathBuf,
    /// Consent to write into a non-empty target directory
    pub proceed_if_not_empty: bool,
    pub skip_install: bool,
    /// Allow one fallback install of a missing package manager
    pub allow_self_heal: bool,
    /// Running CLI version, checked against the template descriptor
    pub cli_version: Option<String>,
    pub upgrade_command: String,
}

impl ScaffoldOptions {
    pub fn new(template_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            proceed_if_not_empty: false,
            skip_install: false,
            allow_self_heal: true,
            cli_version: None,
            upgrade_command: String::new(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub target: PathBuf,
    pub copied_files: Vec<PathBuf>,
    pub written_files: Vec<PathBuf>,
    pub manifest: Manifest,
    pub warnings: Vec<ScaffoldWarning>,
    pub installed: bool,
    pub self_healed: bool,
    pub run_prefix: &'static str,
}

/// Run-local mutable state, owned by one run and passed down by `&mut`
#[derive(Debug)]
struct WorkingState {
    stage: Stage,
    copied_files: Vec<PathBuf>,
    written_files: Vec<PathBuf>,
    manifest: Option<Manifest>,
    warnings: Vec<ScaffoldWarning>,
    installed: bool,
    self_healed: bool,
}

impl WorkingState {
    fn new() -> Self {
        Self {
            stage: Stage::Validating,
            copied_files: Vec::new(),
            written_files: Vec::new(),
            manifest: None,
            warnings: Vec::new(),
            installed: false,
            self_healed: false,
        }
    }

    fn warn(&mut self, warning: ScaffoldWarning) {
        tracing::warn!(stage = %self.stage, "{}", warning);
        self.warnings.push(warning);
    }
}

/// Sequences one scaffolding run
pub struct Scaffolder<'a, R: CommandRunner> {
    request: &'a ProjectRequest,
    options: &'a ScaffoldOptions,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Scaffolder<'a, R> {
    pub fn new(request: &'a ProjectRequest, options: &'a ScaffoldOptions, runner: &'a R) -> Self {
        Self {
            request,
            options,
            runner,
        }
    }

    pub async fn run(&self) -> Result<ScaffoldOutcome> {
        self.run_with(&mut |_: Stage| {}).await
    }

    /// Run every stage, reporting transitions to `observer`
    pub async fn run_with<O: StageObserver>(&self, observer: &mut O) -> Result<ScaffoldOutcome> {
        let mut state = WorkingState::new();
        observer.entered(Stage::Validating);

        match self.run_stages(&mut state, observer).await {
            Ok(()) => {
                self.enter(&mut state, observer, Stage::Done);
                Ok(self.finish(state))
            }
            Err(e) => {
                tracing::debug!(stage = %state.stage, kind = e.kind(), "scaffold failed");
                self.enter(&mut state, observer, Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages<O: StageObserver>(
        &self,
        state: &mut WorkingState,
        observer: &mut O,
    ) -> Result<()> {
        self.validate(state)?;

        self.enter(state, observer, Stage::Preparing);
        self.prepare().await?;

        self.enter(state, observer, Stage::Materializing);
        self.materialize(state).await?;

        self.enter(state, observer, Stage::ManifestWriting);
        self.write_manifest(state).await?;

        self.enter(state, observer, Stage::AuxWriting);
        state.written_files =
            auxiliary::write_aux_files(self.request.target(), self.request.features()).await?;

        if self.options.skip_install {
            tracing::info!("skipping dependency installation");
        } else {
            self.enter(state, observer, Stage::Installing);
            self.install(state).await?;
        }

        Ok(())
    }

    fn enter<O: StageObserver>(&self, state: &mut WorkingState, observer: &mut O, stage: Stage) {
        tracing::debug!(from = %state.stage, to = %stage, "stage");
        state.stage = stage;
        observer.entered(stage);
    }

    /// Read-only checks; nothing on disk changes here
    fn validate(&self, state: &mut WorkingState) -> Result<()> {
        self.request.validate()?;

        let root = &self.options.template_root;
        if !root.is_dir() {
            return Err(ScaffoldError::TemplateMissing(root.clone()));
        }

        let descriptor = TemplateManifest::load(root)?;
        let min_version = descriptor.and_then(|d| d.min_cli_version);
        if let (Some(cli), Some(min)) = (&self.options.cli_version, min_version) {
            if let Some(message) =
                templates::check_compatibility(cli, &min, &self.options.upgrade_command)
            {
                state.warn(ScaffoldWarning::TemplateNewerThanCli(message));
            }
        }
        Ok(())
    }

    /// Fails closed: a non-empty target without consent aborts before any write
    async fn prepare(&self) -> Result<()> {
        let target = self.request.target();

        if target.exists() {
            if !target.is_dir() {
                return Err(RequestError::TargetNotADirectory(target.to_path_buf()).into());
            }
            if !self.options.proceed_if_not_empty && !is_empty_dir(target)? {
                return Err(ScaffoldError::NonEmptyTargetRejected {
                    path: target.to_path_buf(),
                });
            }
            return Ok(());
        }

        tokio::fs::create_dir_all(target)
            .await
            .map_err(|e| ScaffoldError::io(target, e))
    }

    async fn materialize(&self, state: &mut WorkingState) -> Result<()> {
        let report =
            templates::materialize(&self.options.template_root, self.request.target()).await?;

        state.copied_files = report.copied;
        for file in report.missing_config {
            state.warn(ScaffoldWarning::MissingConfigFile(file));
        }
        Ok(())
    }

    /// Writes package.json, then applies patches. Patches always run after the base copy.
    async fn write_manifest(&self, state: &mut WorkingState) -> Result<()> {
        let request = self.request;
        let manifest = manifest::synthesize(
            request.project_name(),
            request.package_manager(),
            request.features(),
        );
        manifest.write_to(request.target()).await?;
        state.manifest = Some(manifest);

        for flag in request.features().iter() {
            for patch in flag.spec().patches {
                match patch.apply(request.target()).await? {
                    PatchOutcome::Patched => {}
                    PatchOutcome::Skipped(reason) if reason.is_warning() => {
                        state.warn(ScaffoldWarning::PatchSkipped {
                            patch: patch.name,
                            file: patch.file,
                            reason,
                        });
                    }
                    PatchOutcome::Skipped(reason) => {
                        tracing::debug!(patch = patch.name, %reason, "patch skipped");
                    }
                }
            }
        }
        Ok(())
    }

    async fn install(&self, state: &mut WorkingState) -> Result<()> {
        let tool = PackageManagerTool::new(self.request.package_manager().profile(), self.runner);

        let readiness = tool.ensure_available(self.options.allow_self_heal).await?;
        state.self_healed = readiness == Readiness::SelfHealed;

        tool.install(self.request.target()).await?;
        state.installed = true;
        Ok(())
    }

    fn finish(&self, state: WorkingState) -> ScaffoldOutcome {
        let request = self.request;
        ScaffoldOutcome {
            target: request.target().to_path_buf(),
            copied_files: state.copied_files,
            written_files: state.written_files,
            manifest: state.manifest.unwrap_or_else(|| {
                manifest::synthesize(
                    request.project_name(),
                    request.package_manager(),
                    request.features(),
                )
            }),
            warnings: state.warnings,
            installed: state.installed,
            self_healed: state.self_healed,
            run_prefix: request.package_manager().profile().run_prefix,
        }
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(path).map_err(|e| ScaffoldError::io(path, e))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureFlag, FeatureSet};
    use crate::package_manager::{CommandLine, CommandStatus, OutputMode, PackageManager};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// Records every command and answers with a per-command exit code (default 0)
    #[derive(Default)]
    struct RecordingRunner {
        codes: HashMap<String, Vec<i32>>,
        calls: RefCell<Vec<(String, Option<PathBuf>)>>,
    }

    impl RecordingRunner {
        fn answer(mut self, command: &str, codes: &[i32]) -> Self {
            self.codes.insert(command.to_string(), codes.to_vec());
            self
        }

        fn commands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        async fn run(
            &self,
            command: &CommandLine,
            cwd: Option<&Path>,
            _output: OutputMode,
        ) -> io::Result<CommandStatus> {
            let line = command.to_string();
            let nth = self.calls.borrow().iter().filter(|(c, _)| *c == line).count();
            self.calls
                .borrow_mut()
                .push((line.clone(), cwd.map(Path::to_path_buf)));

            let code = self
                .codes
                .get(&line)
                .and_then(|codes| codes.get(nth).or(codes.last()))
                .copied()
                .unwrap_or(0);
            Ok(CommandStatus::from_code(code))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        template: PathBuf,
        target: PathBuf,
    }

    fn fixture(with_tailwind: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template");
        std::fs::create_dir_all(template.join("src")).unwrap();
        std::fs::write(template.join("index.html"), "<div id=\"root\"></div>\n").unwrap();
        std::fs::write(template.join("vite.config.js"), "export default {};\n").unwrap();
        std::fs::write(template.join("postcss.config.js"), "export default {};\n").unwrap();
        std::fs::write(template.join("jsconfig.json"), "{}\n").unwrap();
        std::fs::write(template.join("src/App.jsx"), "export default () => null;\n").unwrap();
        if with_tailwind {
            std::fs::write(
                template.join("tailwind.config.js"),
                "module.exports = {\n  plugins: [\n    require(\"tailwindcss-animate\"),\n  ],\n};\n",
            )
            .unwrap();
        }
        let target = dir.path().join("app");
        Fixture {
            _dir: dir,
            template,
            target,
        }
    }

    fn request(target: &Path, pm: PackageManager, features: FeatureSet) -> ProjectRequest {
        ProjectRequest::new(target, "app", pm, features).unwrap()
    }

    async fn run_recording(
        request: &ProjectRequest,
        options: &ScaffoldOptions,
        runner: &RecordingRunner,
    ) -> (Result<ScaffoldOutcome>, Vec<Stage>) {
        let mut stages = Vec::new();
        let result = Scaffolder::new(request, options, runner)
            .run_with(&mut |stage: Stage| stages.push(stage))
            .await;
        (result, stages)
    }

    #[tokio::test]
    async fn test_full_run_stage_sequence() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Pnpm, FeatureSet::defaults());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default();

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let outcome = result.unwrap();

        assert_eq!(
            stages,
            vec![
                Stage::Validating,
                Stage::Preparing,
                Stage::Materializing,
                Stage::ManifestWriting,
                Stage::AuxWriting,
                Stage::Installing,
                Stage::Done,
            ]
        );
        assert!(outcome.installed);
        assert!(!outcome.self_healed);
        assert_eq!(outcome.run_prefix, "pnpm");
        assert!(outcome.warnings.is_empty());
        assert!(fx.target.join("package.json").is_file());
        assert!(fx.target.join("src/routes.jsx").is_file());
    }

    #[tokio::test]
    async fn test_pnpm_install_command_and_cwd() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Pnpm, FeatureSet::none());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default();

        let (result, _) = run_recording(&request, &options, &runner).await;
        result.unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(
            runner.commands(),
            vec!["pnpm --version".to_string(), "pnpm install".to_string()]
        );
        assert_eq!(calls[1].1.as_deref(), Some(fx.target.as_path()));
    }

    #[tokio::test]
    async fn test_non_empty_target_rejected_without_writes() {
        let fx = fixture(true);
        std::fs::create_dir_all(&fx.target).unwrap();
        std::fs::write(fx.target.join("notes.txt"), "keep me").unwrap();

        let request = request(&fx.target, PackageManager::Npm, FeatureSet::defaults());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default();

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let err = result.unwrap_err();

        assert!(matches!(err, ScaffoldError::NonEmptyTargetRejected { .. }));
        assert!(err.is_pre_mutation());
        assert_eq!(
            stages,
            vec![Stage::Validating, Stage::Preparing, Stage::Failed]
        );
        let entries: Vec<_> = std::fs::read_dir(&fx.target).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_non_empty_target_accepted_with_consent() {
        let fx = fixture(true);
        std::fs::create_dir_all(&fx.target).unwrap();
        std::fs::write(fx.target.join("notes.txt"), "keep me").unwrap();

        let request = request(&fx.target, PackageManager::Npm, FeatureSet::none());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.proceed_if_not_empty = true;
        options.skip_install = true;

        let outcome = Scaffolder::new(&request, &options, &RecordingRunner::default())
            .run()
            .await
            .unwrap();
        assert!(!outcome.installed);
        assert!(fx.target.join("notes.txt").is_file());
        assert!(fx.target.join("package.json").is_file());
    }

    #[tokio::test]
    async fn test_missing_tailwind_config_warns_and_finishes() {
        let fx = fixture(false);
        let features: FeatureSet = [FeatureFlag::ContainerQueries].into_iter().collect();
        let request = request(&fx.target, PackageManager::Npm, features);
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default();

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let outcome = result.unwrap();

        assert_eq!(stages.last(), Some(&Stage::Done));
        assert!(outcome
            .warnings
            .contains(&ScaffoldWarning::MissingConfigFile("tailwind.config.js")));
        assert!(outcome.warnings.contains(&ScaffoldWarning::PatchSkipped {
            patch: templates::patch::CONTAINER_QUERIES.name,
            file: "tailwind.config.js",
            reason: SkipReason::FileMissing,
        }));
        assert!(outcome
            .manifest
            .dev_dependencies
            .contains_key("@tailwindcss/container-queries"));
    }

    #[tokio::test]
    async fn test_container_queries_patch_applied() {
        let fx = fixture(true);
        let features: FeatureSet = [FeatureFlag::ContainerQueries].into_iter().collect();
        let request = request(&fx.target, PackageManager::Npm, features);
        let mut options = ScaffoldOptions::new(&fx.template);
        options.skip_install = true;

        let outcome = Scaffolder::new(&request, &options, &RecordingRunner::default())
            .run()
            .await
            .unwrap();
        assert!(outcome.warnings.is_empty());

        let config = std::fs::read_to_string(fx.target.join("tailwind.config.js")).unwrap();
        assert_eq!(config.matches("@tailwindcss/container-queries").count(), 1);
        // Template source stays untouched
        let original = std::fs::read_to_string(fx.template.join("tailwind.config.js")).unwrap();
        assert!(!original.contains("container-queries"));
    }

    #[tokio::test]
    async fn test_install_failure_keeps_files() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Npm, FeatureSet::defaults());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default().answer("npm install", &[1]);

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let err = result.unwrap_err();

        match &err {
            ScaffoldError::InstallFailed { command, dir, code } => {
                assert_eq!(command, "npm install");
                assert_eq!(dir, &fx.target);
                assert_eq!(*code, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(&stages[stages.len() - 2..], &[Stage::Installing, Stage::Failed]);

        let written = std::fs::read_to_string(fx.target.join("package.json")).unwrap();
        let expected = manifest::synthesize("app", PackageManager::Npm, &FeatureSet::defaults());
        assert_eq!(written, expected.to_json().unwrap());
        assert!(fx.target.join("index.html").is_file());
    }

    #[tokio::test]
    async fn test_skip_install_never_enters_installing() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Yarn, FeatureSet::defaults());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.skip_install = true;
        let runner = RecordingRunner::default();

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let outcome = result.unwrap();

        assert!(!stages.contains(&Stage::Installing));
        assert_eq!(stages.last(), Some(&Stage::Done));
        assert!(!outcome.installed);
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_manager_without_self_heal() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Bun, FeatureSet::none());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.allow_self_heal = false;
        let runner = RecordingRunner::default().answer("bun --version", &[127]);

        let (result, _) = run_recording(&request, &options, &runner).await;
        let err = result.unwrap_err();

        assert!(matches!(err, ScaffoldError::PackageManagerUnavailable { .. }));
        assert_eq!(runner.commands(), vec!["bun --version".to_string()]);
        assert!(fx.target.join("package.json").is_file());
    }

    #[tokio::test]
    async fn test_bun_self_heal() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Bun, FeatureSet::none());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default().answer("bun --version", &[127, 0]);

        let (result, _) = run_recording(&request, &options, &runner).await;
        let outcome = result.unwrap();

        assert!(outcome.self_healed);
        assert!(outcome.installed);
        assert_eq!(
            runner.commands(),
            vec![
                "bun --version".to_string(),
                "npm install -g bun".to_string(),
                "bun --version".to_string(),
                "bun install".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_template_root_fails_before_mutation() {
        let fx = fixture(true);
        let request = request(&fx.target, PackageManager::Npm, FeatureSet::none());
        let options = ScaffoldOptions::new(fx.template.join("nope"));

        let (result, stages) = run_recording(&request, &options, &RecordingRunner::default()).await;
        let err = result.unwrap_err();

        assert!(matches!(err, ScaffoldError::TemplateMissing(_)));
        assert_eq!(stages, vec![Stage::Validating, Stage::Failed]);
        assert!(!fx.target.exists());
    }

    fn container_queries() -> FeatureSet {
        [FeatureFlag::ContainerQueries].into_iter().collect()
    }

    #[tokio::test]
    async fn test_non_utf8_tailwind_config_is_skipped_with_warning() {
        let fx = fixture(false);
        let bytes = b"module.exports = {\n  plugins: [\n  ],\n}; // caf\xe9\n".to_vec();
        std::fs::write(fx.template.join("tailwind.config.js"), &bytes).unwrap();

        let request = request(&fx.target, PackageManager::Npm, container_queries());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.skip_install = true;

        let (result, stages) = run_recording(&request, &options, &RecordingRunner::default()).await;
        let outcome = result.unwrap();

        assert_eq!(stages.last(), Some(&Stage::Done));
        assert_eq!(
            outcome.warnings,
            vec![ScaffoldWarning::PatchSkipped {
                patch: templates::patch::CONTAINER_QUERIES.name,
                file: "tailwind.config.js",
                reason: SkipReason::NotUtf8,
            }]
        );
        assert_eq!(
            std::fs::read(fx.target.join("tailwind.config.js")).unwrap(),
            bytes
        );
    }

    #[tokio::test]
    async fn test_unexpected_tailwind_shape_is_reported() {
        let fx = fixture(false);
        std::fs::write(
            fx.template.join("tailwind.config.js"),
            "export default { plugins }\n",
        )
        .unwrap();

        let request = request(&fx.target, PackageManager::Npm, container_queries());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.skip_install = true;

        let outcome = Scaffolder::new(&request, &options, &RecordingRunner::default())
            .run()
            .await
            .unwrap();

        assert_eq!(
            outcome.warnings,
            vec![ScaffoldWarning::PatchSkipped {
                patch: templates::patch::CONTAINER_QUERIES.name,
                file: "tailwind.config.js",
                reason: SkipReason::AnchorMissing,
            }]
        );
        let config = std::fs::read_to_string(fx.target.join("tailwind.config.js")).unwrap();
        assert_eq!(config, "export default { plugins }\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_template_copy_error_leaves_partial_tree() {
        let fx = fixture(true);
        // Sorts after every other entry, so the copy fails last
        std::os::unix::fs::symlink(
            fx.template.join("does-not-exist"),
            fx.template.join("zz-dangling"),
        )
        .unwrap();

        let request = request(&fx.target, PackageManager::Npm, FeatureSet::defaults());
        let options = ScaffoldOptions::new(&fx.template);
        let runner = RecordingRunner::default();

        let (result, stages) = run_recording(&request, &options, &runner).await;
        let err = result.unwrap_err();

        assert_eq!(err.kind(), "TemplateCopyError");
        assert!(matches!(err, ScaffoldError::TemplateCopy { .. }));
        assert!(err.to_string().contains("manual cleanup"));
        assert_eq!(&stages[stages.len() - 2..], &[Stage::Materializing, Stage::Failed]);

        for file in ["index.html", "jsconfig.json", "vite.config.js", "src/App.jsx"] {
            assert!(fx.target.join(file).is_file(), "{file} should be kept");
        }
        assert!(!fx.target.join("package.json").exists());
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_newer_template_warns() {
        let fx = fixture(true);
        std::fs::write(
            fx.template.join(templates::manifest::DESCRIPTOR_FILE),
            "name: base\nmin_cli_version: 9.0.0\n",
        )
        .unwrap();
        let request = request(&fx.target, PackageManager::Npm, FeatureSet::none());
        let mut options = ScaffoldOptions::new(&fx.template);
        options.skip_install = true;
        options.cli_version = Some("0.2.0".to_string());

        let outcome = Scaffolder::new(&request, &options, &RecordingRunner::default())
            .run()
            .await
            .unwrap();

        assert!(matches!(
            outcome.warnings.as_slice(),
            [ScaffoldWarning::TemplateNewerThanCli(_)]
        ));
        assert!(!fx.target.join("template.yaml").exists());
    }

    #[test]
    fn test_warning_display() {
        let warning = ScaffoldWarning::PatchSkipped {
            patch: "container-queries",
            file: "tailwind.config.js",
            reason: SkipReason::AnchorMissing,
        };
        let text = warning.to_string();
        assert!(text.contains("container-queries"));
        assert!(text.contains("tailwind.config.js"));
        assert!(text.contains("anchor not found"));

        assert_eq!(
            ScaffoldWarning::MissingConfigFile("vite.config.js").to_string(),
            "Could not find vite.config.js in template"
        );
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |stage: Stage| seen.push(stage);
            observer.entered(Stage::Preparing);
            observer.entered(Stage::Done);
        }
        assert_eq!(seen, vec![Stage::Preparing, Stage::Done]);
    }

    #[test]
    fn test_options_defaults() {
        let options = ScaffoldOptions::new("/templates/base");
        assert!(!options.proceed_if_not_empty);
        assert!(!options.skip_install);
        assert!(options.allow_self_heal);
    }

    #[test]
    fn test_empty_dir_check() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_empty_dir(dir.path()).unwrap());
        std::fs::write(dir.path().join("README.md"), "x").unwrap();
        assert!(!is_empty_dir(dir.path()).unwrap());
    }
}
