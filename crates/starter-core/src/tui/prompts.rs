//! Charm-style CLI prompts using cliclack

use crate::features::{FeatureFlag, FeatureSet};
use crate::package_manager::{PackageManager, SystemRunner};
use crate::product::ProductConfig;
use crate::scaffold::{
    is_valid_project_name, ProjectRequest, ScaffoldOptions, ScaffoldOutcome, Scaffolder, Stage,
    StageObserver,
};
use crate::templates::TemplateSource;
use anyhow::Result;
use cliclack::ProgressBar;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for the base template
    pub template_dir: Option<PathBuf>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Project name (defaults to the directory name)
    pub name: Option<String>,

    /// Package manager id
    pub package_manager: Option<String>,

    /// Features to enable; `none` for an explicitly empty selection
    pub features: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    /// Write into a non-empty directory without asking
    pub force: bool,

    /// Stop after writing files
    pub skip_install: bool,

    /// Fail instead of trying to install a missing package manager
    pub no_self_heal: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Locate the template
    let source = TemplateSource::resolve(config, args.template_dir.clone());
    cliclack::log::info(format!("Using template from {}", source))?;

    // Step 2: Select directory and get consent for a non-empty one
    let project_dir = select_directory(&args)?;
    let proceed_if_not_empty = confirm_non_empty(&project_dir, &args)?;

    // Step 3: Project details
    let project_name = select_project_name(&project_dir, &args)?;
    let package_manager = select_package_manager(&args)?;
    let features = select_features(&args)?;

    let request = ProjectRequest::new(&project_dir, project_name, package_manager, features)?;

    let options = ScaffoldOptions {
        template_root: source.path().to_path_buf(),
        proceed_if_not_empty,
        skip_install: args.skip_install,
        allow_self_heal: !args.no_self_heal,
        cli_version: Some(cli_version.to_string()),
        upgrade_command: config.upgrade_command().to_string(),
    };

    // Step 4: Create project
    let mut progress = Progress::new(package_manager);
    let result = Scaffolder::new(&request, &options, &SystemRunner)
        .run_with(&mut progress)
        .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            progress.fail(&e.to_string());
            return Err(e.into());
        }
    };

    for warning in &outcome.warnings {
        cliclack::log::warning(warning.to_string())?;
    }
    if outcome.self_healed {
        cliclack::log::success(format!("{} installed successfully", package_manager))?;
    }

    // Step 5: Show next steps
    print_next_steps(config, &outcome, package_manager)?;

    Ok(())
}

/// Drives a spinner from orchestrator stage transitions
struct Progress {
    spinner: ProgressBar,
    active: bool,
    package_manager: PackageManager,
}

impl Progress {
    fn new(package_manager: PackageManager) -> Self {
        Self {
            spinner: cliclack::spinner(),
            active: false,
            package_manager,
        }
    }

    fn stop(&mut self, message: &str) {
        if self.active {
            self.spinner.stop(message);
            self.active = false;
        }
    }

    fn fail(&mut self, message: &str) {
        if self.active {
            self.spinner.error(message);
            self.active = false;
        } else {
            let _ = cliclack::log::error(message);
        }
    }
}

impl StageObserver for Progress {
    fn entered(&mut self, stage: Stage) {
        match stage {
            Stage::Preparing => {
                self.spinner.start("Creating your project...");
                self.active = true;
            }
            Stage::Installing => {
                // Install output streams straight to the terminal
                self.stop("Project files created");
                let _ = cliclack::log::step(format!(
                    "Installing dependencies with {}...",
                    self.package_manager
                ));
            }
            Stage::Done => self.stop("Project created successfully!"),
            _ => {}
        }
    }
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;

    let input = match &args.directory {
        Some(dir) => dir.clone(),
        None if args.yes => PathBuf::from("."),
        None => {
            let input: String = cliclack::input("Where would you like to create your project?")
                .placeholder(".")
                .default_input(".")
                .interact()?;
            PathBuf::from(input)
        }
    };

    let path = if input.as_os_str().is_empty() || input == Path::new(".") {
        current_dir
    } else if input.is_absolute() {
        input
    } else {
        current_dir.join(input)
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    cliclack::log::info(format!("Using directory: {}", path.display()))?;
    Ok(path)
}

/// Returns the proceed flag handed to the orchestrator
fn confirm_non_empty(path: &Path, args: &CreateArgs) -> Result<bool> {
    if !path.is_dir() {
        return Ok(true);
    }

    let count = std::fs::read_dir(path)?.count();
    if count == 0 {
        return Ok(true);
    }

    cliclack::log::warning(format!("Directory has {} existing items", count))?;

    if args.force {
        return Ok(true);
    }
    if args.yes {
        // Non-interactive runs never overwrite without --force
        return Ok(false);
    }

    let confirm = cliclack::confirm("Directory not empty. Continue anyway?")
        .initial_value(false)
        .interact()?;
    Ok(confirm)
}

fn select_project_name(project_dir: &Path, args: &CreateArgs) -> Result<String> {
    let default_name = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(name) = &args.name {
        return Ok(name.clone());
    }
    if args.yes {
        return Ok(default_name);
    }

    let mut input = cliclack::input("What is your project named?").validate(|name: &String| {
        if is_valid_project_name(name) {
            Ok(())
        } else {
            Err("Project name may only include letters, numbers, underscores and hyphens")
        }
    });
    if is_valid_project_name(&default_name) {
        input = input.default_input(&default_name).placeholder(&default_name);
    }

    let name: String = input.interact()?;
    Ok(name)
}

fn select_package_manager(args: &CreateArgs) -> Result<PackageManager> {
    if let Some(id) = &args.package_manager {
        return Ok(id.parse()?);
    }

    let detected = PackageManager::detect();
    if args.yes {
        cliclack::log::info(format!("Package manager: {}", detected))?;
        return Ok(detected);
    }

    let mut select = cliclack::select("Which package manager do you want to use?");
    for pm in PackageManager::ALL {
        select = select.item(pm, pm.id(), "");
    }

    let selected: PackageManager = select.initial_value(detected).interact()?;
    Ok(selected)
}

fn select_features(args: &CreateArgs) -> Result<FeatureSet> {
    if let Some(raw) = &args.features {
        let features = if raw.len() == 1 && raw[0].eq_ignore_ascii_case("none") {
            FeatureSet::none()
        } else {
            FeatureSet::validate(raw)?
        };
        cliclack::log::info(format!("Features: {}", features))?;
        return Ok(features);
    }

    if args.yes {
        let features = FeatureSet::defaults();
        cliclack::log::info(format!("Features: {}", features))?;
        return Ok(features);
    }

    let mut multi = cliclack::multiselect("Select additional features:");
    for flag in FeatureFlag::ALL {
        multi = multi.item(flag, flag.display_name(), "");
    }

    let defaults: Vec<FeatureFlag> = FeatureSet::defaults().iter().collect();
    let selected: Vec<FeatureFlag> = multi
        .initial_values(defaults)
        .required(false)
        .interact()?;

    Ok(selected.into_iter().collect())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    outcome: &ScaffoldOutcome,
    package_manager: PackageManager,
) -> Result<()> {
    let mut steps = config.next_steps(&outcome.target, package_manager);
    if !outcome.installed {
        let cd_steps = steps.iter().take_while(|s| s.starts_with("cd ")).count();
        steps.insert(cd_steps, package_manager.profile().install.to_string());
    }

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }

    println!();
    cliclack::outro(format!("Docs: {}", config.docs_url().cyan()))?;

    Ok(())
}
