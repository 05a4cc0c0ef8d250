//! create-shadcn-starter - Scaffold a Vite + Tailwind + shadcn/ui application

use clap::Parser;
use starter_core::tui::CreateArgs;
use starter_core::{PackageManager, ProductConfig, RequestError, ScaffoldError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// shadcn starter product configuration
#[derive(Clone)]
pub struct StarterConfig;

impl ProductConfig for StarterConfig {
    fn name(&self) -> &'static str {
        "create-shadcn-starter"
    }

    fn display_name(&self) -> &'static str {
        "shadcn/ui Starter"
    }

    fn template_dir_env(&self) -> &'static str {
        "CREATE_SHADCN_TEMPLATE_DIR"
    }

    fn bundled_template_dir(&self) -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/base"))
    }

    fn docs_url(&self) -> &'static str {
        "https://ui.shadcn.com/docs"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install create-shadcn-starter --force"
    }

    fn next_steps(&self, dir: &Path, package_manager: PackageManager) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push(package_manager.profile().run_script("dev"));
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-shadcn-starter")]
#[command(about = "Scaffold a new Vite + Tailwind + shadcn/ui application")]
#[command(version)]
pub struct Args {
    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Project name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Package manager to use (npm, pnpm, yarn, bun)
    #[arg(short, long = "package-manager")]
    pub package_manager: Option<String>,

    /// Features to enable (comma-separated, or `none`)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Write into a non-empty directory
    #[arg(long)]
    pub force: bool,

    /// Write project files but do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Do not try to install a missing package manager
    #[arg(long = "no-self-heal")]
    pub no_self_heal: bool,

    /// Local directory to use for the base template (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            name: args.name,
            package_manager: args.package_manager,
            features: args.features,
            yes: args.yes,
            force: args.force,
            skip_install: args.skip_install,
            no_self_heal: args.no_self_heal,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Name of the failure kind shown in the exit message
fn failure_kind(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<ScaffoldError>() {
        e.kind()
    } else if err.downcast_ref::<RequestError>().is_some() {
        "InvalidRequest"
    } else {
        "Error"
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = StarterConfig;
    tracing::debug!(product = config.name(), version = CLI_VERSION, "starting");

    let result = starter_core::run(&config, args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {:#}", failure_kind(&err), err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "create-shadcn-starter",
            "my-app",
            "-p",
            "pnpm",
            "-f",
            "router,darkMode",
            "--yes",
            "--skip-install",
        ])
        .unwrap();

        assert_eq!(args.directory, Some(PathBuf::from("my-app")));
        assert_eq!(args.package_manager.as_deref(), Some("pnpm"));
        assert_eq!(
            args.features,
            Some(vec!["router".to_string(), "darkMode".to_string()])
        );
        assert!(args.yes);
        assert!(args.skip_install);
        assert!(!args.force);
    }

    #[test]
    fn test_failure_kind() {
        let err = anyhow::Error::from(ScaffoldError::NonEmptyTargetRejected {
            path: PathBuf::from("/tmp/app"),
        });
        assert_eq!(failure_kind(&err), "NonEmptyTargetRejected");

        let err = anyhow::Error::from(RequestError::InvalidProjectName("a b".into()));
        assert_eq!(failure_kind(&err), "InvalidRequest");

        assert_eq!(failure_kind(&anyhow::anyhow!("prompt closed")), "Error");
    }

    #[test]
    fn test_next_steps_end_with_dev_script() {
        let steps = StarterConfig.next_steps(Path::new("/nowhere/app"), PackageManager::Pnpm);
        assert_eq!(steps.first().map(String::as_str), Some("cd /nowhere/app"));
        assert_eq!(steps.last().map(String::as_str), Some("pnpm dev"));
    }
}
