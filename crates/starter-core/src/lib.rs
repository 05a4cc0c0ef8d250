//! Starter Core - feature-driven scaffolding for Vite + React + shadcn/ui projects
//!
//! Given a target directory, a project name, a package manager, and a set of
//! feature flags, the library copies a static base template, writes a
//! `package.json` synthesized from the selected features, applies a small set
//! of idempotent text patches, writes per-feature helper files, and finally
//! runs the package manager's install command.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - feature registry, manifest synthesis,
//!   template copying and patching, package manager profiles
//! - **Layer 2: Workflow Orchestration** - [`Scaffolder`] runs a validated
//!   [`ProjectRequest`] through its stages; [`ProductConfig`] supplies identity
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use starter_core::{FeatureSet, PackageManager, ProjectRequest, ScaffoldOptions, Scaffolder, SystemRunner};
//!
//! let request = ProjectRequest::new("/work/my-app", "my-app", PackageManager::Pnpm, FeatureSet::defaults())?;
//! let options = ScaffoldOptions::new("templates/base");
//! let outcome = Scaffolder::new(&request, &options, &SystemRunner).run().await?;
//! println!("{} dev", outcome.run_prefix);
//! ```

pub mod error;
pub mod features;
pub mod manifest;
pub mod package_manager;
pub mod product;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{RequestError, ScaffoldError};
pub use features::{FeatureFlag, FeatureSet};
pub use manifest::{synthesize, Manifest};
pub use package_manager::{CommandRunner, PackageManager, PackageManagerProfile, SystemRunner};
pub use product::ProductConfig;
pub use scaffold::{
    ProjectRequest, ScaffoldOptions, ScaffoldOutcome, ScaffoldWarning, Scaffolder, Stage,
    StageObserver,
};
pub use templates::{materialize, TemplatePatch, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
