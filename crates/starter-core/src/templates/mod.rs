//! Template resolution, copying, and patching
//!
//! This module provides:
//! - Template root lookup (flag, env var, installed, bundled)
//! - The optional `template.yaml` descriptor and CLI version check
//! - Recursive copy of the base template into the target
//! - Named, idempotent text patches over copied files

pub mod copier;
pub mod manifest;
pub mod patch;
pub mod source;
pub mod version;

pub use copier::{materialize, MaterializeReport, REQUIRED_CONFIG_FILES};
pub use manifest::TemplateManifest;
pub use patch::{PatchOutcome, SkipReason, TemplatePatch};
pub use source::TemplateSource;
pub use version::check_compatibility;
