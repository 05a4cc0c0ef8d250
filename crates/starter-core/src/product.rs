//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to give the scaffolder its identity,
//! template location, and post-setup instructions.

use crate::package_manager::PackageManager;
use std::path::{Path, PathBuf};

/// Configuration trait for the CLI product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable that overrides the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Template directory used when nothing else is configured
    fn bundled_template_dir(&self) -> PathBuf;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, package_manager: PackageManager) -> Vec<String>;
}
