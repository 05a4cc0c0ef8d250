//! Locating the base template on disk

use crate::product::ProductConfig;
use std::fmt;
use std::path::{Path, PathBuf};

/// Template directory name looked up next to the installed executable
pub const INSTALLED_TEMPLATE_DIR: &str = "templates/base";

/// Where the base template comes from, in lookup order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// `--template-dir` on the command line
    Explicit(PathBuf),
    /// The product's template environment variable
    Env(PathBuf),
    /// `templates/base` next to the executable
    Installed(PathBuf),
    /// The template directory the binary was built from
    Bundled(PathBuf),
}

impl TemplateSource {
    pub fn resolve<C: ProductConfig>(config: &C, explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path);
        }

        if let Some(path) = std::env::var_os(config.template_dir_env()).filter(|v| !v.is_empty()) {
            return Self::Env(PathBuf::from(path));
        }

        let installed = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(INSTALLED_TEMPLATE_DIR)))
            .filter(|dir| dir.is_dir());
        if let Some(path) = installed {
            return Self::Installed(path);
        }

        Self::Bundled(config.bundled_template_dir())
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Env(p) | Self::Installed(p) | Self::Bundled(p) => p,
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self {
            Self::Explicit(_) => "--template-dir",
            Self::Env(_) => "environment",
            Self::Installed(_) => "installed",
            Self::Bundled(_) => "bundled",
        };
        write!(f, "{} ({})", self.path().display(), origin)
    }
}
