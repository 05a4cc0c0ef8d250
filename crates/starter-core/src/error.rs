//! Error types for the scaffolding engine

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the request itself. Always raised before anything touches the disk.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid project name '{0}': only letters, numbers, underscores and hyphens are allowed")]
    InvalidProjectName(String),

    #[error("Unknown feature '{name}'. Available features: {available}")]
    InvalidFeatureName { name: String, available: String },

    #[error("Unknown package manager '{0}'. Supported: npm, pnpm, yarn, bun")]
    UnknownPackageManager(String),

    #[error("Target path must be absolute: {}", .0.display())]
    RelativeTarget(PathBuf),

    #[error("Target path exists and is not a directory: {}", .0.display())]
    TargetNotADirectory(PathBuf),
}

/// Fatal scaffolding failures
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("Directory {} is not empty and overwriting was not confirmed", .path.display())]
    NonEmptyTargetRejected { path: PathBuf },

    #[error(
        "Failed to copy template file {}: {source}\n\
         The target directory may contain a partial project and need manual cleanup.",
        .path.display()
    )]
    TemplateCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template directory not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Failed to parse template descriptor {}: {source}", .path.display())]
    TemplateManifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{manager} is not available. {hint}")]
    PackageManagerUnavailable { manager: String, hint: String },

    #[error(
        "`{command}` failed with exit code {}.\n\
         The project files were kept; run `{command}` in {} to retry.",
        exit_code_label(.code),
        .dir.display()
    )]
    InstallFailed {
        command: String,
        dir: PathBuf,
        code: Option<i32>,
    },

    #[error(
        "`{command}` could not be started: {source}\n\
         The project files were kept; run `{command}` in {} once it is available.",
        .dir.display()
    )]
    InstallSpawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize package.json: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScaffoldError {
    /// Stable name of the failure kind, used in the process exit message
    pub fn kind(&self) -> &'static str {
        match self {
            ScaffoldError::InvalidRequest(_) => "InvalidRequest",
            ScaffoldError::NonEmptyTargetRejected { .. } => "NonEmptyTargetRejected",
            ScaffoldError::TemplateCopy { .. } | ScaffoldError::TemplateMissing(_) => {
                "TemplateCopyError"
            }
            ScaffoldError::TemplateManifest { .. } => "TemplateManifestError",
            ScaffoldError::PackageManagerUnavailable { .. } => "PackageManagerUnavailable",
            ScaffoldError::InstallFailed { .. } | ScaffoldError::InstallSpawn { .. } => {
                "InstallFailed"
            }
            ScaffoldError::Io { .. } | ScaffoldError::Serialize(_) => "WriteError",
        }
    }

    /// Whether the failure happened before anything was written to the target
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            ScaffoldError::InvalidRequest(_)
                | ScaffoldError::NonEmptyTargetRejected { .. }
                | ScaffoldError::TemplateMissing(_)
                | ScaffoldError::TemplateManifest { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "unknown (terminated by signal)".to_string())
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
