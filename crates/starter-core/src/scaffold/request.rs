//! The validated, immutable description of one scaffolding run

use crate::error::RequestError;
use crate::features::FeatureSet;
use crate::package_manager::PackageManager;
use std::path::{Path, PathBuf};

/// Everything the user chose. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    target: PathBuf,
    project_name: String,
    package_manager: PackageManager,
    features: FeatureSet,
}

/// Letters, digits, `_` and `-`; at least one character
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ProjectRequest {
    pub fn new(
        target: impl Into<PathBuf>,
        project_name: impl Into<String>,
        package_manager: PackageManager,
        features: FeatureSet,
    ) -> Result<Self, RequestError> {
        let request = Self {
            target: target.into(),
            project_name: project_name.into(),
            package_manager,
            features,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the request invariants
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.target.is_absolute() {
            return Err(RequestError::RelativeTarget(self.target.clone()));
        }
        if !is_valid_project_name(&self.project_name) {
            return Err(RequestError::InvalidProjectName(self.project_name.clone()));
        }
        Ok(())
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }
}
