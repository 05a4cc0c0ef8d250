//! Template descriptor (`template.yaml` at the template root)

use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use std::path::Path;

/// Name of the descriptor file; it describes the template and is never copied
pub const DESCRIPTOR_FILE: &str = "template.yaml";

/// Optional metadata shipped alongside the base template
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Version of the template content itself
    #[serde(default)]
    pub version: Option<String>,

    /// Oldest CLI version able to scaffold this template correctly
    #[serde(default)]
    pub min_cli_version: Option<String>,
}

impl TemplateManifest {
    /// Read the descriptor if the template has one.
    /// A missing file is fine; a malformed one is an error.
    pub fn load(template_root: &Path) -> Result<Option<Self>> {
        let path = template_root.join(DESCRIPTOR_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ScaffoldError::io(&path, e)),
        };

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|source| ScaffoldError::TemplateManifest { path, source })
    }
}
