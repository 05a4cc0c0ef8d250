//! Named, idempotent text patches applied to files from the base template

use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::path::Path;

/// Inserts a line right after an anchor token, unless a marker says it is already there
#[derive(Debug, PartialEq, Eq)]
pub struct TemplatePatch {
    pub name: &'static str,
    /// Target file relative to the project root
    pub file: &'static str,
    /// Presence of this substring means the patch is already applied
    pub marker: &'static str,
    /// Insertion goes immediately after the first occurrence of this token
    pub anchor: &'static str,
    pub insertion: &'static str,
}

/// Registers the container queries plugin in the Tailwind config
pub static CONTAINER_QUERIES: TemplatePatch = TemplatePatch {
    name: "container-queries",
    file: "tailwind.config.js",
    marker: "@tailwindcss/container-queries",
    anchor: "plugins: [",
    insertion: "\n    require(\"@tailwindcss/container-queries\"),",
};

/// Why a patch was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyApplied,
    FileMissing,
    AnchorMissing,
    /// The target file is not valid UTF-8
    NotUtf8,
}

impl SkipReason {
    /// Whether the skip should be reported to the user
    pub fn is_warning(&self) -> bool {
        !matches!(self, SkipReason::AlreadyApplied)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyApplied => f.write_str("already applied"),
            SkipReason::FileMissing => f.write_str("file not found"),
            SkipReason::AnchorMissing => f.write_str("anchor not found, file has an unexpected shape"),
            SkipReason::NotUtf8 => f.write_str("file is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched,
    Skipped(SkipReason),
}

impl TemplatePatch {
    /// Pure form of the patch: the new content, or why nothing changed
    pub fn apply_to_str(&self, content: &str) -> Result<String, SkipReason> {
        if content.contains(self.marker) {
            return Err(SkipReason::AlreadyApplied);
        }
        let at = content
            .find(self.anchor)
            .ok_or(SkipReason::AnchorMissing)?
            + self.anchor.len();

        let mut patched = String::with_capacity(content.len() + self.insertion.len());
        patched.push_str(&content[..at]);
        patched.push_str(self.insertion);
        patched.push_str(&content[at..]);
        Ok(patched)
    }

    /// Patch the target file inside `project_dir`
    pub async fn apply(&self, project_dir: &Path) -> Result<PatchOutcome> {
        let path = project_dir.join(self.file);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PatchOutcome::Skipped(SkipReason::FileMissing));
            }
            Err(e) => return Err(ScaffoldError::io(&path, e)),
        };
        // Left untouched: a lossy rewrite would change bytes outside the insertion
        let Ok(content) = String::from_utf8(bytes) else {
            return Ok(PatchOutcome::Skipped(SkipReason::NotUtf8));
        };

        match self.apply_to_str(&content) {
            Ok(patched) => {
                tokio::fs::write(&path, patched)
                    .await
                    .map_err(|e| ScaffoldError::io(&path, e))?;
                tracing::debug!(patch = self.name, file = self.file, "patched");
                Ok(PatchOutcome::Patched)
            }
            Err(reason) => Ok(PatchOutcome::Skipped(reason)),
        }
    }
}
