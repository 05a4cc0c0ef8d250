//! Base template materialization

use super::manifest::DESCRIPTOR_FILE;
use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Config files every generated project is expected to have.
/// Some template variants legitimately omit one, so absence is only a warning.
pub const REQUIRED_CONFIG_FILES: &[&str] = &[
    "postcss.config.js",
    "tailwind.config.js",
    "vite.config.js",
    "index.html",
    "jsconfig.json",
];

/// What a materialization produced
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// Copied files, relative to the target directory, in walk order
    pub copied: Vec<PathBuf>,
    /// Entries of [`REQUIRED_CONFIG_FILES`] absent after the copy
    pub missing_config: Vec<&'static str>,
}

/// Recursively copy the template tree into `target_dir`, overwriting existing files.
///
/// Files copied before an error are left in place.
pub async fn materialize(template_root: &Path, target_dir: &Path) -> Result<MaterializeReport> {
    if !template_root.is_dir() {
        return Err(ScaffoldError::TemplateMissing(template_root.to_path_buf()));
    }

    let copy_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ScaffoldError::TemplateCopy { path, source }
    };

    fs::create_dir_all(target_dir)
        .await
        .map_err(copy_err(target_dir))?;

    let mut report = MaterializeReport::default();

    for entry in WalkDir::new(template_root)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(template_root).to_path_buf();
            ScaffoldError::TemplateCopy {
                path,
                source: e.into(),
            }
        })?;

        let rel_path = match entry.path().strip_prefix(template_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };
        if rel_path == Path::new(DESCRIPTOR_FILE) {
            continue;
        }

        let dest_path = target_dir.join(&rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .map_err(copy_err(&dest_path))?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).await.map_err(copy_err(parent))?;
        }

        fs::copy(entry.path(), &dest_path)
            .await
            .map_err(copy_err(entry.path()))?;
        tracing::debug!(file = %rel_path.display(), "copied");
        report.copied.push(rel_path);
    }

    for &file in REQUIRED_CONFIG_FILES {
        if !target_dir.join(file).is_file() {
            tracing::warn!(file, "could not find config file in template");
            report.missing_config.push(file);
        }
    }

    tracing::info!(
        files = report.copied.len(),
        target = %target_dir.display(),
        "materialized template"
    );
    Ok(report)
}
