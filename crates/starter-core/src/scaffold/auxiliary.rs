//! Auxiliary files written after the manifest

use crate::error::{Result, ScaffoldError};
use crate::features::{AuxFragment, FeatureSet};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const GITIGNORE: AuxFragment = AuxFragment {
    path: ".gitignore",
    contents: "node_modules\n.DS_Store\ndist\n.env\n*.local\n.husky\n.eslintcache\n",
};

/// Empty directories every project gets
pub const SUPPORT_DIRS: &[&str] = &[
    "src/assets",
    "src/components/common",
    "src/components/layout",
    "src/hooks",
    "src/utils",
    "src/services",
    "src/constants",
    "src/types",
];

/// Write the shared files and directories, then each selected flag's fragments.
/// Returns the written files relative to `project_dir`.
pub async fn write_aux_files(project_dir: &Path, features: &FeatureSet) -> Result<Vec<PathBuf>> {
    let mut written = vec![write_fragment(project_dir, &GITIGNORE).await?];

    for dir in SUPPORT_DIRS {
        let path = project_dir.join(dir);
        fs::create_dir_all(&path)
            .await
            .map_err(|e| ScaffoldError::io(&path, e))?;
    }

    for flag in features.iter() {
        for fragment in flag.spec().fragments {
            written.push(write_fragment(project_dir, fragment).await?);
        }
    }

    Ok(written)
}

async fn write_fragment(project_dir: &Path, fragment: &AuxFragment) -> Result<PathBuf> {
    let rel = PathBuf::from(fragment.path);
    let path = project_dir.join(&rel);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::write(&path, fragment.contents)
        .await
        .map_err(|e| ScaffoldError::io(&path, e))?;

    tracing::debug!(file = fragment.path, "wrote");
    Ok(rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureFlag;

    #[tokio::test]
    async fn test_no_features_writes_only_shared_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_aux_files(dir.path(), &FeatureSet::none()).await.unwrap();

        assert_eq!(written, vec![PathBuf::from(".gitignore")]);
        let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.lines().any(|l| l == "node_modules"));
        assert!(gitignore.lines().any(|l| l == ".eslintcache"));
        for sub in SUPPORT_DIRS {
            assert!(dir.path().join(sub).is_dir(), "{sub} missing");
        }
    }

    #[tokio::test]
    async fn test_fragments_follow_flags() {
        let dir = tempfile::tempdir().unwrap();
        let features: FeatureSet = [FeatureFlag::Linting, FeatureFlag::Router].into_iter().collect();
        let written = write_aux_files(dir.path(), &features).await.unwrap();

        // router fragments come before linting fragments
        let router_pos = written
            .iter()
            .position(|p| p == Path::new("src/routes.jsx"))
            .unwrap();
        let lint_pos = written
            .iter()
            .position(|p| p == Path::new(".eslintrc.json"))
            .unwrap();
        assert!(router_pos < lint_pos);

        assert!(dir.path().join(".prettierrc").is_file());
        assert!(dir.path().join("src/pages/Dashboard.jsx").is_file());
        assert!(!dir.path().join("src/store/counter.js").exists());
    }

    #[tokio::test]
    async fn test_rewriting_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let features = FeatureSet::defaults();
        let first = write_aux_files(dir.path(), &features).await.unwrap();
        let second = write_aux_files(dir.path(), &features).await.unwrap();
        assert_eq!(first, second);
    }
}
