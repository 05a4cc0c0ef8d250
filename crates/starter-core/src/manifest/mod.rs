//! package.json synthesis
//!
//! The manifest starts from a fixed base and each selected feature folds its
//! registered [`ManifestEdit`]s into it, in feature declaration order. Edits
//! only insert or overwrite, so every base key survives unless a feature
//! deliberately replaces its value.

use crate::features::FeatureSet;
use crate::package_manager::PackageManager;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// File name of the manifest at the project root
pub const MANIFEST_FILE: &str = "package.json";

/// A single additive edit contributed by a feature
#[derive(Debug, Clone, Copy)]
pub enum ManifestEdit {
    Dependency(&'static str, &'static str),
    DevDependency(&'static str, &'static str),
    /// Overwrites a base script of the same name
    Script(&'static str, &'static str),
    /// Top-level tool section such as `lint-staged`
    Section(&'static str, fn() -> Value),
}

/// The generated project's package.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub private: bool,
    pub version: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub scripts: IndexMap<String, String>,
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
    /// Tool-specific top-level sections, serialized after the dependency maps
    #[serde(flatten)]
    pub sections: IndexMap<String, Value>,
}

const BASE_SCRIPTS: &[(&str, &str)] = &[
    ("dev", "vite"),
    ("build", "vite build"),
    (
        "lint",
        "eslint src --ext js,jsx --report-unused-disable-directives --max-warnings 0",
    ),
    ("preview", "vite preview"),
];

const BASE_DEPENDENCIES: &[(&str, &str)] = &[
    ("react", "^18.2.0"),
    ("react-dom", "^18.2.0"),
    ("@radix-ui/react-slot", "^1.0.2"),
    ("@radix-ui/react-dialog", "^1.0.5"),
    ("@radix-ui/react-dropdown-menu", "^2.0.6"),
    ("@radix-ui/react-navigation-menu", "^1.2.3"),
    ("@radix-ui/react-label", "^2.0.2"),
    ("@radix-ui/react-select", "^2.0.0"),
    ("@radix-ui/react-toast", "^1.1.5"),
    ("class-variance-authority", "^0.7.0"),
    ("clsx", "^2.1.0"),
    ("tailwind-merge", "^2.2.1"),
    ("tailwindcss-animate", "^1.0.7"),
    ("lucide-react", "^0.330.0"),
];

const BASE_DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/node", "^20.11.19"),
    ("@types/react", "^18.2.56"),
    ("@types/react-dom", "^18.2.19"),
    ("@vitejs/plugin-react", "^4.2.1"),
    ("autoprefixer", "^10.4.17"),
    ("postcss", "^8.4.35"),
    ("tailwindcss", "^3.4.1"),
    ("@tailwindcss/typography", "^0.5.10"),
    ("vite", "^5.1.3"),
];

fn to_map(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Manifest {
    /// The manifest every project starts from
    pub fn base(project_name: &str) -> Self {
        Self {
            name: project_name.to_string(),
            private: true,
            version: "0.0.0".to_string(),
            module_type: "module".to_string(),
            scripts: to_map(BASE_SCRIPTS),
            dependencies: to_map(BASE_DEPENDENCIES),
            dev_dependencies: to_map(BASE_DEV_DEPENDENCIES),
            sections: IndexMap::new(),
        }
    }

    /// Apply one edit, last writer wins
    pub fn apply(&mut self, edit: &ManifestEdit) {
        match *edit {
            ManifestEdit::Dependency(name, range) => {
                self.dependencies.insert(name.to_string(), range.to_string());
            }
            ManifestEdit::DevDependency(name, range) => {
                self.dev_dependencies
                    .insert(name.to_string(), range.to_string());
            }
            ManifestEdit::Script(name, command) => {
                self.scripts.insert(name.to_string(), command.to_string());
            }
            ManifestEdit::Section(key, value) => {
                self.sections.insert(key.to_string(), value());
            }
        }
    }

    /// Pretty JSON with two-space indentation and a trailing newline
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    pub async fn write_to(&self, project_dir: &Path) -> crate::error::Result<()> {
        let path = project_dir.join(MANIFEST_FILE);
        let json = self.to_json()?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| crate::error::ScaffoldError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote manifest");
        Ok(())
    }
}

/// Build the manifest for a project by folding the selected features over the base
pub fn synthesize(
    project_name: &str,
    package_manager: PackageManager,
    features: &FeatureSet,
) -> Manifest {
    let manifest = features
        .iter()
        .flat_map(|flag| flag.spec().manifest.iter())
        .fold(Manifest::base(project_name), |mut manifest, edit| {
            manifest.apply(edit);
            manifest
        });

    tracing::debug!(
        project = project_name,
        manager = %package_manager,
        features = %features,
        dependencies = manifest.dependencies.len(),
        dev_dependencies = manifest.dev_dependencies.len(),
        "synthesized manifest"
    );
    manifest
}
