//! Per-flag edit descriptors
//!
//! Adding a flag means adding a variant and a row here; nothing else in the
//! pipeline branches on individual flags.

use super::FeatureFlag;
use crate::manifest::ManifestEdit;
use crate::templates::patch::{TemplatePatch, CONTAINER_QUERIES};
use serde_json::{json, Value};

/// A fixed file written into the project for a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxFragment {
    /// Path relative to the project root, `/`-separated
    pub path: &'static str,
    pub contents: &'static str,
}

/// Everything a flag contributes to the generated project
#[derive(Debug)]
pub struct FeatureSpec {
    pub flag: FeatureFlag,
    pub manifest: &'static [ManifestEdit],
    pub patches: &'static [&'static TemplatePatch],
    pub fragments: &'static [AuxFragment],
}

macro_rules! fragment {
    ($path:literal) => {
        AuxFragment {
            path: $path,
            contents: include_str!(concat!("../../fragments/", $path)),
        }
    };
}

pub(crate) fn spec_for(flag: FeatureFlag) -> &'static FeatureSpec {
    match flag {
        FeatureFlag::Router => &ROUTER,
        FeatureFlag::StateManagement => &STATE_MANAGEMENT,
        FeatureFlag::DarkMode => &DARK_MODE,
        FeatureFlag::Examples => &EXAMPLES,
        FeatureFlag::ContainerQueries => &CONTAINER_QUERIES_SPEC,
        FeatureFlag::Linting => &LINTING,
        FeatureFlag::CodeSplitting => &CODE_SPLITTING,
        FeatureFlag::Pwa => &PWA,
        FeatureFlag::ImageOptimization => &IMAGE_OPTIMIZATION,
    }
}

static ROUTER: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::Router,
    manifest: &[ManifestEdit::Dependency("react-router-dom", "^6.22.0")],
    patches: &[],
    fragments: &[
        fragment!("src/pages/Home.jsx"),
        fragment!("src/pages/Dashboard.jsx"),
        fragment!("src/routes.jsx"),
    ],
};

static STATE_MANAGEMENT: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::StateManagement,
    manifest: &[ManifestEdit::Dependency("zustand", "^4.5.0")],
    patches: &[],
    fragments: &[fragment!("src/store/counter.js")],
};

static DARK_MODE: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::DarkMode,
    manifest: &[],
    patches: &[],
    fragments: &[
        fragment!("src/hooks/useTheme.js"),
        fragment!("src/components/ThemeToggle.jsx"),
    ],
};

static EXAMPLES: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::Examples,
    manifest: &[],
    patches: &[],
    fragments: &[fragment!("src/components/examples/FeatureCard.jsx")],
};

static CONTAINER_QUERIES_SPEC: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::ContainerQueries,
    manifest: &[ManifestEdit::DevDependency(
        "@tailwindcss/container-queries",
        "^0.1.1",
    )],
    patches: &[&CONTAINER_QUERIES],
    fragments: &[],
};

static LINTING: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::Linting,
    manifest: &[
        ManifestEdit::DevDependency("eslint", "^8.56.0"),
        ManifestEdit::DevDependency("eslint-plugin-react", "^7.33.2"),
        ManifestEdit::DevDependency("eslint-plugin-react-hooks", "^4.6.0"),
        ManifestEdit::DevDependency("eslint-plugin-import", "^2.29.1"),
        ManifestEdit::DevDependency("eslint-config-prettier", "^9.1.0"),
        ManifestEdit::DevDependency("prettier", "^3.2.5"),
        ManifestEdit::DevDependency("husky", "^9.0.11"),
        ManifestEdit::DevDependency("lint-staged", "^15.2.2"),
        ManifestEdit::Script("lint", "eslint . --ext .js,.jsx --fix"),
        ManifestEdit::Script("format", "prettier --write ."),
        ManifestEdit::Script("prepare", "husky"),
        ManifestEdit::Section("lint-staged", lint_staged),
    ],
    patches: &[],
    fragments: &[fragment!(".eslintrc.json"), fragment!(".prettierrc")],
};

static CODE_SPLITTING: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::CodeSplitting,
    manifest: &[ManifestEdit::DevDependency(
        "@rollup/plugin-dynamic-import-vars",
        "^2.1.2",
    )],
    patches: &[],
    fragments: &[
        fragment!("src/utils/loadable.jsx"),
        fragment!("src/utils/performance.js"),
    ],
};

static PWA: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::Pwa,
    manifest: &[ManifestEdit::DevDependency("vite-plugin-pwa", "^0.17.4")],
    patches: &[],
    fragments: &[fragment!("public/manifest.webmanifest")],
};

static IMAGE_OPTIMIZATION: FeatureSpec = FeatureSpec {
    flag: FeatureFlag::ImageOptimization,
    manifest: &[ManifestEdit::DevDependency("sharp", "^0.33.2")],
    patches: &[],
    fragments: &[fragment!("src/components/common/OptimizedImage.jsx")],
};

fn lint_staged() -> Value {
    json!({
        "*.{js,jsx}": ["eslint --fix", "prettier --write"],
        "*.{json,md}": ["prettier --write"]
    })
}
