//! Feature flags and validated feature selections
//!
//! Flags are independent. They are always applied in declaration order, which
//! is also the `Ord` order, so a [`FeatureSet`] iterates deterministically no
//! matter how the selection was entered.

pub mod registry;

use crate::error::RequestError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use registry::{AuxFragment, FeatureSpec};

/// Optional capabilities of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureFlag {
    Router,
    StateManagement,
    DarkMode,
    Examples,
    ContainerQueries,
    Linting,
    CodeSplitting,
    Pwa,
    ImageOptimization,
}

impl FeatureFlag {
    /// All flags in application order
    pub const ALL: [FeatureFlag; 9] = [
        FeatureFlag::Router,
        FeatureFlag::StateManagement,
        FeatureFlag::DarkMode,
        FeatureFlag::Examples,
        FeatureFlag::ContainerQueries,
        FeatureFlag::Linting,
        FeatureFlag::CodeSplitting,
        FeatureFlag::Pwa,
        FeatureFlag::ImageOptimization,
    ];

    /// Canonical identifier, as accepted on the command line
    pub fn id(&self) -> &'static str {
        match self {
            FeatureFlag::Router => "router",
            FeatureFlag::StateManagement => "stateManagement",
            FeatureFlag::DarkMode => "darkMode",
            FeatureFlag::Examples => "examples",
            FeatureFlag::ContainerQueries => "containerQueries",
            FeatureFlag::Linting => "linting",
            FeatureFlag::CodeSplitting => "codeSplitting",
            FeatureFlag::Pwa => "pwa",
            FeatureFlag::ImageOptimization => "imageOptimization",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureFlag::Router => "React Router",
            FeatureFlag::StateManagement => "Zustand (State Management)",
            FeatureFlag::DarkMode => "Dark Mode",
            FeatureFlag::Examples => "Example Components",
            FeatureFlag::ContainerQueries => "Container Queries",
            FeatureFlag::Linting => "ESLint & Prettier",
            FeatureFlag::CodeSplitting => "Code Splitting & Lazy Loading",
            FeatureFlag::Pwa => "PWA Support",
            FeatureFlag::ImageOptimization => "Image Optimization",
        }
    }

    /// Whether the flag is selected when the user skips the feature step
    pub fn default_selected(&self) -> bool {
        !matches!(self, FeatureFlag::ContainerQueries | FeatureFlag::Pwa)
    }

    /// Edits, patches and fragments registered for this flag
    pub fn spec(&self) -> &'static FeatureSpec {
        registry::spec_for(*self)
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for FeatureFlag {
    type Err = RequestError;

    /// Case-insensitive; `-` and `_` are ignored so `dark-mode` and `dark_mode` work too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let flag = match normalized.as_str() {
            "router" => FeatureFlag::Router,
            "statemanagement" | "state" | "zustand" => FeatureFlag::StateManagement,
            "darkmode" => FeatureFlag::DarkMode,
            "examples" => FeatureFlag::Examples,
            "containerqueries" => FeatureFlag::ContainerQueries,
            "linting" | "lint" => FeatureFlag::Linting,
            "codesplitting" => FeatureFlag::CodeSplitting,
            "pwa" => FeatureFlag::Pwa,
            "imageoptimization" => FeatureFlag::ImageOptimization,
            _ => {
                return Err(RequestError::InvalidFeatureName {
                    name: s.to_string(),
                    available: FeatureFlag::ALL
                        .iter()
                        .map(|f| f.id())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
            }
        };
        Ok(flag)
    }
}

/// A validated selection of feature flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<FeatureFlag>);

impl FeatureSet {
    /// The selection used when the feature step is skipped entirely
    pub fn defaults() -> Self {
        FeatureFlag::ALL
            .into_iter()
            .filter(FeatureFlag::default_selected)
            .collect()
    }

    /// An explicitly empty selection
    pub fn none() -> Self {
        Self::default()
    }

    /// Validate raw names; the first unknown name fails the whole selection.
    /// Duplicates collapse.
    pub fn validate<I, S>(raw: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|name| name.as_ref().parse::<FeatureFlag>())
            .collect()
    }

    pub fn contains(&self, flag: FeatureFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Selected flags in application order
    pub fn iter(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FeatureFlag> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = FeatureFlag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(|flag| flag.id()).collect();
        f.write_str(&names.join(", "))
    }
}
