//! Package manager identities and their command grammar

use crate::error::RequestError;
use std::fmt;
use std::str::FromStr;

/// Environment variable set by npm, pnpm, yarn and bun when they launch a binary
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Supported package managers, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Look up a manager by id and return its command profile
    pub fn resolve(id: &str) -> Result<&'static PackageManagerProfile, RequestError> {
        id.parse::<PackageManager>().map(|pm| pm.profile())
    }

    pub fn profile(&self) -> &'static PackageManagerProfile {
        match self {
            PackageManager::Npm => &NPM,
            PackageManager::Pnpm => &PNPM,
            PackageManager::Yarn => &YARN,
            PackageManager::Bun => &BUN,
        }
    }

    /// Guess the manager the user launched us with, falling back to npm
    pub fn detect() -> Self {
        Self::from_user_agent(std::env::var(USER_AGENT_ENV).ok().as_deref())
    }

    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if ua.starts_with("yarn") => PackageManager::Yarn,
            Some(ua) if ua.starts_with("pnpm") => PackageManager::Pnpm,
            Some(ua) if ua.starts_with("bun") => PackageManager::Bun,
            _ => PackageManager::Npm,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for PackageManager {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            _ => Err(RequestError::UnknownPackageManager(s.to_string())),
        }
    }
}

/// A program plus its arguments, spawned directly without a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl CommandLine {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Command grammar for one package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerProfile {
    pub id: PackageManager,
    /// Version query used to check the binary is on PATH
    pub probe: CommandLine,
    /// Installs everything listed in package.json
    pub install: CommandLine,
    /// Adds a dev dependency (package name appended by the caller)
    pub add_dev: CommandLine,
    /// Prefix for running a package.json script, e.g. `npm run` + `dev`
    pub run_prefix: &'static str,
    /// Installer tried once when the probe fails
    pub fallback_installer: Option<CommandLine>,
    pub docs_url: &'static str,
}

impl PackageManagerProfile {
    /// Command the user types to run a script, e.g. `pnpm dev`
    pub fn run_script(&self, script: &str) -> String {
        format!("{} {}", self.run_prefix, script)
    }
}

static NPM: PackageManagerProfile = PackageManagerProfile {
    id: PackageManager::Npm,
    probe: CommandLine::new("npm", &["--version"]),
    install: CommandLine::new("npm", &["install"]),
    add_dev: CommandLine::new("npm", &["install", "-D"]),
    run_prefix: "npm run",
    fallback_installer: None,
    docs_url: "https://docs.npmjs.com/downloading-and-installing-node-js-and-npm",
};

static PNPM: PackageManagerProfile = PackageManagerProfile {
    id: PackageManager::Pnpm,
    probe: CommandLine::new("pnpm", &["--version"]),
    install: CommandLine::new("pnpm", &["install"]),
    add_dev: CommandLine::new("pnpm", &["install", "-D"]),
    run_prefix: "pnpm",
    fallback_installer: None,
    docs_url: "https://pnpm.io/installation",
};

static YARN: PackageManagerProfile = PackageManagerProfile {
    id: PackageManager::Yarn,
    probe: CommandLine::new("yarn", &["--version"]),
    install: CommandLine::new("yarn", &[]),
    add_dev: CommandLine::new("yarn", &["add", "-D"]),
    run_prefix: "yarn",
    fallback_installer: None,
    docs_url: "https://yarnpkg.com/getting-started/install",
};

// bun is the one usually missing on a fresh machine; npm ships with node.
static BUN: PackageManagerProfile = PackageManagerProfile {
    id: PackageManager::Bun,
    probe: CommandLine::new("bun", &["--version"]),
    install: CommandLine::new("bun", &["install"]),
    add_dev: CommandLine::new("bun", &["add", "-d"]),
    run_prefix: "bun run",
    fallback_installer: Some(CommandLine::new("npm", &["install", "-g", "bun"])),
    docs_url: "https://bun.sh/docs/installation",
};
