//! Package manager registry
//!
//! This module provides:
//! - Static command profiles for npm, pnpm, yarn and bun
//! - Version probing and the bun self-heal install
//! - The [`CommandRunner`] seam used for every external process

pub mod profile;
pub mod runner;
pub mod tool;

pub use profile::{CommandLine, PackageManager, PackageManagerProfile};
pub use runner::{CommandRunner, CommandStatus, OutputMode, SystemRunner};
pub use tool::{Availability, PackageManagerTool, Readiness};
