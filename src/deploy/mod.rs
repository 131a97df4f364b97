//! Deployment of add-in manifests to installed Revit products.
//!
//! - **[`resolve`]**: cross-reference configured versions with installed products
//! - **[`manifest`]**: build and serialize `.addin` manifests
//! - **[`execute`]**: write or remove manifests and the resource file
pub mod execute;
pub mod manifest;
pub mod resolve;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::UsageError;

pub use execute::{DeployOptions, DeployReport, StepStats, execute};
pub use resolve::resolve;

/// What to do with the resolved targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write manifests and copy the resource file.
    Install,
    /// Remove manifests and the resource file.
    Uninstall,
}

impl FromStr for Action {
    type Err = UsageError;

    /// Parse `setup` / `uninst` (or `install` / `uninstall`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "setup" | "install" => Ok(Self::Install),
            "uninst" | "uninstall" => Ok(Self::Uninstall),
            _ => Err(UsageError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// One manifest to deploy for one matched installed product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    /// Configured version that matched (e.g., `"2024"`).
    pub app_version: String,
    /// Raw version name of the matched product (e.g., `"Revit2024"`).
    pub version_name: String,
    /// Where the `.addin` manifest is written.
    pub manifest_path: PathBuf,
    /// Plugin assembly referenced by the manifest.
    pub assembly_path: PathBuf,
    /// Install directory of the matched product.
    pub install_location: PathBuf,
}
