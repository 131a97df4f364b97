//! Installed Revit product discovery.
//!
//! Product enumeration is a collaborator behind the [`ProductLister`] trait so
//! that target resolution can run against registry data on Windows, a TOML
//! inventory file, or fixed fixtures in tests.
pub mod inventory;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

pub use inventory::InventoryProductLister;
pub use registry::RegistryProductLister;

/// Processor architecture of an installed Revit product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Architecture {
    /// 32-bit build.
    X86,
    /// 64-bit build.
    X64,
    /// Reported by the host but not recognized.
    Unknown,
}

impl Architecture {
    /// Parse `x86` or `x64`, ignoring ASCII case; anything else is
    /// [`Unknown`](Self::Unknown).
    ///
    /// # Examples
    ///
    /// ```
    /// use revit_addin_deployer::products::Architecture;
    ///
    /// assert_eq!(Architecture::parse("X64"), Architecture::X64);
    /// assert_eq!(Architecture::parse("arm64"), Architecture::Unknown);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("x86") {
            Self::X86
        } else if value.eq_ignore_ascii_case("x64") {
            Self::X64
        } else {
            Self::Unknown
        }
    }
}

impl From<String> for Architecture {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "x86"),
            Self::X64 => write!(f, "x64"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A Revit installation found on the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledProduct {
    /// Raw version identifier (e.g., `"Revit2024"`), matched by substring.
    pub version_name: String,
    /// Build architecture.
    pub architecture: Architecture,
    /// Machine-wide add-in manifest directory.
    pub all_users_addin_folder: PathBuf,
    /// Per-user add-in manifest directory, when known.
    #[serde(default)]
    pub current_user_addin_folder: Option<PathBuf>,
    /// Revit installation directory.
    pub install_location: PathBuf,
}

impl InstalledProduct {
    /// Directory holding this user's add-in folders for every Revit version:
    /// the parent of [`current_user_addin_folder`](Self::current_user_addin_folder),
    /// or of [`all_users_addin_folder`](Self::all_users_addin_folder) when the
    /// per-user folder is unknown.
    #[must_use]
    pub fn addins_root(&self) -> &Path {
        let folder = self
            .current_user_addin_folder
            .as_deref()
            .unwrap_or(&self.all_users_addin_folder);
        folder.parent().unwrap_or(folder)
    }
}

/// Source of installed Revit products.
pub trait ProductLister {
    /// Enumerate the Revit products installed on the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the product source exists but cannot be read.
    fn installed_products(&self) -> Result<Vec<InstalledProduct>>;
}

/// A fixed, in-memory product list.
#[derive(Debug, Clone, Default)]
pub struct FixedProductLister {
    products: Vec<InstalledProduct>,
}

impl FixedProductLister {
    /// Create a lister that always reports `products`.
    #[must_use]
    pub const fn new(products: Vec<InstalledProduct>) -> Self {
        Self { products }
    }
}

impl ProductLister for FixedProductLister {
    fn installed_products(&self) -> Result<Vec<InstalledProduct>> {
        Ok(self.products.clone())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(folder: &str) -> InstalledProduct {
        InstalledProduct {
            version_name: "Revit2024".to_string(),
            architecture: Architecture::X64,
            all_users_addin_folder: PathBuf::from(folder),
            current_user_addin_folder: None,
            install_location: PathBuf::from("/opt/revit/2024"),
        }
    }

    #[test]
    fn addins_root_is_parent_of_all_users_folder() {
        let p = product("/programdata/Autodesk/Revit/Addins/2024");
        assert_eq!(
            p.addins_root(),
            Path::new("/programdata/Autodesk/Revit/Addins")
        );
    }

    #[test]
    fn addins_root_prefers_current_user_folder() {
        let mut p = product("/programdata/Autodesk/Revit/Addins/2024");
        p.current_user_addin_folder =
            Some(PathBuf::from("/home/me/AppData/Roaming/Autodesk/Revit/Addins/2024"));
        assert_eq!(
            p.addins_root(),
            Path::new("/home/me/AppData/Roaming/Autodesk/Revit/Addins")
        );
    }

    #[test]
    fn architecture_parse_ignores_case() {
        assert_eq!(Architecture::parse("x86"), Architecture::X86);
        assert_eq!(Architecture::parse("X86"), Architecture::X86);
        assert_eq!(Architecture::parse(" X64 "), Architecture::X64);
        assert_eq!(Architecture::parse(""), Architecture::Unknown);
    }

    #[test]
    fn addins_root_falls_back_to_folder_without_parent() {
        let p = product("/");
        assert_eq!(p.addins_root(), Path::new("/"));
    }

    #[test]
    fn fixed_lister_returns_products() {
        let lister = FixedProductLister::new(vec![product("/a/2024")]);
        assert_eq!(lister.installed_products().unwrap().len(), 1);
    }

    #[test]
    fn architecture_display() {
        assert_eq!(Architecture::X86.to_string(), "x86");
        assert_eq!(Architecture::X64.to_string(), "x64");
        assert_eq!(Architecture::Unknown.to_string(), "unknown");
    }
}
