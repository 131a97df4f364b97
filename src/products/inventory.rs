//! Product inventory files.
//!
//! An inventory lists installed products explicitly instead of discovering
//! them from the registry:
//!
//! ```toml
//! [[product]]
//! version_name = "Revit2024"
//! architecture = "x64"
//! all_users_addin_folder = 'C:\ProgramData\Autodesk\Revit\Addins\2024'
//! install_location = 'C:\Program Files\Autodesk\Revit 2024'
//! ```
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{InstalledProduct, ProductLister};

#[derive(Debug, Deserialize)]
struct Inventory {
    #[serde(default, rename = "product")]
    products: Vec<InstalledProduct>,
}

/// Reads installed products from a TOML inventory file.
#[derive(Debug, Clone)]
pub struct InventoryProductLister {
    path: PathBuf,
}

impl InventoryProductLister {
    /// Create a lister backed by the inventory at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ProductLister for InventoryProductLister {
    fn installed_products(&self) -> Result<Vec<InstalledProduct>> {
        load(&self.path)
    }
}

/// Load an inventory file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid inventory.
pub fn load(path: &Path) -> Result<Vec<InstalledProduct>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product inventory: {}", path.display()))?;
    parse(&content)
        .with_context(|| format!("Failed to parse product inventory: {}", path.display()))
}

/// Parse inventory content from a string.
///
/// # Errors
///
/// Returns an error if the content is not valid TOML or a product table is
/// missing a required field.
pub fn parse(content: &str) -> Result<Vec<InstalledProduct>> {
    let inventory: Inventory = toml::from_str(content)?;
    Ok(inventory.products)
}
