//! Revit product discovery from the Windows uninstall registry.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Architecture, InstalledProduct, ProductLister};

/// Uninstall subkey path for native registry access.
#[cfg(windows)]
const UNINSTALL_SUBKEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// Discovers installed Revit products from the uninstall registry.
///
/// Both the 64-bit and 32-bit registry views are scanned; the view an entry
/// was found in determines its [`Architecture`]. Uses the `winreg` crate on
/// Windows and reports no products elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryProductLister;

impl RegistryProductLister {
    /// Create a new registry lister.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProductLister for RegistryProductLister {
    fn installed_products(&self) -> Result<Vec<InstalledProduct>> {
        #[cfg(windows)]
        {
            use winreg::RegKey;
            use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY};

            let program_data = env_dir("ProgramData", r"C:\ProgramData");
            let app_data = std::env::var_os("APPDATA").map(PathBuf::from);
            let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
            let mut products: Vec<InstalledProduct> = Vec::new();

            for (view, architecture) in [
                (KEY_WOW64_64KEY, Architecture::X64),
                (KEY_WOW64_32KEY, Architecture::X86),
            ] {
                let uninstall = match hklm.open_subkey_with_flags(UNINSTALL_SUBKEY, KEY_READ | view)
                {
                    Ok(key) => key,
                    Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                };
                for name in uninstall.enum_keys().flatten() {
                    let Ok(entry) = uninstall.open_subkey_with_flags(&name, KEY_READ | view) else {
                        continue;
                    };
                    let Ok(display_name) = entry.get_value::<String, _>("DisplayName") else {
                        continue;
                    };
                    let install_location: String =
                        entry.get_value("InstallLocation").unwrap_or_default();
                    let Some(product) = product_from_entry(
                        &display_name,
                        &install_location,
                        architecture,
                        &program_data,
                        app_data.as_deref(),
                    ) else {
                        continue;
                    };
                    if !products
                        .iter()
                        .any(|p| p.version_name == product.version_name)
                    {
                        products.push(product);
                    }
                }
            }

            products.sort_by(|a, b| a.version_name.cmp(&b.version_name));
            Ok(products)
        }
        #[cfg(not(windows))]
        {
            Ok(Vec::new())
        }
    }
}

/// Read a directory from the environment, falling back to `default`.
#[cfg(windows)]
fn env_dir(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var).map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Extract the release year from an uninstall display name.
///
/// Accepts `Revit 2024`, `Autodesk Revit 2019` and update suffixes such as
/// `Revit 2024.2`; rejects companion products like
/// `Revit 2024 Content Libraries`.
///
/// # Examples
///
/// ```
/// use revit_addin_deployer::products::registry::release_year;
///
/// assert_eq!(release_year("Autodesk Revit 2019"), Some("2019"));
/// assert_eq!(release_year("Revit 2024.2"), Some("2024"));
/// assert_eq!(release_year("Revit 2024 Content Libraries"), None);
/// assert_eq!(release_year("Revit LT 2024"), None);
/// ```
#[must_use]
pub fn release_year(display_name: &str) -> Option<&str> {
    let name = display_name.trim();
    let name = name.strip_prefix("Autodesk ").unwrap_or(name);
    let rest = name.strip_prefix("Revit ")?;
    let year = rest.get(..4)?;
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let suffix = rest.get(4..)?;
    (suffix.is_empty() || suffix.starts_with('.')).then_some(year)
}

/// Build an [`InstalledProduct`] from one uninstall registry entry.
///
/// Returns `None` when the entry is not a Revit release.
#[must_use]
pub fn product_from_entry(
    display_name: &str,
    install_location: &str,
    architecture: Architecture,
    program_data: &Path,
    app_data: Option<&Path>,
) -> Option<InstalledProduct> {
    let year = release_year(display_name)?;
    let addins_tail = Path::new("Autodesk").join("Revit").join("Addins").join(year);
    Some(InstalledProduct {
        version_name: format!("Revit{year}"),
        architecture,
        all_users_addin_folder: program_data.join(&addins_tail),
        current_user_addin_folder: app_data.map(|dir| dir.join(&addins_tail)),
        install_location: PathBuf::from(install_location.trim()),
    })
}
