//! Deploy target resolution.
use std::path::Path;

use super::DeployTarget;
use crate::config::{AddInConfig, VersionConfig};
use crate::error::ResolveError;
use crate::products::{Architecture, InstalledProduct};

/// Return `true` if `product` is an installation of `version`.
///
/// Matching is a case-sensitive substring test on the product's raw version
/// name, so `"2024"` matches both `"Revit2024"` and `"2024_Update1"`.
#[must_use]
pub fn matches(version: &VersionConfig, product: &InstalledProduct) -> bool {
    !product.version_name.is_empty() && product.version_name.contains(&version.app_version)
}

/// Resolve the manifest/assembly path pairs for every installed product that
/// matches a configured version.
///
/// Targets are ordered by configured version, then by product. Products with
/// an unrecognized architecture never match, since no assembly path can be
/// chosen for them. Versions without an installed counterpart are skipped.
///
/// # Errors
///
/// Returns [`ResolveError::NoProductsInstalled`] if `installed` is empty and
/// [`ResolveError::NoMatchingProduct`] if no pair matched at all.
pub fn resolve(
    config: &AddInConfig,
    installed: &[InstalledProduct],
    base_dir: &Path,
) -> Result<Vec<DeployTarget>, ResolveError> {
    if installed.is_empty() {
        return Err(ResolveError::NoProductsInstalled);
    }

    let targets: Vec<DeployTarget> = config
        .versions
        .iter()
        .flat_map(|version| {
            installed
                .iter()
                .filter(move |product| matches(version, product))
                .filter_map(move |product| target_for(config, version, product, base_dir))
        })
        .collect();

    if targets.is_empty() {
        return Err(ResolveError::NoMatchingProduct);
    }
    Ok(targets)
}

fn target_for(
    config: &AddInConfig,
    version: &VersionConfig,
    product: &InstalledProduct,
    base_dir: &Path,
) -> Option<DeployTarget> {
    let arch_dir = match product.architecture {
        Architecture::X86 => &version.path_x86,
        Architecture::X64 => &version.path_x64,
        Architecture::Unknown => return None,
    };
    Some(DeployTarget {
        app_version: version.app_version.clone(),
        version_name: product.version_name.clone(),
        manifest_path: product
            .all_users_addin_folder
            .join(&config.manifest_file_name),
        assembly_path: base_dir
            .join(native_relative(arch_dir))
            .join(&config.assembly_name),
        install_location: product.install_location.clone(),
    })
}

/// Normalize a configured relative directory to the host path separator.
///
/// `Setup.ini` files are written with Windows separators (`2024\x64`).
fn native_relative(fragment: &str) -> std::path::PathBuf {
    fragment
        .split(['\\', '/'])
        .filter(|part| !part.is_empty())
        .collect()
}
