//! Top-level command orchestration.
pub mod browse;
pub mod deploy;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, GlobalOpts, Invocation};
use crate::error::DeployerError;
use crate::logging::Logger;
use crate::products::{InventoryProductLister, ProductLister, RegistryProductLister};

/// Environment variable overriding the installer base directory.
pub const BASE_DIR_ENV: &str = "REVIT_ADDIN_DEPLOYER_DIR";

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns a [`DeployerError`] for usage, configuration, resolution, and
/// deployment failures, or any other fatal error.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    match cli.invocation().map_err(DeployerError::from)? {
        Invocation::Browse => browse::run(&cli.global, log),
        Invocation::Deploy { action, config } => deploy::run(action, &config, &cli.global, log),
    }
}

/// Resolve the installer base directory.
///
/// Order: `--base-dir`, then `REVIT_ADDIN_DEPLOYER_DIR`, then the directory
/// containing the running executable.
///
/// # Errors
///
/// Returns an error if the executable location cannot be determined.
pub fn resolve_base_dir(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref dir) = global.base_dir {
        return Ok(dir.clone());
    }

    if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let exe = dunce::canonicalize(&exe).unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .context("cannot determine installer directory. Use --base-dir or set REVIT_ADDIN_DEPLOYER_DIR")
}

/// Resolve a configuration path given on the command line against the base
/// directory. Absolute paths are returned unchanged.
#[must_use]
pub fn resolve_config_path(base_dir: &Path, config: &Path) -> PathBuf {
    if config.is_absolute() {
        config.to_path_buf()
    } else {
        base_dir.join(config)
    }
}

/// Choose the product source: the `--products` inventory when given,
/// otherwise registry discovery.
#[must_use]
pub fn product_lister(global: &GlobalOpts) -> Box<dyn ProductLister> {
    match global.products {
        Some(ref path) => Box::new(InventoryProductLister::new(path.clone())),
        None => Box::new(RegistryProductLister::new()),
    }
}
