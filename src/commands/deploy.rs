//! The `setup` / `uninst` command.
use anyhow::Result;
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::config;
use crate::deploy::{Action, DeployOptions, DeployReport, execute, resolve};
use crate::error::DeployerError;
use crate::logging::{Log, Logger};
use crate::products::ProductLister;

/// Run the install or uninstall command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, no installed product
/// matches, or any deployment step failed.
pub fn run(action: Action, config_path: &Path, global: &GlobalOpts, log: &Logger) -> Result<()> {
    let version = option_env!("DEPLOYER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("revit-addin-deployer {version}"));

    let base_dir = super::resolve_base_dir(global)?;
    let lister = super::product_lister(global);
    let options = DeployOptions {
        dry_run: global.dry_run,
    };

    let result = run_with(action, config_path, &base_dir, lister.as_ref(), options, log);
    log.print_summary();
    result.map(|_| ())
}

/// Load, resolve, and execute with an explicit base directory and product
/// source.
///
/// # Errors
///
/// Returns a [`DeployerError`] for configuration, resolution, and deployment
/// failures, or the product source's own error.
pub fn run_with(
    action: Action,
    config_path: &Path,
    base_dir: &Path,
    lister: &dyn ProductLister,
    options: DeployOptions,
    log: &dyn Log,
) -> Result<DeployReport> {
    log.debug(&format!("base directory: {}", base_dir.display()));

    log.stage("Loading configuration");
    let path = super::resolve_config_path(base_dir, config_path);
    let config = config::load(&path).map_err(DeployerError::from)?;
    log.info(&format!(
        "{} '{}' from {} ({} version(s))",
        config.add_in_type,
        config.add_in_name,
        path.display(),
        config.versions.len()
    ));

    log.stage("Detecting installed Revit products");
    let installed = lister.installed_products()?;
    for product in &installed {
        log.debug(&format!(
            "{} ({}) at {}",
            product.version_name,
            product.architecture,
            product.install_location.display()
        ));
    }
    log.info(&format!("{} product(s) detected", installed.len()));

    let targets = resolve(&config, &installed, base_dir).map_err(DeployerError::from)?;
    for target in &targets {
        log.info(&format!("Revit {} -> {}", target.app_version, target.version_name));
        if action == Action::Install && !target.assembly_path.exists() {
            log.warn(&format!(
                "assembly {} does not exist",
                target.assembly_path.display()
            ));
        }
    }

    let report = execute(action, &config, &targets, base_dir, options, log)
        .map_err(DeployerError::from)?;
    Ok(report)
}
