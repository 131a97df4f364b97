//! The no-argument command: open the Revit add-in folder.
use anyhow::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::exec;
use crate::logging::Logger;
use crate::platform::Os;
use crate::products::ProductLister;

/// Open the parent of the first installed product's per-user add-in folder
/// in the platform file browser. Does nothing when no product is installed.
///
/// # Errors
///
/// Returns an error if the product source cannot be read or the file
/// browser cannot be started.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let lister = super::product_lister(global);
    let Some(folder) = addins_folder(lister.as_ref())? else {
        log.debug("no Revit installation found; nothing to open");
        return Ok(());
    };
    let program = Os::detect().file_browser();

    if global.dry_run {
        log.dry_run(&format!("would run: {program} {}", folder.display()));
        return Ok(());
    }
    if !exec::which(program) {
        anyhow::bail!("cannot open {}: {program} not found", folder.display());
    }

    log.info(&format!("opening {}", folder.display()));
    let result = exec::run_with_path(program, &folder)?;
    if !result.success {
        // explorer exits non-zero even after opening the window
        log.debug(&format!(
            "{program} exited with code {}: {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        ));
    }
    Ok(())
}

/// Return the add-in root of the first installed product, or `None` when
/// the product source reports nothing.
///
/// # Errors
///
/// Returns an error if the product source cannot be read.
pub fn addins_folder(lister: &dyn ProductLister) -> Result<Option<PathBuf>> {
    let products = lister.installed_products()?;
    Ok(products
        .first()
        .map(|first| first.addins_root().to_path_buf()))
}
