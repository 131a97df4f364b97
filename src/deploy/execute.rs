//! Install/uninstall fan-out over resolved targets.
//!
//! Every target is attempted even after a failure; failures are collected
//! into [`DeploymentErrors`] and reported together.
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use uuid::Uuid;

use super::manifest::AddInManifest;
use super::{Action, DeployTarget};
use crate::config::AddInConfig;
use crate::error::{DeploymentError, DeploymentErrors};
use crate::logging::{Log, StepStatus};
use crate::resources::manifest::ManifestResource;
use crate::resources::resource_file::ResourceFile;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Options controlling a deployment run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployOptions {
    /// Log what would change without touching the filesystem.
    pub dry_run: bool,
}

/// Counters for one deployment step.
///
/// # Examples
///
/// ```
/// use revit_addin_deployer::deploy::StepStats;
///
/// let stats = StepStats { changed: 2, already_ok: 1, skipped: 0, failed: 0 };
/// assert_eq!(stats.summary(false), "2 changed, 1 already ok");
/// assert_eq!(stats.summary(true), "2 would change, 1 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    /// Files written, copied, or deleted.
    pub changed: u32,
    /// Files already in the desired state.
    pub already_ok: u32,
    /// Items with nothing to act on.
    pub skipped: u32,
    /// Items that failed.
    pub failed: u32,
}

impl StepStats {
    /// Format the summary string (e.g. "3 changed, 1 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut text = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            text.push_str(&format!(", {} failed", self.failed));
        }
        text
    }

    fn status(&self, dry_run: bool) -> StepStatus {
        if self.failed > 0 {
            StepStatus::Failed
        } else if self.changed + self.already_ok == 0 {
            StepStatus::Skipped
        } else if dry_run {
            StepStatus::DryRun
        } else {
            StepStatus::Ok
        }
    }
}

/// Outcome of a successful deployment run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeployReport {
    /// Manifest writes or removals.
    pub manifests: StepStats,
    /// Resource file copies or removals.
    pub resources: StepStats,
}

/// Run `action` over every target.
///
/// **Install** writes a manifest per target (overwriting), then copies
/// `base_dir/<resource_file>` into each distinct install location that does
/// not already have it. **Uninstall** deletes each target's manifest and the
/// resource file from each distinct install location; absent files are not
/// errors.
///
/// # Errors
///
/// Returns every failed step when at least one step failed. Steps after a
/// failure are still attempted.
pub fn execute(
    action: Action,
    config: &AddInConfig,
    targets: &[DeployTarget],
    base_dir: &Path,
    options: DeployOptions,
    log: &dyn Log,
) -> Result<DeployReport, DeploymentErrors> {
    let mut errors = DeploymentErrors::new();
    let report = match action {
        Action::Install => install(config, targets, base_dir, options, log, &mut errors),
        Action::Uninstall => uninstall(config, targets, base_dir, options, log, &mut errors),
    };
    errors.into_result(report)
}

fn install(
    config: &AddInConfig,
    targets: &[DeployTarget],
    base_dir: &Path,
    options: DeployOptions,
    log: &dyn Log,
    errors: &mut DeploymentErrors,
) -> DeployReport {
    let mut report = DeployReport::default();

    log.stage("Writing add-in manifests");
    for target in targets {
        let add_in_id = config.add_in_id.unwrap_or_else(Uuid::new_v4);
        let manifest = AddInManifest::for_config(config, &target.assembly_path, add_in_id);
        let resource = ManifestResource::new(target.manifest_path.clone(), manifest);
        log.debug(&format!(
            "Revit {} ({}): {}",
            target.app_version,
            target.version_name,
            target.assembly_path.display()
        ));
        if let Err(e) = apply_one(&resource, "write", options, log, &mut report.manifests) {
            report.manifests.failed += 1;
            log.warn(&format!("failed to write {}: {e:#}", resource.description()));
            errors.push(DeploymentError::ManifestWriteFailed {
                path: target.manifest_path.clone(),
                reason: format!("{e:#}"),
            });
        }
    }
    record(log, "Write add-in manifests", &report.manifests, options);

    let source = base_dir.join(&config.resource_file);
    if source.is_file() {
        log.stage("Copying resource file");
        for (version, location) in install_locations(targets) {
            let resource = ResourceFile::new(base_dir, location, &config.resource_file);
            if let Err(e) = apply_one(&resource, "copy", options, log, &mut report.resources) {
                report.resources.failed += 1;
                log.warn(&format!("failed to copy {}: {e:#}", resource.description()));
                errors.push(DeploymentError::ResourceCopyFailed {
                    version: version.to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
        record(log, "Copy resource file", &report.resources, options);
    } else {
        log.debug(&format!("no resource file at {}", source.display()));
        log.record_step(
            "Copy resource file",
            StepStatus::Skipped,
            Some(&format!("{} not shipped", config.resource_file)),
        );
    }

    report
}

fn uninstall(
    config: &AddInConfig,
    targets: &[DeployTarget],
    base_dir: &Path,
    options: DeployOptions,
    log: &dyn Log,
    errors: &mut DeploymentErrors,
) -> DeployReport {
    let mut report = DeployReport::default();

    log.stage("Removing add-in manifests");
    for target in targets {
        let manifest = AddInManifest::for_config(config, &target.assembly_path, Uuid::nil());
        let resource = ManifestResource::new(target.manifest_path.clone(), manifest);
        if let Err(e) = remove_one(&resource, "remove", options, log, &mut report.manifests) {
            report.manifests.failed += 1;
            log.warn(&format!("failed to remove {}: {e:#}", resource.description()));
            errors.push(DeploymentError::ManifestRemoveFailed {
                path: target.manifest_path.clone(),
                reason: format!("{e:#}"),
            });
        }
    }
    record(log, "Remove add-in manifests", &report.manifests, options);

    log.stage("Removing resource file");
    for (version, location) in install_locations(targets) {
        let resource = ResourceFile::new(base_dir, location, &config.resource_file);
        if let Err(e) = remove_one(&resource, "remove", options, log, &mut report.resources) {
            report.resources.failed += 1;
            log.warn(&format!("failed to remove {}: {e:#}", resource.description()));
            errors.push(DeploymentError::ResourceDeleteFailed {
                version: version.to_string(),
                reason: format!("{e:#}"),
            });
        }
    }
    record(log, "Remove resource file", &report.resources, options);

    report
}

/// Distinct install locations of the targets, each paired with the first
/// configured version that matched it.
fn install_locations(targets: &[DeployTarget]) -> Vec<(&str, &Path)> {
    let mut seen: Vec<&PathBuf> = Vec::new();
    let mut locations = Vec::new();
    for target in targets {
        if !seen.contains(&&target.install_location) {
            seen.push(&target.install_location);
            locations.push((target.app_version.as_str(), target.install_location.as_path()));
        }
    }
    locations
}

fn record(log: &dyn Log, name: &str, stats: &StepStats, options: DeployOptions) {
    let summary = stats.summary(options.dry_run);
    log.info(&summary);
    log.record_step(name, stats.status(options.dry_run), Some(&summary));
}

/// Check one resource and apply it when missing or stale.
///
/// A resource that cannot be applied at all is an error, not a skip.
fn apply_one<R: Resource>(
    resource: &R,
    verb: &str,
    options: DeployOptions,
    log: &dyn Log,
    stats: &mut StepStats,
) -> Result<()> {
    let desc = resource.description();
    match resource.current_state()? {
        ResourceState::Correct => {
            log.debug(&format!("ok: {desc}"));
            stats.already_ok += 1;
        }
        ResourceState::Invalid { reason } => bail!("cannot {verb} {desc}: {reason}"),
        state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if options.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb}: {desc}")
                };
                log.dry_run(&msg);
                stats.changed += 1;
                return Ok(());
            }
            match resource.apply()? {
                ResourceChange::Applied => {
                    log.debug(&format!("{verb}: {desc}"));
                    stats.changed += 1;
                }
                ResourceChange::AlreadyCorrect => stats.already_ok += 1,
                ResourceChange::Skipped { reason } => {
                    log.debug(&format!("skipping {desc}: {reason}"));
                    stats.skipped += 1;
                }
            }
        }
    }
    Ok(())
}

/// Delete one resource if anything is present at its target.
fn remove_one<R: Resource>(
    resource: &R,
    verb: &str,
    options: DeployOptions,
    log: &dyn Log,
    stats: &mut StepStats,
) -> Result<()> {
    let desc = resource.description();
    match resource.current_state()? {
        ResourceState::Missing => {
            log.debug(&format!("not present: {desc}"));
            stats.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            log.debug(&format!("skipping {desc}: {reason}"));
            stats.skipped += 1;
        }
        ResourceState::Correct | ResourceState::Incorrect { .. } => {
            if options.dry_run {
                log.dry_run(&format!("would {verb}: {desc}"));
                stats.changed += 1;
                return Ok(());
            }
            match resource.remove()? {
                ResourceChange::Applied => {
                    log.debug(&format!("{verb}: {desc}"));
                    stats.changed += 1;
                }
                ResourceChange::AlreadyCorrect | ResourceChange::Skipped { .. } => {
                    stats.already_ok += 1;
                }
            }
        }
    }
    Ok(())
}
