//! `.addin` manifest file resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::fs::remove_if_present;
use super::{Resource, ResourceChange, ResourceState};
use crate::deploy::manifest::AddInManifest;

/// A manifest file registering the plugin with one Revit installation.
///
/// Any file already at the path is treated as the deployer's own: it is
/// overwritten on apply and deleted on remove.
#[derive(Debug, Clone)]
pub struct ManifestResource {
    /// Where the manifest is written.
    pub path: PathBuf,
    /// Document to write.
    pub manifest: AddInManifest,
}

impl ManifestResource {
    /// Create a manifest resource.
    #[must_use]
    pub const fn new(path: PathBuf, manifest: AddInManifest) -> Self {
        Self { path, manifest }
    }
}

impl Resource for ManifestResource {
    fn description(&self) -> String {
        format!("manifest {}", self.path.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "target is a directory".to_string(),
            });
        }
        let existing = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read manifest: {}", self.path.display()))?;
        if existing == self.manifest.to_xml() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "different manifest".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.manifest.save_as(&self.path)?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if remove_if_present(&self.path)? {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}
