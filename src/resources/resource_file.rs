//! Auxiliary resource file copied into Revit install directories.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::fs::{ensure_parent_dir, remove_if_present};
use super::{Resource, ResourceChange, ResourceState};

/// The plugin's resource file placed beside a Revit executable.
///
/// An existing copy is never overwritten.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    /// File shipped beside the installer.
    pub source: PathBuf,
    /// Destination inside the Revit install directory.
    pub target: PathBuf,
}

impl ResourceFile {
    /// Create a resource for `file_name` copied from `base_dir` into
    /// `install_location`.
    #[must_use]
    pub fn new(base_dir: &Path, install_location: &Path, file_name: &str) -> Self {
        Self {
            source: base_dir.join(file_name),
            target: install_location.join(file_name),
        }
    }
}

impl Resource for ResourceFile {
    fn description(&self) -> String {
        format!("resource file {}", self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.target.as_os_str().is_empty() || self.target.parent() == Some(Path::new("")) {
            return Ok(ResourceState::Invalid {
                reason: "install location unknown".to_string(),
            });
        }
        if self.target.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.is_file() {
            return Ok(ResourceChange::Skipped {
                reason: format!("{} not found", self.source.display()),
            });
        }
        ensure_parent_dir(&self.target)?;
        std::fs::copy(&self.source, &self.target).with_context(|| {
            format!(
                "copy {} to {}",
                self.source.display(),
                self.target.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if remove_if_present(&self.target)? {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}
