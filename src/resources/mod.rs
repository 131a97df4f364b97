//! Idempotent deployment primitives (check + apply pattern).
pub mod fs;
pub mod manifest;
pub mod resource_file;

use anyhow::Result;

/// State of a deployed file.
///
/// # Examples
///
/// ```
/// use revit_addin_deployer::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let stale = ResourceState::Incorrect { current: "different content".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(stale, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target path.
    Missing,
    /// The target exists and matches the desired state.
    Correct,
    /// The target exists but does not match the desired state.
    Incorrect {
        /// Description of what is currently there.
        current: String,
    },
    /// The resource cannot be applied at all.
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying or removing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The target was created, updated, or deleted.
    Applied,
    /// The target was already in the desired state.
    AlreadyCorrect,
    /// Nothing was done.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// A file the deployer writes into a Revit installation.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the target to the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be written.
    fn apply(&self) -> Result<ResourceChange>;

    /// Delete the target, undoing a previous [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Returns an error if the target exists but cannot be deleted.
    fn remove(&self) -> Result<ResourceChange>;
}
