//! Domain-specific error types for the add-in deployer.
//!
//! Internal modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! DeployerError
//! ├── Usage(UsageError)            argument count, unknown action
//! ├── Config(ConfigErrors)         every problem found in the INI file
//! ├── Resolve(ResolveError)        no Revit installed / none matching
//! └── Deployment(DeploymentErrors) per-target write/copy/delete failures
//! ```
//!
//! Configuration and deployment failures are *collected*: the reader and the
//! executor keep going after a problem so the operator sees every issue in a
//! single run.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the deployer.
#[derive(Error, Debug)]
pub enum DeployerError {
    /// The command line could not be interpreted.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The INI configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigErrors),

    /// No installed Revit product could be targeted.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// One or more deployment steps failed.
    #[error(transparent)]
    Deployment(#[from] DeploymentErrors),
}

impl DeployerError {
    /// Every diagnostic line carried by this error, in reporting order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Config(errors) => errors.iter().map(ToString::to_string).collect(),
            Self::Deployment(errors) => errors.iter().map(ToString::to_string).collect(),
            Self::Usage(e) => vec![e.to_string()],
            Self::Resolve(e) => vec![e.to_string()],
        }
    }
}

/// Errors in how the tool was invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The action is neither `setup` nor `uninst`.
    #[error("invalid action '{0}': expected 'setup' or 'uninst'")]
    InvalidAction(String),

    /// An action was given without a configuration file.
    #[error("missing configuration file argument after action '{0}'")]
    MissingConfigPath(String),

    /// More positional arguments than `<action> <config>`.
    #[error("unexpected argument '{0}': usage is <setup|uninst> <config>")]
    UnexpectedArgument(String),
}

/// A single problem found while loading the INI configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("IO error reading configuration file {}: {source}", path.display())]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line is not a section header, comment, or `key = value` pair.
    #[error("invalid INI syntax at line {line}: {content}")]
    InvalidSyntax {
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        content: String,
    },

    /// A required key is absent or has an empty value.
    #[error("configuration key [{section}] {key} is missing or empty")]
    MissingKey {
        /// Section the key was looked up in.
        section: String,
        /// Key name.
        key: String,
    },

    /// A key holds a value of the wrong shape.
    #[error(
        "configuration key {key} must be an integer from 0 to {}, got '{value}'",
        crate::config::MAX_VERSION_COUNT
    )]
    InvalidFormat {
        /// Key name.
        key: String,
        /// Raw value found in the file.
        value: String,
    },

    /// `Type` is neither `app` nor `cmd`.
    #[error("invalid add-in type '{0}': expected 'app' or 'cmd'")]
    InvalidAddInType(String),

    /// `AddInId` is set but is not a GUID.
    #[error("invalid add-in id '{0}': expected a GUID")]
    InvalidAddInId(String),
}

impl ConfigError {
    /// Name of the key this error refers to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. } | Self::InvalidFormat { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Every problem found in one configuration file.
///
/// Never empty when returned as an error.
#[derive(Debug, Default)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a problem to the set.
    pub fn push(&mut self, error: ConfigError) {
        self.0.push(error);
    }

    /// Return `true` when no problem has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded problems.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded problems.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    /// Return `Ok(value)` when the set is empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself when at least one problem was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a ConfigErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Errors that prevent any deploy target from being resolved.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The host has no Revit product installed at all.
    #[error("no installed Revit product was detected on this machine")]
    NoProductsInstalled,

    /// Revit is installed, but none of the configured versions.
    #[error("no installed Revit product matches the versions in the configuration")]
    NoMatchingProduct,
}

/// A single failed deployment step.
#[derive(Error, Debug)]
pub enum DeploymentError {
    /// A manifest could not be written.
    #[error("failed to write manifest {}: {reason}", path.display())]
    ManifestWriteFailed {
        /// Manifest path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// A manifest exists but could not be deleted.
    #[error("failed to remove manifest {}: {reason}", path.display())]
    ManifestRemoveFailed {
        /// Manifest path.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// The resource file could not be copied into a Revit install directory.
    #[error("failed to add resource file for Revit {version}: {reason}")]
    ResourceCopyFailed {
        /// Configured Revit version the copy was for.
        version: String,
        /// Underlying failure.
        reason: String,
    },

    /// The resource file could not be deleted from a Revit install directory.
    #[error("failed to remove resource file for Revit {version}: {reason}")]
    ResourceDeleteFailed {
        /// Configured Revit version the deletion was for.
        version: String,
        /// Underlying failure.
        reason: String,
    },
}

/// Every deployment step that failed during one run.
#[derive(Debug, Default)]
pub struct DeploymentErrors(Vec<DeploymentError>);

impl DeploymentErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a failure to the set.
    pub fn push(&mut self, error: DeploymentError) {
        self.0.push(error);
    }

    /// Return `true` when no failure has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded failures.
    pub fn iter(&self) -> std::slice::Iter<'_, DeploymentError> {
        self.0.iter()
    }

    /// Return `Ok(value)` when no step failed, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself when at least one step failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl<'a> IntoIterator for &'a DeploymentErrors {
    type Item = &'a DeploymentError;
    type IntoIter = std::slice::Iter<'a, DeploymentError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DeploymentErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deployment step(s) failed", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DeploymentErrors {}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // ConfigError
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_missing_key_display() {
        let e = ConfigError::MissingKey {
            section: "AddInContent".to_string(),
            key: "AssemblyName".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "configuration key [AddInContent] AssemblyName is missing or empty"
        );
        assert_eq!(e.key(), Some("AssemblyName"));
    }

    #[test]
    fn config_error_invalid_format_display() {
        let e = ConfigError::InvalidFormat {
            key: "VersionCount".to_string(),
            value: "-1".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "configuration key VersionCount must be an integer from 0 to 1000, got '-1'"
        );
    }

    #[test]
    fn config_error_not_found_display() {
        let e = ConfigError::NotFound(PathBuf::from("/opt/setup/Setup.ini"));
        assert!(e.to_string().contains("/opt/setup/Setup.ini"));
        assert_eq!(e.key(), None);
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("Setup.ini"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn config_errors_display_lists_every_problem() {
        let mut errors = ConfigErrors::new();
        errors.push(ConfigError::InvalidAddInType("dll".to_string()));
        errors.push(ConfigError::MissingKey {
            section: "AddInFile".to_string(),
            key: "FileName".to_string(),
        });
        let text = errors.to_string();
        assert!(text.starts_with("2 configuration error(s)"));
        assert!(text.contains("invalid add-in type 'dll'"));
        assert!(text.contains("[AddInFile] FileName"));
    }

    #[test]
    fn config_errors_into_result() {
        assert_eq!(ConfigErrors::new().into_result(7).unwrap(), 7);
        let errors: ConfigErrors = ConfigError::InvalidAddInId("x".to_string()).into();
        assert_eq!(errors.into_result(7).unwrap_err().len(), 1);
    }

    // -----------------------------------------------------------------------
    // ResolveError / DeploymentError
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_error_display() {
        assert!(
            ResolveError::NoProductsInstalled
                .to_string()
                .contains("no installed Revit product")
        );
        assert!(
            ResolveError::NoMatchingProduct
                .to_string()
                .contains("matches the versions")
        );
    }

    #[test]
    fn deployment_error_resource_copy_display() {
        let e = DeploymentError::ResourceCopyFailed {
            version: "2024".to_string(),
            reason: "access denied".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "failed to add resource file for Revit 2024: access denied"
        );
    }

    // -----------------------------------------------------------------------
    // DeployerError
    // -----------------------------------------------------------------------

    #[test]
    fn deployer_error_messages_flatten_collections() {
        let mut errors = DeploymentErrors::new();
        errors.push(DeploymentError::ResourceDeleteFailed {
            version: "2023".to_string(),
            reason: "in use".to_string(),
        });
        errors.push(DeploymentError::ResourceDeleteFailed {
            version: "2024".to_string(),
            reason: "in use".to_string(),
        });
        let e: DeployerError = errors.into();
        assert_eq!(e.messages().len(), 2);
    }

    #[test]
    fn deployer_error_from_usage_error() {
        let e: DeployerError = UsageError::InvalidAction("remove".to_string()).into();
        assert_eq!(
            e.messages(),
            vec!["invalid action 'remove': expected 'setup' or 'uninst'".to_string()]
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<DeployerError>();
        assert_send_sync::<ConfigErrors>();
        assert_send_sync::<ResolveError>();
        assert_send_sync::<DeploymentErrors>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _config: anyhow::Error = ConfigErrors::from(ConfigError::InvalidAddInType(
            "x".to_string(),
        ))
        .into();
        let _resolve: anyhow::Error = ResolveError::NoMatchingProduct.into();
        let _deploy: anyhow::Error = DeploymentErrors::new().into();
    }
}
