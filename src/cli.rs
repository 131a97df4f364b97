//! Command-line interface.
use clap::Parser;
use std::path::PathBuf;

use crate::deploy::Action;
use crate::error::UsageError;

/// Top-level CLI entry point for the Revit add-in deployer.
///
/// Without positional arguments the Revit add-in folder is opened in the
/// platform file browser.
#[derive(Parser, Debug)]
#[command(
    name = "revit-addin-deployer",
    about = "Install or remove Revit add-in manifests",
    version
)]
pub struct Cli {
    /// Action to perform: `setup` or `uninst`
    pub action: Option<String>,

    /// Add-in configuration file (relative paths resolve against the base directory)
    pub config: Option<PathBuf>,

    /// Arguments beyond `<action> <config>`; rejected with a usage error
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Options shared by every invocation
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared by every invocation.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override the installer base directory (default: directory of the executable)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Read installed Revit products from a TOML inventory instead of the registry
    #[arg(long, value_name = "FILE")]
    pub products: Option<PathBuf>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Open the add-in folder in the file browser.
    Browse,
    /// Install or remove the add-in described by `config`.
    Deploy {
        /// Install or uninstall.
        action: Action,
        /// Configuration path as given on the command line.
        config: PathBuf,
    },
}

impl Cli {
    /// Interpret the positional arguments.
    ///
    /// The action is validated before the configuration path is looked at.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] for extra arguments, an unknown action, or an
    /// action without a configuration path.
    pub fn invocation(&self) -> Result<Invocation, UsageError> {
        if let Some(extra) = self.extra.first() {
            return Err(UsageError::UnexpectedArgument(extra.clone()));
        }
        let Some(name) = &self.action else {
            return Ok(Invocation::Browse);
        };
        let action: Action = name.parse()?;
        let config = self
            .config
            .clone()
            .ok_or_else(|| UsageError::MissingConfigPath(name.clone()))?;
        Ok(Invocation::Deploy { action, config })
    }

    /// Name of the log file for this invocation.
    #[must_use]
    pub fn log_name(&self) -> &'static str {
        match self.invocation() {
            Ok(Invocation::Deploy {
                action: Action::Install,
                ..
            }) => "install",
            Ok(Invocation::Deploy {
                action: Action::Uninstall,
                ..
            }) => "uninstall",
            Ok(Invocation::Browse) => "browse",
            Err(_) => "usage",
        }
    }
}
