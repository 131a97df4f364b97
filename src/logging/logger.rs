//! The [`Logger`] facade over `tracing`.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, RESET, StepEntry, StepStatus};
use super::utils::log_file_path;

/// Implement the message methods of [`Log`] by calling the inherent method of
/// the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Console and file logger that also collects step outcomes for the final
/// summary.
///
/// Messages become `tracing` events; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) prints them and appends them to
/// `<cache>/revit-addin-deployer/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`. The log file path is only remembered
    /// for the summary; the file itself belongs to the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    #[cfg(test)]
    pub(crate) const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Step outcomes recorded so far, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action suppressed by `--dry-run`.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a step outcome for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Print one line per recorded step, the per-status totals, and the log
    /// file location. Prints nothing when no step was recorded.
    pub fn print_summary(&self) {
        let steps = self.steps();
        if steps.is_empty() {
            return;
        }

        self.stage("Summary");
        for step in &steps {
            let (icon, color) = step.status.marker();
            let detail = step
                .message
                .as_deref()
                .map_or_else(String::new, |m| format!(" ({m})"));
            self.info(&format!("{color}{icon} {}{detail}{RESET}", step.name));
        }

        let totals = StepStatus::ALL
            .map(|status| {
                let count = steps.iter().filter(|s| s.status == status).count();
                let (_, color) = status.marker();
                format!("{color}{count} {}{RESET}", status.label())
            })
            .join(", ");
        self.info(&format!("{} steps: {totals}", steps.len()));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}{RESET}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        self.record_step(name, status, message);
    }
}
