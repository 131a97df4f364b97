//! Step outcomes and the [`Log`] trait.

/// ANSI reset sequence closing every colored span.
pub(super) const RESET: &str = "\x1b[0m";

/// Outcome of one deployment step, shown in the run summary.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Step name (e.g., "Write add-in manifests").
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Counts or error detail.
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Ok,
    /// Step had nothing to act on (e.g., no resource file shipped).
    Skipped,
    /// Step ran in dry-run mode; no changes were applied.
    DryRun,
    /// At least one action in the step failed.
    Failed,
}

impl StepStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 4] = [Self::Ok, Self::Skipped, Self::DryRun, Self::Failed];

    /// Summary icon and ANSI color for this status.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }

    /// Label used in the summary totals line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Logging backend used by the deployment code.
///
/// [`Logger`](super::Logger) is the production implementation; tests supply
/// their own to capture output.
pub trait Log {
    /// Log a stage header.
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (console shows it only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning.
    fn warn(&self, msg: &str);
    /// Log an error.
    fn error(&self, msg: &str);
    /// Log an action that was skipped because of `--dry-run`.
    fn dry_run(&self, msg: &str);
    /// Record a step outcome for the summary.
    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>);
}
