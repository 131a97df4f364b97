//! Tracing subscriber: console formatter, log file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::{Event, Level};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::types::RESET;
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target for stage header events.
pub(super) const STAGE_TARGET: &str = "deployer::stage";

/// Target for dry-run action events.
pub(super) const DRY_RUN_TARGET: &str = "deployer::dry_run";

/// How an event is rendered, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl EventKind {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text line for the log file.
    fn file_line(self, ts: &str, msg: &str) -> String {
        match self {
            Self::Stage => format!("[{ts}] ==> {msg}"),
            Self::DryRun => format!("[{ts}]     [dry run] {msg}"),
            Self::Error => format!("[{ts}]     [error] {msg}"),
            Self::Warn => format!("[{ts}]     [warn] {msg}"),
            Self::Info => format!("[{ts}]     {msg}"),
            Self::Debug => format!("[{ts}]     [debug] {msg}"),
        }
    }

    /// Colored line for the console.
    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>{RESET} \x1b[1m{msg}{RESET}"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]{RESET} {msg}"),
            Self::Error => format!("\x1b[31mERROR{RESET} {msg}"),
            Self::Warn => format!("\x1b[33mWARN{RESET}  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}{RESET}"),
        }
    }
}

/// Collects the `message` field of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn message_of(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event to the command's log file, timestamped and with ANSI
/// codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// Returns `None` when the file cannot be created; logging then continues
    /// on the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("DEPLOYER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\nRevit add-in deployer {version} {}\n{rule}\n",
            format_utc_datetime()
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let msg = strip_ansi(&message_of(event));
        let line = EventKind::of(event).file_line(&format_utc_time(), &msg);
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console event format: bare colored messages, no timestamps or targets.
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", EventKind::of(event).console_line(&message_of(event)))
    }
}

/// Install the global subscriber: console output on standard output (debug
/// only when `verbose`) plus the log file for `command` at debug level.
///
/// Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(std::io::stdout)
        .with_filter(console_level);
    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
