//! Console and log-file output built on `tracing`.
//!
//! Deployment code talks to the [`Log`] trait; [`Logger`] implements it by
//! emitting `tracing` events, which [`init_subscriber`] routes to standard
//! output and to a per-command log file in the cache directory.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, StepEntry, StepStatus};

/// Serializes `XDG_CACHE_HOME` changes across parallel test threads.
#[cfg(test)]
static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run `f` with `XDG_CACHE_HOME` pointing at `dir`, so log paths resolve
/// inside it.
#[cfg(test)]
#[allow(unsafe_code)]
pub(crate) fn with_cache_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let _lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before the lock is released.
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", dir);
    }
    let value = f();
    // SAFETY: Protected by TEST_ENV_MUTEX.
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    value
}

/// A [`Logger`] whose events reach a log file in a fresh temporary cache
/// directory through a thread-local subscriber.
///
/// Keep the returned guard alive for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let cache = tempfile::tempdir().expect("create temp cache dir");
    let (layer, log) = with_cache_home(cache.path(), || {
        (subscriber::FileLayer::new("test"), Logger::new("test"))
    });
    let layer = layer.expect("create log file layer");
    let dispatch = tracing::Dispatch::new(
        tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)),
    );
    let guard = tracing::dispatcher::set_default(&dispatch);
    (log, cache, guard)
}
