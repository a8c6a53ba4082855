use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Target used for per-failure report events, emitted at `debug` so the
/// console stays quiet by default. When a report directory is configured they
/// are written to a rolling file.
pub const REPORT_TARGET: &str = "vet.report";

static REPORT_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Installs the global subscriber: console output on stderr filtered by
/// `RUST_LOG` (default `info`), plus a rolling report log when
/// `VET_REPORT_LOG_DIR` is set. Calling it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(console);

    match std::env::var("VET_REPORT_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let rotation =
                std::env::var("VET_REPORT_LOG_ROTATION").unwrap_or_else(|_| "daily".into());
            let writer = report_writer(Path::new(&dir), &rotation);
            let (nb, guard) = tracing_appender::non_blocking(writer);
            let _ = REPORT_GUARD.set(guard);
            let targets = Targets::new().with_target(REPORT_TARGET, tracing::Level::DEBUG);
            let report_layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(nb)
                .with_filter(targets);
            let _ = registry.with(report_layer).try_init();
            tracing::debug!(directory = %dir, %rotation, "report log enabled");
        }
        _ => {
            let _ = registry.try_init();
        }
    }
}

fn report_writer(dir: &Path, rotation: &str) -> RollingFileAppender {
    if std::fs::create_dir_all(dir).is_err() {
        tracing::warn!(directory = %dir.display(), "failed to create report log directory");
    }
    let prefix = "vet-report";
    match rotation.to_lowercase().as_str() {
        "hourly" => tracing_appender::rolling::hourly(dir, prefix),
        "minutely" => tracing_appender::rolling::minutely(dir, prefix),
        "never" => tracing_appender::rolling::never(dir, prefix),
        _ => tracing_appender::rolling::daily(dir, prefix),
    }
}
