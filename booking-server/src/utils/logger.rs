//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments
//! Features:
//! - Daily rotating application logs (last 14 files kept)
//! - Permanent audit logs (target `audit`, never deleted)
//! - Permanent security logs (target `security`, never deleted)

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, filter_fn};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Application log files kept on disk
const APP_LOG_RETENTION: usize = 14;

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins when set
/// * `json_format` - Whether to use JSON format (true for production, false for development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
///
/// # Examples
/// ```no_run
/// use booking_server::utils::logger::init_logger_with_file;
///
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None).unwrap();
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let max_level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);

    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Console layer
    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed()
    };
    layers.push(console_layer);

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);

        // Application logs: everything except audit / security
        let app_log = rolling_appender(log_dir, "app", Some(APP_LOG_RETENTION))?;
        layers.push(file_layer(app_log, json_format, move |target, level| {
            target != "audit" && target != "security" && level <= max_level
        }));

        let audit_log = rolling_appender(log_dir, "audit", None)?;
        layers.push(file_layer(audit_log, json_format, |target, _| {
            target == "audit"
        }));

        let security_log = rolling_appender(log_dir, "security", None)?;
        layers.push(file_layer(security_log, json_format, |target, _| {
            target == "security"
        }));
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// `<log_dir>/<kind>/<kind>.YYYY-MM-DD.log`
fn rolling_appender(
    log_dir: &Path,
    kind: &str,
    max_files: Option<usize>,
) -> anyhow::Result<RollingFileAppender> {
    let dir = log_dir.join(kind);
    fs::create_dir_all(&dir)?;

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(kind)
        .filename_suffix("log");
    if let Some(max) = max_files {
        builder = builder.max_log_files(max);
    }
    Ok(builder.build(dir)?)
}

fn file_layer<F>(appender: RollingFileAppender, json_format: bool, accept: F) -> BoxedLayer
where
    F: Fn(&str, LevelFilter) -> bool + Send + Sync + 'static,
{
    let filter = filter_fn(move |meta| accept(meta.target(), LevelFilter::from_level(*meta.level())));
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(appender)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(appender)
            .with_filter(filter)
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_appender_creates_kind_directory() {
        let tmp = tempfile::tempdir().unwrap();
        rolling_appender(tmp.path(), "audit", None).unwrap();
        assert!(tmp.path().join("audit").is_dir());
    }
}
