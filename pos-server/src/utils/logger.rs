//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output (pretty in development, JSON in production)
//! - Daily rotating application logs when a log directory is configured
//! - Separate daily security log for events emitted with `target: "security"`

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a console-only logger at `info`
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file("info", false, None)
}

/// Initialize the logging system with optional daily rotating files
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"), overridden by `RUST_LOG`
/// * `json_format` - JSON console output (production)
/// * `log_dir` - Optional directory for file logging
///
/// # Examples
/// ```no_run
/// // Development setup (console only)
/// pos_server::init_logger_with_file("debug", false, None).unwrap();
///
/// // Production setup (console + file)
/// pos_server::init_logger_with_file("info", true, Some("./logs")).unwrap();
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    };

    let mut layers = vec![console_layer];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let security_log_dir = log_dir.join("security");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&security_log_dir)?;

        // Application logs exclude the security target
        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "pos-server");
        let app_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::sync::Mutex::new(app_log))
            .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                meta.target() != "security"
            }))
            .boxed();

        let security_log = RollingFileAppender::new(Rotation::DAILY, security_log_dir, "security");
        let security_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::sync::Mutex::new(security_log))
            .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                meta.target() == "security"
            }))
            .boxed();

        layers.push(app_layer);
        layers.push(security_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    Ok(())
}
