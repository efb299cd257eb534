use crate::error::VendorMatchError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file written inside the configured log directory
pub const LOG_FILE_NAME: &str = "vendormatch.log";

/// HTTP client internals are only interesting when they misbehave
const QUIET_TARGETS: &[&str] = &["hyper=warn", "reqwest=warn"];

/// Server logging: console plus an append-only `vendormatch.log`
///
/// `RUST_LOG`, when set, replaces the directives derived from `log_level`.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), VendorMatchError> {
    let (log_file, log_file_path) = open_log_file(log_dir)?;
    let filter = build_filter(log_level)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter.clone());

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VendorMatchError::config(format!("Failed to install logger: {}", e)))?;

    tracing::info!(
        "Server logging to console and {} at level {}",
        log_file_path.display(),
        log_level
    );

    Ok(())
}

/// CLI logging: stderr only, so `qualify` can print clean JSON on stdout
pub fn setup_console_logging(log_level: &str) -> Result<(), VendorMatchError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(build_filter(log_level)?)
        .try_init()
        .map_err(|e| VendorMatchError::config(format!("Failed to install logger: {}", e)))?;

    Ok(())
}

/// Create `log_dir` if needed and open the log file for appending
pub fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), VendorMatchError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        VendorMatchError::config(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let path = log_dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            VendorMatchError::config(format!("Failed to open log file {}: {}", path.display(), e))
        })?;

    Ok((file, path))
}

/// Filter directives for a level, with noisy HTTP client crates held at warn
pub fn filter_directives(level: Level) -> String {
    let mut directives = vec![level.as_str().to_ascii_lowercase()];
    directives.extend(QUIET_TARGETS.iter().map(|t| t.to_string()));
    directives.join(",")
}

fn build_filter(log_level: &str) -> Result<EnvFilter, VendorMatchError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = parse_log_level(log_level)?;
    EnvFilter::try_new(filter_directives(level))
        .map_err(|e| VendorMatchError::config(format!("Invalid log filter: {}", e)))
}

/// Parse a configured log level; "warning" is accepted for "warn"
pub fn parse_log_level(level: &str) -> Result<Level, VendorMatchError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => Ok(Level::WARN),
        other => other
            .parse::<Level>()
            .map_err(|_| VendorMatchError::config(format!("Unknown log level '{}'", level))),
    }
}
