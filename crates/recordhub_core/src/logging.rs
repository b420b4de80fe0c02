//! Logging bootstrap for the records core.
//!
//! # Responsibility
//! - Start the size-rotated file logger exactly once per process.
//! - Fall back to stderr when no log directory is configured, so repository
//!   diagnostics are never dropped silently.
//! - Capture panics into the log with a sanitized payload.
//!
//! # Invariants
//! - Re-initializing with the same level and sink is a no-op.
//! - Re-initializing with a different level or sink is rejected.
//! - The stderr sink never logs below `warn`; command output stays readable.
//! - Initialization never panics.
//! - Events are single-line `event=... module=... status=...` records and
//!   never carry passwords or digests.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "recordhub";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    sink: LogSink,
    _logger: LoggerHandle,
}

/// Destination of log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Size-rotated files under an absolute directory.
    Directory(PathBuf),
    Stderr,
}

impl LogSink {
    /// Files when the configuration names a directory, stderr otherwise.
    pub fn from_config(config: &CoreConfig) -> Self {
        match &config.log_dir {
            Some(dir) => Self::Directory(dir.clone()),
            None => Self::Stderr,
        }
    }
}

impl Display for LogSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoggingError {
    #[error("{0}")]
    InvalidLevel(String),
    #[error("log directory must be an absolute path, got `{0}`")]
    RelativeDir(PathBuf),
    #[error("logging already initialized with {field} `{active}`; refusing to switch to `{requested}`")]
    Reconfigure {
        field: &'static str,
        active: String,
        requested: String,
    },
    #[error("failed to start logger on `{sink}`: {message}")]
    Backend { sink: String, message: String },
}

/// Starts file logging with `level` under `log_dir`.
///
/// # Errors
/// - Unsupported level names.
/// - Relative `log_dir`, or a directory that cannot be created.
/// - A second call with a different level or directory.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = normalize_level(level).map_err(LoggingError::InvalidLevel)?;
    let log_dir = log_dir.as_ref();
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
    }

    init_sink(level, LogSink::Directory(log_dir.to_path_buf()))
}

/// Starts stderr logging at `level`, clamped to `warn` or stricter.
///
/// # Errors
/// - Unsupported level names.
/// - A second call with a different level, or after file logging started.
pub fn init_stderr_logging(level: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level).map_err(LoggingError::InvalidLevel)?;
    init_sink(stderr_level(level), LogSink::Stderr)
}

/// Starts logging on the sink the configuration selects.
pub fn init_from_config(config: &CoreConfig) -> Result<LogSink, LoggingError> {
    let sink = LogSink::from_config(config);
    match &sink {
        LogSink::Directory(dir) => init_logging(config.log_level, dir)?,
        LogSink::Stderr => init_stderr_logging(config.log_level)?,
    }
    Ok(sink)
}

fn init_sink(level: &'static str, sink: LogSink) -> Result<(), LoggingError> {
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &sink))?;

    if state.sink != sink {
        return Err(LoggingError::Reconfigure {
            field: "sink",
            active: state.sink.to_string(),
            requested: sink.to_string(),
        });
    }
    if state.level != level {
        return Err(LoggingError::Reconfigure {
            field: "level",
            active: state.level.to_string(),
            requested: level.to_string(),
        });
    }
    Ok(())
}

/// Returns `(level, sink)` when logging is active.
pub fn logging_status() -> Option<(&'static str, LogSink)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.sink.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

/// The stricter of `level` and `warn`.
fn stderr_level(level: &'static str) -> &'static str {
    let requested = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Warn);
    if requested > LevelFilter::Warn {
        "warn"
    } else {
        level
    }
}

fn start_logger(level: &'static str, sink: &LogSink) -> Result<LoggingState, LoggingError> {
    let backend_error = |message: String| LoggingError::Backend {
        sink: sink.to_string(),
        message,
    };

    let logger = Logger::try_with_str(level)
        .map_err(|err| LoggingError::InvalidLevel(err.to_string()))?;
    let logger = match sink {
        LogSink::Directory(log_dir) => {
            std::fs::create_dir_all(log_dir).map_err(|err| backend_error(err.to_string()))?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(log_dir)
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        LogSink::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };
    let logger = logger
        .start()
        .map_err(|err| backend_error(err.to_string()))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} version={} level={} sink={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level,
        sink
    );

    Ok(LoggingState {
        level,
        sink: sink.clone(),
        _logger: logger,
    })
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
