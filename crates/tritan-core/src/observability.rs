//! Process-wide log setup for binaries embedding the editor.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_FILE: &str = "tritan.logs.jsonl";

/// Destination of log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Compact human-readable lines on stderr; stdout stays free for command output.
    Console,
    /// One JSON object per line, appended to the file.
    JsonFile(PathBuf),
}

/// Resolved logging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub enabled: bool,
    /// `EnvFilter` directive string.
    pub filter: String,
    pub sink: LogSink,
}

impl LogSettings {
    /// Reads:
    /// - `TRITAN_OBSERVABILITY_ENABLED`: on/off flag, default on.
    /// - `TRITAN_LOG_LEVEL`, then `RUST_LOG`: the first one holding a valid filter wins;
    ///   `default_level` otherwise.
    /// - `TRITAN_JSON_LOG_PATH`: switches to the JSONL file sink.
    pub fn from_env(default_level: &str) -> Self {
        Self::from_lookup(default_level, |key| std::env::var(key).ok())
    }

    fn from_lookup(default_level: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let enabled = non_blank("TRITAN_OBSERVABILITY_ENABLED")
            .and_then(|v| parse_bool_env(&v))
            .unwrap_or(true);
        let filter = ["TRITAN_LOG_LEVEL", "RUST_LOG"]
            .into_iter()
            .filter_map(|key| non_blank(key))
            .find(|directive| EnvFilter::try_new(directive).is_ok())
            .unwrap_or_else(|| default_level.to_string());
        let sink = match non_blank("TRITAN_JSON_LOG_PATH") {
            Some(path) => LogSink::JsonFile(PathBuf::from(path.trim())),
            None => LogSink::Console,
        };
        Self {
            enabled,
            filter,
            sink,
        }
    }
}

fn parse_bool_env(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Directory and file name for the appender. A bare file name lands in the working directory.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE)
        .to_string();
    (dir, file_name)
}

/// Initialize logging from the environment once per process. Later calls are no-ops.
pub fn init_observability(default_level: &str) {
    init_with(LogSettings::from_env(default_level));
}

/// Initialize logging with explicit settings. Only the first call in a process takes effect.
pub fn init_with(settings: LogSettings) {
    INIT.get_or_init(|| {
        if !settings.enabled {
            return;
        }
        let filter =
            EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"));
        match &settings.sink {
            LogSink::JsonFile(path) => {
                let (dir, file_name) = split_log_path(path);
                let _ = std::fs::create_dir_all(&dir);
                let writer = tracing_appender::rolling::never(dir, file_name);
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(false)
                    .with_writer(writer);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(json_layer)
                    .try_init();
            }
            LogSink::Console => {
                let console_layer = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(console_layer)
                    .try_init();
            }
        }
    });
}
