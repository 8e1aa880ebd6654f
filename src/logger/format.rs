//! Log format module
//!
//! Record format is a fixed text line:
//! `timestamp module=<module> level=<LEVEL>: <message>`
//!
//! Access log entries additionally support:
//! - `combined` (Apache/Nginx combined format)
//! - `json` (JSON structured logging)

use chrono::{DateTime, Local};

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a configured level name, defaulting to `Info` on unknown input
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Render one record in the fixed text format
pub fn format_record(module: &str, level: Level, message: &str) -> String {
    format_record_at(Local::now(), module, level, message)
}

fn format_record_at(
    time: DateTime<Local>,
    module: &str,
    level: Level,
    message: &str,
) -> String {
    format!(
        "{} module={module} level={}: {message}",
        time.format("%Y-%m-%d %H:%M:%S"),
        level.as_str()
    )
}

/// Access log entry containing the request/response information logged
/// after every dispatch
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address (ip:port)
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status: 200,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    /// Format the entry according to the configured format name
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "json" => self.format_json(),
            _ => self.format_plain(),
        }
    }

    /// Fixed record format with module `access`
    fn format_plain(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;
        format_record_at(
            self.time,
            "access",
            Level::Info,
            &format!(
                "{} {} {} {}b from {} ({seconds:.3}s)",
                self.method, self.path, self.status, self.body_bytes, self.remote_addr
            ),
        )
    }

    /// Apache/Nginx combined log format (no referer/user-agent collected,
    /// both columns render as `-`)
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {} \"-\" \"-\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}
