//! Log writer module
//!
//! Thread-safe sinks for log output. The console sink is always attached;
//! a file sink is added when a log file path is configured. Every record
//! is written to all attached sinks.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// A single log sink
enum LogSink {
    /// stdout for regular records, stderr for warnings and errors
    Console,
    /// Appending file handle
    File(Mutex<File>),
}

/// Thread-safe multi-sink log writer
pub struct LogWriter {
    sinks: Vec<LogSink>,
}

impl LogWriter {
    fn new(log_file: Option<&str>) -> io::Result<Self> {
        let mut sinks = vec![LogSink::Console];
        if let Some(path) = log_file {
            sinks.push(LogSink::File(Mutex::new(open_log_file(path)?)));
        }
        Ok(Self { sinks })
    }

    /// Write one record to every sink
    pub fn write_line(&self, message: &str, is_error: bool) {
        for sink in &self.sinks {
            match sink {
                LogSink::Console => {
                    if is_error {
                        eprintln!("{message}");
                    } else {
                        println!("{message}");
                    }
                }
                LogSink::File(file) => {
                    if let Ok(mut f) = file.lock() {
                        let _ = writeln!(f, "{message}");
                    }
                }
            }
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if the log file cannot be opened.
pub fn init(log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, `None` before `init()`
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
