//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, Level};

use crate::config::Config;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Minimum level that is written, set once from configuration
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    MIN_LEVEL.store(Level::parse(&config.logging.level) as u8, Ordering::Relaxed);
    writer::init(config.logging.file.as_deref())
}

fn enabled(level: Level) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Write a leveled record through the configured sinks
fn write_record(module: &str, level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let line = format::format_record(module, level, message);
    let is_error = level >= Level::Warn;
    match writer::get() {
        Some(w) => w.write_line(&line, is_error),
        // Before init (or if init failed) fall back to the console
        None if is_error => eprintln!("{line}"),
        None => println!("{line}"),
    }
}

pub fn log_debug(module: &str, message: &str) {
    write_record(module, Level::Debug, message);
}

pub fn log_info(module: &str, message: &str) {
    write_record(module, Level::Info, message);
}

pub fn log_warning(message: &str) {
    write_record("server", Level::Warn, message);
}

pub fn log_error(message: &str) {
    write_record("server", Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("server", "======================================");
    log_info("server", "Demo monitoring app started");
    log_info("server", &format!("Listening on: http://{addr}"));
    log_info("server", &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info("server", &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.file {
        log_info("server", &format!("Log file: {path}"));
    }
    log_info(
        "server",
        "Endpoints: / /api/data /api/slow /health /metrics",
    );
    log_info("server", "======================================");
}

pub fn log_shutdown() {
    log_info("server", "Shutdown signal received, stopping accept loop");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug("server", &format!("Accepted connection from {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log an unmatched route with the offending path and client address
pub fn log_not_found(path: &str, remote_addr: &SocketAddr) {
    write_record(
        "handler",
        Level::Warn,
        &format!("No route for {path} (client {remote_addr})"),
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    if !enabled(Level::Info) {
        return;
    }
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_line(&line, false),
        None => println!("{line}"),
    }
}
