//! Pool diagnostics on stderr
//!
//! Each line is written under the stderr lock, so lines from concurrent
//! workers never interleave. What the pool logs at each level:
//!
//! | Level | Events |
//! |---|---|
//! | error | config rejected, spawn failure and rollback, panicking callback |
//! | warn  | `add_work` rejected (queue full or not started), shutdown of a stopped pool |
//! | info  | pool running, stopping, stopped, queued items discarded |
//! | debug | worker start/exit with thread ids |
//! | trace | every queued record |
//!
//! `RINGPOOL_LOG_LEVEL` (name or 0-5, default warn) and
//! `RINGPOOL_FLUSH_EPRINT` are read on first use; `set_log_level` and
//! `set_flush_enabled` override them.
//!
//! `kfatal!` ignores the level, flushes, and aborts. It is kept for
//! counters that can no longer be trusted.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a level name or digit; `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "1" => Some(LogLevel::Error),
            "warn" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Read the `RINGPOOL_*` log settings. Runs at most once.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    if let Ok(val) = std::env::var("RINGPOOL_FLUSH_EPRINT") {
        let flush = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        FLUSH_ENABLED.store(flush, Ordering::Relaxed);
    }

    if let Ok(val) = std::env::var("RINGPOOL_LOG_LEVEL") {
        let level = LogLevel::parse(&val).unwrap_or(LogLevel::Warn);
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
pub fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Wins over `RINGPOOL_LOG_LEVEL`, even if called before the first log.
pub fn set_log_level(level: LogLevel) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn set_flush_enabled(enabled: bool) {
    init();
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= log_level() as u8
}

#[doc(hidden)]
pub fn _kprint_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _kprintln_impl(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _klog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} ", level.prefix());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _kfatal_impl(file: &str, line: u32, args: std::fmt::Arguments<'_>) -> ! {
    {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        let _ = write!(handle, "[FATAL] [{}:{}] ", file, line);
        let _ = handle.write_fmt(args);
        let _ = handle.write_all(b"\n");
        let _ = handle.flush();
    }
    std::process::abort()
}

/// Unleveled write to stderr
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        $crate::kprint::_kprint_impl(format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kprintln {
    () => {{
        $crate::kprint::_kprintln_impl(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::kprint::_kprintln_impl(format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::Error,
            format_args!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::Warn,
            format_args!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::Info,
            format_args!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::Debug,
            format_args!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::Trace,
            format_args!($($arg)*)
        );
    }};
}

/// Evaluates to `!`, so it can end a `match` arm.
#[macro_export]
macro_rules! kfatal {
    ($($arg:tt)*) => {
        $crate::kprint::_kfatal_impl(file!(), line!(), format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_level_from_u8() {
        assert_eq!(LogLevel::from_u8(0), LogLevel::Off);
        assert_eq!(LogLevel::from_u8(1), LogLevel::Error);
        assert_eq!(LogLevel::from_u8(4), LogLevel::Debug);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Trace);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" 2 "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_set_log_level_gates_levels() {
        set_log_level(LogLevel::Warn);
        assert!(level_enabled(LogLevel::Error));
        assert!(level_enabled(LogLevel::Warn));
        assert!(!level_enabled(LogLevel::Info));
        set_log_level(LogLevel::Off);
        assert!(!level_enabled(LogLevel::Error));
    }

    #[test]
    fn test_macros_compile() {
        set_log_level(LogLevel::Off);

        kprint!("");
        kerror!("error {}", "msg");
        kwarn!("warn");
        kinfo!("info");
        kdebug!("debug");
        ktrace!("trace");
    }
}
