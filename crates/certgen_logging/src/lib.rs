#![deny(missing_docs)]
//! Shared logging utilities for the certgen workspace.
//!
//! This crate provides the `certgen_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Callers must depend
//! on `log` themselves since the macros expand to `log::*!` at the call site.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! certgen_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! certgen_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! certgen_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! certgen_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! certgen_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Parses a level name such as `"info"` or `"DEBUG"`.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.trim().parse().unwrap_or(log::LevelFilter::Info)
}

/// Environment variable that overrides the level picked by
/// [`initialize_for_tests`], e.g. `CERTGEN_TEST_LOG=trace`.
pub const TEST_LOG_ENV: &str = "CERTGEN_TEST_LOG";

/// Initializes a terminal logger for tests, at debug level unless
/// [`TEST_LOG_ENV`] names another.
///
/// No-op when a logger is already installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = std::env::var(TEST_LOG_ENV)
        .map(|name| parse_level(&name))
        .unwrap_or(log::LevelFilter::Debug);
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build();

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::parse_level;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    struct Capture(Mutex<Vec<(Level, String)>>);

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.0
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn parse_level_accepts_any_case_and_falls_back_to_info() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn macros_log_at_their_level() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);

        crate::certgen_trace!("tick {}", 1);
        crate::certgen_warn!("status failed");

        let seen = CAPTURE.0.lock().unwrap().clone();
        assert!(seen.contains(&(Level::Trace, "tick 1".to_string())));
        assert!(seen.contains(&(Level::Warn, "status failed".to_string())));
    }
}
