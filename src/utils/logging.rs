// Sat Oct 17 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    pub fn init_logger(level: LevelFilter, use_color: bool) {
        let logger = Box::new(ColoredLogger::new(level, use_color));
        log::set_boxed_logger(logger).ok();
        log::set_max_level(level);
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ColoredLogger {
    fn new(level: LevelFilter, use_color: bool) -> Self {
        Self { level, use_color }
    }

    fn format_level(&self, level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if self.use_color {
            eprintln!(
                "{} {} {}",
                self.format_level(record.level()),
                format!("[{}]", record.target()).dimmed(),
                record.args()
            );
        } else {
            eprintln!("{:5} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::trace!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("[TIMER] {} took {:.2}ms", self.name, self.elapsed_ms());
    }
}

/// An explicit level name wins over the `-v` count.
pub fn init_logger(verbosity: u8, level: Option<&str>, use_color: bool) {
    LoggingUtils::init_logger(resolve_level(verbosity, level), use_color);
}

fn resolve_level(verbosity: u8, level: Option<&str>) -> LevelFilter {
    match level {
        Some(name) => LoggingUtils::level_from_str(name),
        None => LoggingUtils::level_from_verbosity(verbosity),
    }
}

pub fn init_from_env() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(LoggingUtils::level_from_verbosity(0), LevelFilter::Info);
        assert_eq!(LoggingUtils::level_from_verbosity(1), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_level_name_overrides_verbosity() {
        assert_eq!(resolve_level(2, Some("error")), LevelFilter::Error);
        assert_eq!(resolve_level(2, None), LevelFilter::Trace);
        assert_eq!(resolve_level(0, None), LevelFilter::Info);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("WARNING"), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_str("off"), LevelFilter::Off);
        assert_eq!(LoggingUtils::level_from_str("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn test_scoped_timer_measures() {
        let timer = ScopedTimer::new("test");
        assert!(timer.elapsed_ms() >= 0.0);
    }
}
