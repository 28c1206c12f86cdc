use std::env;
use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const LEVEL_ENV_VAR: &str = "SCHED_LOG";

/// Diagnostics on stderr. Scheduler events have their own log files.
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        let _ = writeln!(std::io::stderr().lock(), "[{}] {}", tag, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs the stderr logger, honouring `SCHED_LOG` (e.g. `debug`, `warn`, `off`).
pub fn init() -> Result<(), SetLoggerError> {
    let level = level_from(env::var(LEVEL_ENV_VAR).ok().as_deref());

    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_env_value() {
        assert_eq!(level_from(None), LevelFilter::Info);
        assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(level_from(Some("off")), LevelFilter::Off);
        assert_eq!(level_from(Some("chatty")), LevelFilter::Info);
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = StderrLogger { level: LevelFilter::Warn };
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();

        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }
}
