use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Minimal stderr logger with colored levels.
pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    /// Install as the global logger. Warnings by default, more with each `-v`.
    pub fn setup(verbose: u8, quiet: bool) -> Result<(), SetLoggerError> {
        let level = match (quiet, verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Info,
            (false, _) => LevelFilter::Debug,
        };
        log::set_boxed_logger(Box::new(Logger { level }))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let module = record.module_path().unwrap_or_default();
        let line = format!("{}: {}", module, record.args());
        match record.level() {
            Level::Error => eprintln!("{}", line.red()),
            Level::Warn => eprintln!("{}", line.yellow().bold()),
            Level::Info => eprintln!("{}", line),
            _ => eprintln!("{}", line.dimmed()),
        }
    }

    fn flush(&self) {}
}
