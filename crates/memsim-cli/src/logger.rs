use std::fmt;

use ansi_term::{Color, WithFg};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Logger printing `LEVEL [target] message` lines to stderr.
struct TermLogger {
    color: bool,
}

impl log::Log for TermLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "{} [{}] {}",
            LevelFormat {
                level: record.level(),
                color: self.color,
            },
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

pub fn init(max_level: LevelFilter, color: bool) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(TermLogger { color }))?;
    log::set_max_level(max_level);
    Ok(())
}

struct LevelFormat {
    level: Level,
    color: bool,
}

impl fmt::Display for LevelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.level {
            Level::Trace => Color::Magenta,
            Level::Debug => Color::Blue,
            Level::Info => Color::Green,
            Level::Warn => Color::Yellow,
            Level::Error => Color::Red,
        };
        let msg = match self.level {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => " INFO",
            Level::Warn => " WARN",
            Level::Error => "ERROR",
        };
        write!(f, "{}", WithFg::new(color, msg).enabled(self.color))
    }
}
