use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("cannot open log file: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    SetLogger(#[from] SetLoggerError),
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn format_record(record: &Record) -> String {
    format!("{} {} - {}", timestamp(), record.level(), record.args())
}

/// Writes to stderr, so stdout stays free for the run summary.
struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

struct FileLogger {
    level: LevelFilter,
    handle: Mutex<File>,
}

impl FileLogger {
    pub fn new(path: &str, level: LevelFilter) -> Result<FileLogger, io::Error> {
        let file = File::create(path)?;

        Ok(FileLogger {
            level,
            handle: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut handle) = self.handle.lock() {
            // A logger has nowhere to report its own write failures.
            let _ = writeln!(handle, "{}", format_record(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut handle) = self.handle.lock() {
            let _ = handle.flush();
        }
    }
}

/// Installs the process-wide logger.
///
/// With `log_path` set, records go to that file (truncated on start);
/// otherwise they go to stderr. Can only succeed once per process.
///
/// # Examples
///
/// init_logger(LevelFilter::Info, None)?;
///
pub fn init_logger(level: LevelFilter, log_path: Option<&str>) -> Result<(), LoggerError> {
    let logger: Box<dyn Log> = match log_path {
        Some(path) => Box::new(FileLogger::new(path, level)?),
        None => Box::new(ConsoleLogger { level }),
    };

    log::set_boxed_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Maps the verbosity flag onto a level filter.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        Level::Debug.to_level_filter()
    } else {
        LevelFilter::Info
    }
}
