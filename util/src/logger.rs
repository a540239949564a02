//! Session logging
//!
//! Every record goes to both stdout and the session's log file, stamped with
//! the seconds elapsed since the session started:
//!
//! ```text
//! [  2.051342 INF] Move complete after 0.542 s (left 6.01 in, right 6.03 in)
//! [  2.051401 DBG] motion_lib::actuator: Drive motors stopped
//! ```
//!
//! Debug and trace records also carry their target, so that the module which
//! emitted them can be found.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use colored::{ColoredString, Colorize};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Start logging to stdout and the session log file.
///
/// `target_levels` lowers (or raises) the level of individual targets below
/// `min_level`. The motion executable uses it to hold the poll loops at
/// `DEBUG` while the rest of the library logs at `TRACE`, since a trace per
/// poll swamps the log of a full course.
///
/// `min_level` must be `INFO` or more verbose, a course log without the
/// per-manoeuvre `INFO` records is not useful.
///
/// The global logger can only be set once, a second call returns
/// `FernInitError`.
pub fn logger_init(
    min_level: self::LevelFilter,
    target_levels: &[(&'static str, LevelFilter)],
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let dispatch = target_levels.iter().fold(
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}",
                    format_line(
                        session::get_elapsed_seconds(),
                        record.level(),
                        record.target(),
                        message
                    )
                ))
            })
            .level(min_level),
        |d, (target, level)| d.level_for(*target, *level)
    );

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (target, level) in target_levels {
        info!("    Log level of {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format one log line.
fn format_line<M: fmt::Display>(
    elapsed_s: f64,
    level: log::Level,
    target: &str,
    message: M
) -> String {
    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, level_to_str(level), target, message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, level_to_str(level), message)
    }
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}
