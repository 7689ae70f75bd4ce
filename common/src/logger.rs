//! Terminal and file logging built on `fern`.

use std::{fs, path::Path};

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

pub const DEFAULT_LOGS_DATETIME_FORMAT: &str = "[%Y-%m-%d] (%H:%M:%S%.3f)";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Cannot create the logs directory {0}: {1}")]
    LogsDirectory(String, std::io::Error),
    #[error("Cannot open the log file: {0}")]
    LogFile(#[from] std::io::Error),
    #[error("A logger was already installed: {0}")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Where and how log records are written.
#[derive(Debug, Clone)]
pub struct LoggerConfig<'a> {
    pub level: LogLevel,
    pub disable_colors: bool,
    // None keeps logs on the terminal only
    pub file: Option<LogFileConfig<'a>>,
    pub logs_datetime_format: &'a str,
}

#[derive(Debug, Clone)]
pub struct LogFileConfig<'a> {
    pub dir_path: &'a str,
    pub filename_log: &'a str,
    pub level: LogLevel,
}

impl Default for LoggerConfig<'_> {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            disable_colors: false,
            file: None,
            logs_datetime_format: DEFAULT_LOGS_DATETIME_FORMAT,
        }
    }
}

fn build_dispatch(config: &LoggerConfig<'_>) -> Result<fern::Dispatch, LoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    let disable_colors = config.disable_colors;
    let datetime_format = config.logs_datetime_format.to_owned();
    let console = fern::Dispatch::new()
        .level(config.level.into())
        .format(move |out, message, record| {
            let now = chrono::Local::now().format(&datetime_format);
            if disable_colors {
                out.finish(format_args!(
                    "{} {} {} > {}",
                    now,
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "{} {} {} > {}",
                    now,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            }
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new().chain(console);

    if let Some(file) = &config.file {
        let dir = Path::new(file.dir_path);
        fs::create_dir_all(dir)
            .map_err(|e| LoggerError::LogsDirectory(file.dir_path.to_owned(), e))?;

        let datetime_format = config.logs_datetime_format.to_owned();
        let file_dispatch = fern::Dispatch::new()
            .level(file.level.into())
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "{} {} {} > {}",
                    chrono::Local::now().format(&datetime_format),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(dir.join(file.filename_log))?);

        dispatch = dispatch.chain(file_dispatch);
    }

    Ok(dispatch)
}

// Install the global logger. Can only succeed once per process.
pub fn setup_logger(config: &LoggerConfig<'_>) -> Result<(), LoggerError> {
    build_dispatch(config)?.apply()?;
    Ok(())
}
