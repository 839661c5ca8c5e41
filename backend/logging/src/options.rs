//! Logger options and the modifiers that set them.
//!
//! A [`LoggerOptions`] starts from the documented defaults and is mutated by a
//! sequence of [`LoggerOption`]s, applied in order. Each modifier overwrites one
//! field, so the last modifier touching a field wins.

use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_LEVEL: Level = Level::Info;
pub const DEFAULT_ADD_SOURCE: bool = true;
pub const DEFAULT_IS_JSON: bool = true;
pub const DEFAULT_SET_FILE: bool = false;
pub const DEFAULT_SET_DEFAULT: bool = true;

/// Rotated file descriptor used when file duplication is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFile {
    /// Path of the active log file. Created if absent, appended if present.
    #[serde(default)]
    pub filename: PathBuf,
    /// Megabytes written before the file is rotated.
    #[serde(default)]
    pub max_size: u64,
    /// Rotated backups to retain.
    #[serde(default)]
    pub max_backups: usize,
    /// Days a rotated backup is kept.
    #[serde(default)]
    pub max_age: u32,
}

impl LogFile {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    pub fn max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    pub fn max_backups(mut self, backups: usize) -> Self {
        self.max_backups = backups;
        self
    }

    pub fn max_age(mut self, days: u32) -> Self {
        self.max_age = days;
        self
    }
}

/// Fully resolved logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    pub level: Level,
    pub add_source: bool,
    pub is_json: bool,
    pub set_file: bool,
    pub log_file: LogFile,
    pub set_default: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            add_source: DEFAULT_ADD_SOURCE,
            is_json: DEFAULT_IS_JSON,
            set_file: DEFAULT_SET_FILE,
            log_file: LogFile::default(),
            set_default: DEFAULT_SET_DEFAULT,
        }
    }
}

impl LoggerOptions {
    /// Apply `options` in order on top of the current values.
    pub fn apply<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        for option in options {
            option.apply(&mut self);
        }
        self
    }
}

/// A single configuration modifier.
pub struct LoggerOption(Box<dyn FnOnce(&mut LoggerOptions) + Send>);

impl LoggerOption {
    fn new(f: impl FnOnce(&mut LoggerOptions) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn apply(self, options: &mut LoggerOptions) {
        (self.0)(options)
    }
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoggerOption")
    }
}

/// Sets the minimum level from its name (debug, info, warn, error).
/// Unrecognised names select info.
pub fn with_level(level: &str) -> LoggerOption {
    let level = Level::parse_or_default(level);
    LoggerOption::new(move |o| o.level = level)
}

/// Attaches the call site's file and line to every record.
pub fn with_add_source(add_source: bool) -> LoggerOption {
    LoggerOption::new(move |o| o.add_source = add_source)
}

/// Selects JSON records instead of text lines.
pub fn with_is_json(is_json: bool) -> LoggerOption {
    LoggerOption::new(move |o| o.is_json = is_json)
}

/// Duplicates output to a rotated file. Flag and descriptor are set together.
pub fn with_set_file(set_file: bool, log_file: LogFile) -> LoggerOption {
    LoggerOption::new(move |o| {
        o.set_file = set_file;
        o.log_file = log_file;
    })
}

/// Installs the constructed logger as the process-wide default.
pub fn with_set_default(set_default: bool) -> LoggerOption {
    LoggerOption::new(move |o| o.set_default = set_default)
}
