//! Structured logger factory.
//!
//! Builds a `tracing`-backed [`Logger`] from composable options: minimum level,
//! text or JSON records, call-site capture, an optional size-rotated file copy
//! of stdout, and whether the result becomes the process-wide default.
//!
//! ```no_run
//! use logkit::{Attr, LogFile, new_logger, with_is_json, with_set_file};
//!
//! let logger = new_logger([
//!     with_is_json(false),
//!     with_set_file(true, LogFile::new("logs/app.log").max_size(10).max_backups(3).max_age(7)),
//! ]);
//! let log = logkit::with_default_attrs(&logger, [Attr::new("component", "startup")]);
//! logkit::info!(log, port = 8080, "listening");
//! ```

pub mod attrs;
pub mod config;
pub mod context;
pub mod file;
mod format;
pub mod handler;
pub mod level;
pub mod logger;
mod macros;
pub mod options;
pub mod registry;

#[cfg(test)]
mod testing;

pub use attrs::{Attr, Attrs};
pub use config::{LoggingConfig, load_config, options_from_env};
pub use context::{Context, LoggerContext, l, with_attrs, with_default_attrs};
pub use file::{FileError, RotatingFile};
pub use handler::{Console, Destination, Format, Handler, Selection, select_handler};
pub use level::{Level, LevelParseError};
pub use logger::{Logger, new_logger, new_logger_with_console};
pub use options::{
    LogFile, LoggerOption, LoggerOptions, with_add_source, with_is_json, with_level,
    with_set_default, with_set_file,
};
pub use registry::{default_logger, set_default};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
