//! Logging macros bound to a [`Logger`](crate::Logger).
//!
//! Each macro expands the matching `tracing` macro at the caller, inside
//! [`Logger::in_scope`](crate::Logger::in_scope), so records carry the caller's
//! file and line and the logger's attributes as fields:
//!
//! ```ignore
//! let log = logkit::with_default_attrs(&logger, [Attr::new("request_id", id)]);
//! logkit::info!(log, status = 200, "request served");
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __event {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::Logger::in_scope(&$logger, || {
            $crate::__private::tracing::event!($level, $($arg)+)
        })
    };
}

/// Emit a debug record through a logger.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__event!($logger, $crate::__private::tracing::Level::DEBUG, $($arg)+)
    };
}

/// Emit an info record through a logger.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__event!($logger, $crate::__private::tracing::Level::INFO, $($arg)+)
    };
}

/// Emit a warn record through a logger.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__event!($logger, $crate::__private::tracing::Level::WARN, $($arg)+)
    };
}

/// Emit an error record through a logger.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__event!($logger, $crate::__private::tracing::Level::ERROR, $($arg)+)
    };
}
