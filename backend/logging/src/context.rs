//! Request-scoped logger lookup and attribute helpers.
//!
//! Loggers travel with requests through an explicit [`LoggerContext`] rather
//! than ambient state. Anything without an attached logger resolves to the
//! process-wide default.

use crate::attrs::Attr;
use crate::logger::Logger;
use crate::registry::default_logger;

/// A value that may carry a request-scoped logger.
pub trait LoggerContext {
    fn logger(&self) -> Option<&Logger>;
}

/// Immutable request-scoped carrier for a logger.
#[derive(Debug, Clone, Default)]
pub struct Context {
    logger: Option<Logger>,
}

impl Context {
    /// A context with no logger attached.
    pub fn background() -> Self {
        Self::default()
    }

    /// A copy of this context carrying `logger`.
    pub fn with_logger(&self, logger: Logger) -> Self {
        Self {
            logger: Some(logger),
        }
    }
}

impl LoggerContext for Context {
    fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }
}

impl LoggerContext for Logger {
    fn logger(&self) -> Option<&Logger> {
        Some(self)
    }
}

impl LoggerContext for Option<Logger> {
    fn logger(&self) -> Option<&Logger> {
        self.as_ref()
    }
}

/// The logger attached to `ctx`, or the process-wide default.
pub fn l<C>(ctx: &C) -> Logger
where
    C: LoggerContext + ?Sized,
{
    ctx.logger().cloned().unwrap_or_else(default_logger)
}

/// The context's logger with `attrs` merged in, in order.
pub fn with_attrs<C, I>(ctx: &C, attrs: I) -> Logger
where
    C: LoggerContext + ?Sized,
    I: IntoIterator<Item = Attr>,
{
    l(ctx).with(attrs)
}

/// `logger` with `attrs` merged in, in order. `logger` itself is unchanged.
pub fn with_default_attrs<I>(logger: &Logger, attrs: I) -> Logger
where
    I: IntoIterator<Item = Attr>,
{
    logger.with(attrs)
}
