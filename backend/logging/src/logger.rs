//! Logger handle and factory.
//!
//! [`new_logger`] seeds [`LoggerOptions`] with defaults, applies the supplied
//! modifiers, selects a handler and optionally installs the result as the
//! process-wide default. It never fails: bad input degrades to defaults.

use crate::attrs::{self, Attr, Attrs};
use crate::handler::{Console, Handler, Selection, select_handler};
use crate::level::Level;
use crate::options::{LoggerOption, LoggerOptions};
use crate::registry;
use std::fmt;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// A cheap-to-clone handle to a sink plus an attribute set.
///
/// Handles are immutable. [`Logger::with`] derives a new handle sharing the
/// same sink, so holders of the original never see the added attributes.
#[derive(Clone)]
pub struct Logger {
    handler: Handler,
    dispatch: Dispatch,
    attrs: Arc<Attrs>,
}

impl Logger {
    /// Wrap an already selected handler.
    pub fn from_handler(handler: Handler) -> Self {
        let dispatch = Dispatch::new(tracing_subscriber::registry().with(handler.layer()));
        Self {
            handler,
            dispatch,
            attrs: Arc::new(Attrs::default()),
        }
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.level().allows(level)
    }

    /// Derive a handle with `attrs` merged into this handle's attributes.
    pub fn with<I>(&self, attrs: I) -> Logger
    where
        I: IntoIterator<Item = Attr>,
    {
        Logger {
            handler: self.handler.clone(),
            dispatch: self.dispatch.clone(),
            attrs: Arc::new(self.attrs.merged(attrs)),
        }
    }

    /// Whether both handles write through the same sink.
    pub fn shares_sink_with(&self, other: &Logger) -> bool {
        self.handler.same_sink(&other.handler)
    }

    /// Run `f` with this logger's sink as the active `tracing` dispatcher.
    ///
    /// Events emitted inside `f` are written by this handle's sink with this
    /// handle's attributes as record fields. The crate's
    /// `debug!`/`info!`/`warn!`/`error!` macros are built on this.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, || attrs::scoped(&self.attrs, f))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler)
            .field("attrs", &self.attrs)
            .finish()
    }
}

/// Build a logger writing to the process stdout (and optionally a file).
pub fn new_logger<I>(options: I) -> Logger
where
    I: IntoIterator<Item = LoggerOption>,
{
    new_logger_with_console(options, Console::stdout())
}

/// Same as [`new_logger`], with `console` standing in for stdout.
pub fn new_logger_with_console<I, W>(options: I, console: Console<W>) -> Logger
where
    I: IntoIterator<Item = LoggerOption>,
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    let options = LoggerOptions::default().apply(options);
    let Selection {
        handler,
        file_error,
    } = select_handler(&options, console);
    let logger = Logger::from_handler(handler);

    if let Some(error) = file_error {
        logger.in_scope(|| {
            tracing::warn!(
                path = %options.log_file.filename.display(),
                %error,
                "log file unavailable, writing to stdout only"
            )
        });
    }

    if options.set_default {
        registry::set_default(&logger);
    }

    logger
}
