//! Process-wide default logger.
//!
//! A single slot holding the current default handle. The first registration
//! also installs a global `tracing` subscriber whose layer is reloaded on every
//! later registration, so unscoped `tracing` macros anywhere in the host follow
//! the newest default. If the host already installed its own global subscriber,
//! only the slot is updated.

use crate::handler::{BoxedLayer, Console, select_handler};
use crate::logger::Logger;
use crate::options::LoggerOptions;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::{PoisonError, RwLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Registry, reload};

static DEFAULT: RwLock<Option<Logger>> = RwLock::new(None);

/// Returned before any logger was registered: text on stdout at info.
static BUILTIN: Lazy<Logger> = Lazy::new(|| {
    let options = LoggerOptions {
        is_json: false,
        add_source: false,
        set_default: false,
        ..Default::default()
    };
    Logger::from_handler(select_handler(&options, Console::stdout()).handler)
});

static GLOBAL: OnceCell<Option<reload::Handle<BoxedLayer, Registry>>> = OnceCell::new();

/// Replace the process-wide default. Last writer wins.
///
/// The slot stays locked until the global route is updated, so the slot and
/// the route always name the same logger.
pub fn set_default(logger: &Logger) {
    let mut slot = DEFAULT.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(logger.clone());
    route_unscoped_events(logger);
}

/// The current process-wide default logger.
pub fn default_logger() -> Logger {
    DEFAULT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_else(|| BUILTIN.clone())
}

fn route_unscoped_events(logger: &Logger) {
    let mut installed_now = false;
    let handle = GLOBAL.get_or_init(|| {
        installed_now = true;
        install_global(logger.handler().layer())
    });

    if installed_now {
        return;
    }
    if let Some(handle) = handle {
        if let Err(err) = handle.reload(logger.handler().layer()) {
            tracing::debug!(error = %err, "could not reload global subscriber layer");
        }
    }
}

fn install_global(layer: BoxedLayer) -> Option<reload::Handle<BoxedLayer, Registry>> {
    let (layer, handle) = reload::Layer::new(layer);
    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => Some(handle),
        Err(err) => {
            tracing::debug!(
                error = %err,
                "global tracing subscriber already installed, default logger not routed"
            );
            None
        }
    }
}
