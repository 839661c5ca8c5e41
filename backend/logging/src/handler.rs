//! Handler selection.
//!
//! Turns resolved [`LoggerOptions`] into a [`Handler`]: a `tracing-subscriber`
//! `fmt` layer in text or JSON layout, filtered to the configured level, writing
//! to stdout alone or to stdout and a rotated file.
//!
//! ```text
//! format  file   destination
//! text    off    stdout
//! json    off    stdout
//! text    on     stdout + rotated file (tee)
//! json    on     stdout + rotated file (tee)
//! ```

use crate::file::{FileError, RotatingFile};
use crate::format::AttrsFormat;
use crate::level::Level;
use crate::options::LoggerOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::fmt::{self, MakeWriter, writer::MakeWriterExt};
use tracing_subscriber::{Layer, Registry};

pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl From<bool> for Format {
    fn from(is_json: bool) -> Self {
        if is_json { Format::Json } else { Format::Text }
    }
}

/// Where records are written.
#[derive(Debug, Clone)]
pub enum Destination {
    Stdout,
    StdoutAndFile(RotatingFile),
}

impl Destination {
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Destination::Stdout => None,
            Destination::StdoutAndFile(file) => Some(file.path()),
        }
    }
}

/// The standard-output side of every handler.
#[derive(Debug, Clone)]
pub struct Console<W> {
    writer: W,
    ansi: bool,
}

impl Console<fn() -> std::io::Stdout> {
    /// Process stdout, with colours when it is a terminal.
    pub fn stdout() -> Self {
        Self {
            writer: std::io::stdout,
            ansi: std::io::stdout().is_terminal(),
        }
    }
}

impl<W> Console<W> {
    /// Any `MakeWriter` standing in for stdout, without colours.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            ansi: false,
        }
    }
}

/// A selected sink. Cloning shares the open file and the layer recipe.
#[derive(Clone)]
pub struct Handler {
    format: Format,
    level: Level,
    add_source: bool,
    destination: Destination,
    build: Arc<dyn Fn() -> BoxedLayer + Send + Sync>,
}

impl Handler {
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Whether `other` was produced by the same selection.
    pub fn same_sink(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }

    /// A fresh subscriber layer writing through this handler's destination.
    pub(crate) fn layer(&self) -> BoxedLayer {
        (self.build)()
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("destination", &self.destination)
            .finish()
    }
}

/// Outcome of [`select_handler`]: the handler and, when the file could not be
/// opened, the reason it fell back to stdout only.
pub struct Selection {
    pub handler: Handler,
    pub file_error: Option<FileError>,
}

/// Map resolved options onto one of the four handler wirings.
pub fn select_handler<W>(options: &LoggerOptions, console: Console<W>) -> Selection
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    let format = Format::from(options.is_json);
    let mut file_error = None;

    let destination = if options.set_file {
        match RotatingFile::open(&options.log_file) {
            Ok(file) => Destination::StdoutAndFile(file),
            Err(err) => {
                file_error = Some(err);
                Destination::Stdout
            }
        }
    } else {
        Destination::Stdout
    };

    let recipe = Recipe {
        format,
        level: options.level,
        add_source: options.add_source,
        ansi: console.ansi && matches!(destination, Destination::Stdout),
        stdout: console.writer,
        file: match &destination {
            Destination::StdoutAndFile(file) => Some(file.clone()),
            Destination::Stdout => None,
        },
    };

    let handler = Handler {
        format,
        level: options.level,
        add_source: options.add_source,
        destination,
        build: Arc::new(move || recipe.layer()),
    };

    Selection {
        handler,
        file_error,
    }
}

struct Recipe<W> {
    format: Format,
    level: Level,
    add_source: bool,
    ansi: bool,
    stdout: W,
    file: Option<RotatingFile>,
}

impl<W> Recipe<W>
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    fn layer(&self) -> BoxedLayer {
        let filter = LevelFilter::from(self.level);
        match &self.file {
            None => filter.and_then(self.fmt_layer(self.stdout.clone())).boxed(),
            Some(file) => filter
                .and_then(self.fmt_layer(self.stdout.clone().and(file.clone())))
                .boxed(),
        }
    }

    fn fmt_layer<M>(&self, writer: M) -> BoxedLayer
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let event_format = fmt::format()
            .with_file(self.add_source)
            .with_line_number(self.add_source);

        match self.format {
            Format::Text => fmt::layer()
                .with_writer(writer)
                .with_ansi(self.ansi)
                .event_format(AttrsFormat::new(
                    event_format.with_ansi(self.ansi),
                    Format::Text,
                ))
                .boxed(),
            Format::Json => fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .fmt_fields(JsonFields::new())
                .event_format(AttrsFormat::new(
                    event_format
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false),
                    Format::Json,
                ))
                .boxed(),
        }
    }
}
