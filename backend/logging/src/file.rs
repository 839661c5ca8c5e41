//! Rotated file destination.
//!
//! Rotation, backup naming and cleanup belong to `flexi_logger`'s
//! `FileLogWriter`; this module only maps a [`LogFile`] onto it and exposes the
//! result as a `MakeWriter`.

use crate::options::LogFile;
use flexi_logger::writers::{ArcFileLogWriter, FileLogWriter, FileLogWriterHandle};
use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Naming};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Rotation threshold used when the descriptor leaves `max_size` at zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const MEGABYTE: u64 = 1024 * 1024;

/// Failure to open the rotated file at construction time.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: io::Error,
    },

    #[error("cannot start rotating writer: {0}")]
    Writer(#[from] FlexiLoggerError),
}

/// Shared handle to an open rotating file.
#[derive(Clone)]
pub struct RotatingFile {
    path: PathBuf,
    writer: ArcFileLogWriter,
    // Dropping the last handle shuts the writer down.
    _handle: Arc<FileLogWriterHandle>,
}

impl RotatingFile {
    /// Open (or create) the file described by `log_file` in append mode.
    pub fn open(log_file: &LogFile) -> Result<Self, FileError> {
        let path = resolve_path(&log_file.filename);
        touch(&path).map_err(|source| FileError::Open {
            path: path.clone(),
            source,
        })?;

        let (writer, handle) = FileLogWriter::builder(file_spec(&path))
            .append()
            .rotate(
                Criterion::Size(max_size_bytes(log_file.max_size)),
                Naming::NumbersDirect,
                cleanup(log_file.max_backups, log_file.max_age),
            )
            .try_build_with_handle()?;

        Ok(Self {
            path,
            writer,
            _handle: Arc::new(handle),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile").field("path", &self.path).finish()
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RecordWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RecordWriter(self.writer.clone())
    }
}

/// Writer for a single record. Flushes on drop so the file is current after
/// every event.
pub struct RecordWriter(ArcFileLogWriter);

impl Write for RecordWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for RecordWriter {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

/// An empty filename resolves to `<tmp>/<executable>-logkit.log`.
pub fn resolve_path(filename: &Path) -> PathBuf {
    if !filename.as_os_str().is_empty() {
        return filename.to_path_buf();
    }
    let program = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "app".to_string());
    std::env::temp_dir().join(format!("{program}-logkit.log"))
}

/// Create the file and its directory so open failures surface here rather
/// than on the first write.
fn touch(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

fn file_spec(path: &Path) -> FileSpec {
    let mut spec = FileSpec::default().suppress_timestamp();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        spec = spec.directory(dir);
    }
    if let Some(stem) = path.file_stem() {
        spec = spec.basename(stem.to_string_lossy());
    }
    if let Some(ext) = path.extension() {
        spec = spec.suffix(ext.to_string_lossy());
    }
    spec
}

fn max_size_bytes(megabytes: u64) -> u64 {
    let megabytes = if megabytes == 0 {
        DEFAULT_MAX_SIZE_MB
    } else {
        megabytes
    };
    megabytes.saturating_mul(MEGABYTE)
}

/// The writer applies a single cleanup policy, so a non-zero age takes
/// precedence over the backup count. Zero for both keeps every backup.
fn cleanup(max_backups: usize, max_age_days: u32) -> Cleanup {
    match (max_age_days, max_backups) {
        (0, 0) => Cleanup::Never,
        (0, count) => Cleanup::KeepLogFiles(count),
        (days, _) => Cleanup::KeepForDays(usize::try_from(days).unwrap_or(usize::MAX)),
    }
}
