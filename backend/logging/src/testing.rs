//! Test helpers: in-memory stdout and scratch directories.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory stand-in for stdout.
#[derive(Clone, Default)]
pub(crate) struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub(crate) fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A unique, not yet created directory under the system temp dir.
pub(crate) fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("logkit-test-{}", uuid::Uuid::new_v4()))
}

static DEFAULT_SLOT: Mutex<()> = Mutex::new(());

/// Serialises tests that replace the process-wide default logger.
pub(crate) fn default_slot_lock() -> MutexGuard<'static, ()> {
    DEFAULT_SLOT.lock().unwrap_or_else(PoisonError::into_inner)
}
