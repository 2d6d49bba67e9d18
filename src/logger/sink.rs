//! Output sinks for the drain worker.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination stream for encoded log lines. Only the drain worker writes to
/// it, from a blocking-pool thread, so a plain blocking writer is fine.
pub type Sink = Box<dyn Write + Send + 'static>;

/// In-memory sink whose contents stay readable after the logger owns it.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Written lines without their trailing newline.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // A poisoned buffer still holds valid bytes.
        self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
