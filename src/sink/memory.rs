//! In-memory sink that keeps the most recent rendered log lines
//!
//! Useful for embedding a live log view and for asserting on sink output.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};

use tracing_subscriber::fmt::MakeWriter;

/// Thread-safe ring buffer of rendered log lines
///
/// Clones share the same buffer.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    lines: Arc<RwLock<VecDeque<String>>>,
    max_lines: usize,
}

impl MemoryBuffer {
    /// Create a buffer holding at most `max_lines` lines
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Arc::new(RwLock::new(VecDeque::with_capacity(max_lines.min(1024)))),
            max_lines,
        }
    }

    /// Append one line, evicting the oldest when full
    pub fn push(&self, line: impl Into<String>) {
        if self.max_lines == 0 {
            return;
        }
        if let Ok(mut lines) = self.lines.write() {
            if lines.len() >= self.max_lines {
                lines.pop_front();
            }
            lines.push_back(line.into());
        }
    }

    /// All buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .read()
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All buffered lines joined with newlines
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.write() {
            lines.clear();
        }
    }
}

/// Writer handed to the formatting engine for a single record
pub struct MemoryWriter {
    buffer: MemoryBuffer,
    pending: Vec<u8>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending);
        let text = String::from_utf8_lossy(&pending);
        for line in text.lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                self.buffer.push(line);
            }
        }
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for MemoryBuffer {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MemoryWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}
