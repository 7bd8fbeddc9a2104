//! Output sinks
//!
//! Turns [`SinkOptions`] into a live destination for the formatting engine:
//! stdout, a daily rotating file, or an injected writer.

mod file;
mod memory;
mod retention;

use std::fmt;
use std::io::IsTerminal;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::LogError;
use crate::level::OutputKind;
use crate::options::SinkOptions;

pub use file::{resolve_dir, RotatingFile, LOG_SUFFIX};
pub use memory::{MemoryBuffer, MemoryWriter};
pub use retention::{cleanup_excess_logs, cleanup_expired_logs, is_rotated_log_name};

/// A materialized log destination
pub enum OutputSink {
    /// The process's standard output
    Stdout,
    /// Daily rotating files in a directory
    File(RotatingFile),
    /// Bounded in-memory line buffer
    Memory(MemoryBuffer),
    /// Any other writer factory
    Writer(BoxMakeWriter),
}

impl OutputSink {
    /// Build the destination described by `options`
    ///
    /// Disabled options and unrecognized output kinds yield `Ok(None)`.
    pub fn materialize(options: &SinkOptions) -> Result<Option<Self>, LogError> {
        if options.disabled {
            return Ok(None);
        }
        match options.output {
            OutputKind::Console => Ok(Some(OutputSink::Stdout)),
            OutputKind::File => RotatingFile::open(options).map(|f| Some(OutputSink::File(f))),
            OutputKind::Unrecognized => {
                tracing::warn!("Skipping {} sink with unrecognized output type", options.level);
                Ok(None)
            }
        }
    }

    /// Wrap an arbitrary writer factory
    pub fn writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        OutputSink::Writer(BoxMakeWriter::new(make_writer))
    }

    /// Whether records should carry ANSI colors
    pub fn supports_ansi(&self) -> bool {
        matches!(self, OutputSink::Stdout) && std::io::stdout().is_terminal()
    }

    pub(crate) fn into_make_writer(self) -> BoxMakeWriter {
        match self {
            OutputSink::Stdout => BoxMakeWriter::new(std::io::stdout),
            OutputSink::File(file) => BoxMakeWriter::new(file),
            OutputSink::Memory(buffer) => BoxMakeWriter::new(buffer),
            OutputSink::Writer(writer) => writer,
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSink::Stdout => f.write_str("Stdout"),
            OutputSink::File(file) => f.debug_tuple("File").field(&file.dir()).finish(),
            OutputSink::Memory(buffer) => f.debug_tuple("Memory").field(&buffer.len()).finish(),
            OutputSink::Writer(_) => f.write_str("Writer"),
        }
    }
}
