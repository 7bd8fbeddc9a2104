//! A single severity-filtered logger bound to one sink
//!
//! Each `FilteredLogger` owns its own formatting engine instance (a `fmt`
//! subscriber wrapped in a [`Dispatch`]) configured with the sink's writer,
//! record layout and minimum level. Records are emitted into that dispatch only, so
//! sinks never see each other's output.

use std::fmt;

use tracing::Dispatch;

use crate::error::LogError;
use crate::fields::Fields;
use crate::format::RecordFormat;
use crate::level::Severity;
use crate::options::SinkOptions;
use crate::sink::OutputSink;

/// Space-joined display of several values
pub struct Joined<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}

macro_rules! emit_at {
    ($level:expr, $message:expr, $fields:expr) => {
        match $fields {
            Some(fields) => tracing::event!($level, fields = %fields, "{}", $message),
            None => tracing::event!($level, "{}", $message),
        }
    };
}

/// Logger for one sink
///
/// The level and single-level flag are fixed for the logger's lifetime.
pub struct FilteredLogger {
    options: SinkOptions,
    dispatch: Dispatch,
}

impl FilteredLogger {
    /// Bind `options` to an already materialized sink
    pub fn new(options: SinkOptions, sink: OutputSink) -> Self {
        let ansi = sink.supports_ansi();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.into_make_writer())
            .with_max_level(options.level.as_tracing())
            .with_ansi(ansi)
            .event_format(RecordFormat::new(options.format))
            .finish();
        let dispatch = Dispatch::new(subscriber);

        Self { options, dispatch }
    }

    /// Materialize the sink for `options` and bind a logger to it
    ///
    /// Returns `Ok(None)` when the options produce no sink.
    pub fn from_options(options: SinkOptions) -> Result<Option<Self>, LogError> {
        Ok(OutputSink::materialize(&options)?.map(|sink| Self::new(options, sink)))
    }

    pub fn options(&self) -> &SinkOptions {
        &self.options
    }

    pub fn level(&self) -> Severity {
        self.options.level
    }

    pub fn is_single_level(&self) -> bool {
        self.options.single_level
    }

    /// Log `message` at `level`
    pub fn log(&self, level: Severity, message: &dyn fmt::Display) {
        if self.options.accepts(level) {
            self.emit(level, message, None);
        }
    }

    /// Log preformatted arguments at `level`
    pub fn logf(&self, level: Severity, args: fmt::Arguments<'_>) {
        self.log(level, &args);
    }

    /// Log several values joined by single spaces at `level`
    pub fn logln(&self, level: Severity, args: &[&dyn fmt::Display]) {
        self.log(level, &Joined(args));
    }

    /// Attach `fields` for a record at `level`
    ///
    /// Returns `None` for a single-level logger whose level differs, so no
    /// entry is created for records this sink will never accept.
    pub fn with_fields<'a>(&'a self, level: Severity, fields: &'a Fields) -> Option<FieldEntry<'a>> {
        if !self.options.accepts(level) {
            return None;
        }
        Some(FieldEntry {
            logger: self,
            level,
            fields,
        })
    }

    fn emit(&self, level: Severity, message: &dyn fmt::Display, fields: Option<&Fields>) {
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Severity::Debug => emit_at!(tracing::Level::DEBUG, message, fields),
            Severity::Info => emit_at!(tracing::Level::INFO, message, fields),
            Severity::Warn => emit_at!(tracing::Level::WARN, message, fields),
            Severity::Error => emit_at!(tracing::Level::ERROR, message, fields),
        });
    }
}

impl fmt::Debug for FilteredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredLogger")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A record level and field set bound to one accepting logger
pub struct FieldEntry<'a> {
    logger: &'a FilteredLogger,
    level: Severity,
    fields: &'a Fields,
}

impl FieldEntry<'_> {
    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn fields(&self) -> &Fields {
        self.fields
    }

    pub fn log(&self, message: &dyn fmt::Display) {
        self.logger.emit(self.level, message, Some(self.fields));
    }

    pub fn logf(&self, args: fmt::Arguments<'_>) {
        self.log(&args);
    }

    pub fn logln(&self, args: &[&dyn fmt::Display]) {
        self.log(&Joined(args));
    }
}
