//! Fan-out dispatcher over a fixed set of filtered loggers
//!
//! Every call first checks the [`LevelGate`]; a record below the gate returns
//! before any sink is touched. Records that pass are handed to each logger in
//! construction order, and each logger applies its own filtering.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::config::SinkConfig;
use crate::error::LogError;
use crate::fields::Fields;
use crate::filtered::FilteredLogger;
use crate::level::Severity;
use crate::options::SinkOptions;

/// Coarse minimum severity checked before any fan-out
///
/// Clones share the same level.
#[derive(Debug, Clone)]
pub struct LevelGate(Arc<AtomicU8>);

impl LevelGate {
    pub fn new(level: Severity) -> Self {
        Self(Arc::new(AtomicU8::new(level.to_u8())))
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Severity) {
        self.0.store(level.to_u8(), Ordering::Relaxed);
    }

    /// Whether a record at `level` passes the gate
    pub fn allows(&self, level: Severity) -> bool {
        level >= self.level()
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $formatted:ident, $plain_with:ident, $formatted_with:ident, $name:literal) => {
        #[doc = concat!("Log `message` at ", $name, " level")]
        pub fn $plain(&self, message: impl fmt::Display) {
            self.log($level, &message);
        }

        #[doc = concat!("Log formatted arguments at ", $name, " level")]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) {
            self.logf($level, args);
        }

        #[doc = concat!("Log `message` with `fields` at ", $name, " level")]
        pub fn $plain_with(&self, fields: &Fields, message: impl fmt::Display) {
            self.log_with($level, fields, &message);
        }

        #[doc = concat!("Log formatted arguments with `fields` at ", $name, " level")]
        pub fn $formatted_with(&self, fields: &Fields, args: fmt::Arguments<'_>) {
            self.logf_with($level, fields, args);
        }
    };
}

/// Ordered collection of sinks receiving every log call
///
/// The sink set is fixed at construction. An entry with no sinks is valid and
/// turns every call into a no-op.
#[derive(Debug, Default)]
pub struct LogEntry {
    loggers: Vec<FilteredLogger>,
    gate: LevelGate,
}

impl LogEntry {
    /// Build one sink per config entry, skipping disabled and unrecognized ones
    pub fn new(configs: &[SinkConfig]) -> Result<Self, LogError> {
        Self::from_options(configs.iter().map(SinkOptions::from))
    }

    /// Build one sink per option set, skipping those that produce no sink
    pub fn from_options<I>(options: I) -> Result<Self, LogError>
    where
        I: IntoIterator<Item = SinkOptions>,
    {
        let mut loggers = Vec::new();
        for option in options {
            match FilteredLogger::from_options(option)? {
                Some(logger) => loggers.push(logger),
                None => tracing::debug!("Sink produced no output, skipping"),
            }
        }
        Ok(Self::from_loggers(loggers))
    }

    /// Wrap loggers that were bound to their sinks elsewhere
    pub fn from_loggers(loggers: Vec<FilteredLogger>) -> Self {
        Self {
            loggers,
            gate: LevelGate::default(),
        }
    }

    /// Use `gate` instead of this entry's own gate
    pub fn with_gate(mut self, gate: LevelGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> &LevelGate {
        &self.gate
    }

    /// Number of live sinks
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// Options of the live sinks, in fan-out order
    pub fn sinks(&self) -> impl Iterator<Item = &SinkOptions> {
        self.loggers.iter().map(FilteredLogger::options)
    }

    /// Log `message` at `level` on every sink
    pub fn log(&self, level: Severity, message: &dyn fmt::Display) {
        if !self.gate.allows(level) {
            return;
        }
        for logger in &self.loggers {
            logger.log(level, message);
        }
    }

    /// Log formatted arguments at `level` on every sink
    pub fn logf(&self, level: Severity, args: fmt::Arguments<'_>) {
        self.log(level, &args);
    }

    /// Log `message` with `fields` at `level` on every accepting sink
    pub fn log_with(&self, level: Severity, fields: &Fields, message: &dyn fmt::Display) {
        if !self.gate.allows(level) {
            return;
        }
        for entry in self
            .loggers
            .iter()
            .filter_map(|logger| logger.with_fields(level, fields))
        {
            entry.log(message);
        }
    }

    /// Log formatted arguments with `fields` at `level` on every accepting sink
    pub fn logf_with(&self, level: Severity, fields: &Fields, args: fmt::Arguments<'_>) {
        self.log_with(level, fields, &args);
    }

    level_methods!(Severity::Debug, debug, debugf, debug_with, debugf_with, "debug");
    level_methods!(Severity::Info, info, infof, info_with, infof_with, "info");
    level_methods!(Severity::Warn, warn, warnf, warn_with, warnf_with, "warn");
    level_methods!(Severity::Error, error, errorf, error_with, errorf_with, "error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Format, OutputKind};
    use crate::sink::{MemoryBuffer, OutputSink};
    use tempfile::TempDir;

    fn memory_sink(options: SinkOptions) -> (FilteredLogger, MemoryBuffer) {
        let buffer = MemoryBuffer::new(100);
        let logger = FilteredLogger::new(options, OutputSink::Memory(buffer.clone()));
        (logger, buffer)
    }

    #[test]
    fn test_level_gate() {
        let gate = LevelGate::default();
        assert_eq!(gate.level(), Severity::Debug);
        assert!(gate.allows(Severity::Debug));

        let shared = gate.clone();
        shared.set(Severity::Warn);
        assert_eq!(gate.level(), Severity::Warn);
        assert!(!gate.allows(Severity::Info));
        assert!(gate.allows(Severity::Warn));
        assert!(gate.allows(Severity::Error));
    }

    #[test]
    fn test_gate_dominates_sink_config() {
        for (gate_index, gate_level) in Severity::ALL.iter().enumerate() {
            for call_level in &Severity::ALL[..gate_index] {
                let (logger, buffer) =
                    memory_sink(SinkOptions::console(Severity::Debug, Format::Text));
                let entry = LogEntry::from_loggers(vec![logger]);
                entry.gate().set(*gate_level);

                entry.log(*call_level, &"suppressed");
                entry.log_with(*call_level, &Fields::new().with("k", 1), &"suppressed");

                assert!(buffer.is_empty(), "{} passed a {} gate", call_level, gate_level);
            }
        }
    }

    #[test]
    fn test_single_level_error_sink() {
        let (logger, buffer) =
            memory_sink(SinkOptions::console(Severity::Error, Format::Text).single_level());
        let entry = LogEntry::from_loggers(vec![logger]);

        entry.debug("d");
        entry.info("i");
        entry.warn("w");
        assert!(buffer.is_empty());

        entry.error("boom");
        assert_eq!(buffer.len(), 1);
        assert!(buffer.lines()[0].contains("boom"));
    }

    #[test]
    fn test_fan_out_reaches_every_sink() {
        let (first, first_buffer) = memory_sink(SinkOptions::console(Severity::Debug, Format::Text));
        let (second, second_buffer) = memory_sink(SinkOptions::console(Severity::Info, Format::Json));
        let entry = LogEntry::from_loggers(vec![first, second]);

        entry.debugf(format_args!("step {}", 1));
        entry.infof(format_args!("step {}", 2));

        assert_eq!(first_buffer.len(), 2);
        assert_eq!(second_buffer.len(), 1);
        assert!(second_buffer.lines()[0].contains("step 2"));
    }

    #[test]
    fn test_fields_skip_single_level_sink() {
        let (warn_only, warn_buffer) =
            memory_sink(SinkOptions::console(Severity::Warn, Format::Text).single_level());
        let (normal, normal_buffer) = memory_sink(SinkOptions::console(Severity::Debug, Format::Text));
        let entry = LogEntry::from_loggers(vec![warn_only, normal]);

        let fields = Fields::new().with("user", "a");
        entry.info_with(&fields, "logged in");

        assert!(warn_buffer.is_empty());
        let lines = normal_buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("logged in"));
        assert!(lines[0].contains("user=a"));
    }

    #[test]
    fn test_formatted_with_fields() {
        let (logger, buffer) = memory_sink(SinkOptions::console(Severity::Debug, Format::Text));
        let entry = LogEntry::from_loggers(vec![logger]);

        entry.errorf_with(&Fields::new().with("code", 503), format_args!("upstream {}", "down"));
        entry.warn_with(&Fields::new().with("retry", true), "slow");
        entry.debugf_with(&Fields::new(), format_args!("tick"));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("upstream down") && lines[0].contains(r#""code":503"#));
        assert!(lines[1].contains("slow") && lines[1].contains(r#""retry":true"#));
        assert!(lines[2].contains("tick"));
    }

    #[test]
    fn test_empty_entry_is_noop() {
        let entry = LogEntry::default();
        assert!(entry.is_empty());
        entry.error("nobody listens");
        entry.info_with(&Fields::new().with("k", "v"), "still nobody");
    }

    #[test]
    fn test_new_skips_disabled_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut configs = Vec::new();
        for (i, level) in Severity::ALL.iter().enumerate() {
            let mut config = SinkConfig::new(*level, Format::Text);
            config.out_type = OutputKind::File;
            config.out_dir = temp_dir.path().join(format!("sink{}", i)).to_string_lossy().into_owned();
            config.disabled = i % 2 == 1;
            configs.push(config);
        }

        let entry = LogEntry::new(&configs).unwrap();
        assert_eq!(entry.len(), 2);
        let levels: Vec<_> = entry.sinks().map(|o| o.level).collect();
        assert_eq!(levels, vec![Severity::Debug, Severity::Warn]);
    }

    #[test]
    fn test_new_skips_unrecognized_output() {
        let mut console = SinkConfig::new(Severity::Info, Format::Text);
        console.out_type = OutputKind::Console;
        let unknown = SinkConfig::new(Severity::Info, Format::Text);

        let entry = LogEntry::new(&[unknown, console]).unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(entry.sinks().next().unwrap().output, OutputKind::Console);
    }

    #[test]
    fn test_new_fails_on_unopenable_file_sink() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let mut config = SinkConfig::new(Severity::Info, Format::Text);
        config.out_type = OutputKind::File;
        config.out_dir = blocker.join("logs").to_string_lossy().into_owned();

        assert!(LogEntry::new(&[config]).is_err());
    }

    #[test]
    fn test_file_sink_receives_records() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("app");
        let options = SinkOptions::file(Severity::Info, Format::Json, dir.to_string_lossy());

        let entry = LogEntry::from_options(vec![options]).unwrap();
        entry.info_with(&Fields::new().with("order", 7), "order placed");
        entry.debug("not written");

        let written: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(written.len(), 1);
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("order placed"));
        assert!(!content.contains("not written"));
    }
}
