//! Process-wide default logger
//!
//! The default [`LogEntry`] is built on first use from discovered
//! configuration: a `config.yml` or `config.yaml` in the working directory,
//! else a single console sink at debug level. [`setup`] and [`install`]
//! replace it wholesale. Every entry installed here shares the process-wide
//! [`LevelGate`], so [`set_global_level`] applies to whichever entry is live.
//!
//! Lazy construction panics when the discovered configuration is unusable;
//! call [`init`] at startup to get that failure as an error instead.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use crate::config::{self, SinkConfig};
use crate::entry::{LevelGate, LogEntry};
use crate::error::LogError;
use crate::fields::Fields;
use crate::level::Severity;

static DEFAULT: OnceLock<RwLock<Arc<LogEntry>>> = OnceLock::new();
static GLOBAL_GATE: OnceLock<LevelGate> = OnceLock::new();

/// The process-wide gate shared by every installed entry
pub fn global_gate() -> &'static LevelGate {
    GLOBAL_GATE.get_or_init(LevelGate::default)
}

pub fn global_level() -> Severity {
    global_gate().level()
}

/// Set the minimum severity for the process-wide logger
pub fn set_global_level(level: Severity) {
    global_gate().set(level);
}

/// Build an entry from configuration discovered in `dir`
///
/// Non-empty `explicit` configs take priority over any config file.
pub fn build_default(dir: &Path, explicit: Vec<SinkConfig>) -> Result<LogEntry, LogError> {
    let configs = config::discover(dir, explicit)?;
    LogEntry::new(&configs)
}

/// Build the default logger from the working directory and install it
pub fn init() -> Result<(), LogError> {
    install(build_default(Path::new("."), Vec::new())?);
    Ok(())
}

/// Replace the default logger with `entry`
pub fn install(entry: LogEntry) {
    let entry = Arc::new(entry.with_gate(global_gate().clone()));
    if DEFAULT.set(RwLock::new(Arc::clone(&entry))).is_err() {
        let mut current = match slot().write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = entry;
    }
}

/// Replace the default logger with one built from `configs`
///
/// An empty list leaves the current logger in place. Returns whether the
/// logger was replaced.
pub fn setup(configs: Vec<SinkConfig>) -> Result<bool, LogError> {
    if configs.is_empty() {
        return Ok(false);
    }
    install(LogEntry::new(&configs)?);
    Ok(true)
}

/// The currently installed default logger
pub fn default_entry() -> Arc<LogEntry> {
    match slot().read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

fn slot() -> &'static RwLock<Arc<LogEntry>> {
    DEFAULT.get_or_init(|| {
        let entry = match build_default(Path::new("."), Vec::new()) {
            Ok(entry) => entry,
            Err(e) => panic!("failed to initialise default logger: {}", e),
        };
        RwLock::new(Arc::new(entry.with_gate(global_gate().clone())))
    })
}

macro_rules! default_level_functions {
    ($level:expr, $plain:ident, $formatted:ident, $plain_with:ident, $formatted_with:ident) => {
        pub fn $plain(message: impl fmt::Display) {
            default_entry().log($level, &message);
        }

        pub fn $formatted(args: fmt::Arguments<'_>) {
            default_entry().logf($level, args);
        }

        pub fn $plain_with(fields: &Fields, message: impl fmt::Display) {
            default_entry().log_with($level, fields, &message);
        }

        pub fn $formatted_with(fields: &Fields, args: fmt::Arguments<'_>) {
            default_entry().logf_with($level, fields, args);
        }
    };
}

default_level_functions!(Severity::Debug, debug, debugf, debug_with, debugf_with);
default_level_functions!(Severity::Info, info, infof, info_with, infof_with);
default_level_functions!(Severity::Warn, warn, warnf, warn_with, warnf_with);
default_level_functions!(Severity::Error, error, errorf, error_with, errorf_with);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtered::FilteredLogger;
    use crate::level::Format;
    use crate::options::SinkOptions;
    use crate::sink::{MemoryBuffer, OutputSink};
    use std::sync::Mutex;

    // The default logger is process state; tests touching it run one at a time.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn install_memory(level: Severity) -> MemoryBuffer {
        let buffer = MemoryBuffer::new(100);
        let logger = FilteredLogger::new(
            SinkOptions::console(level, Format::Text),
            OutputSink::Memory(buffer.clone()),
        );
        install(LogEntry::from_loggers(vec![logger]));
        buffer
    }

    #[test]
    fn test_free_functions_reach_installed_entry() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);

        info("plain");
        warnf(format_args!("formatted {}", 1));
        error_with(&Fields::new().with("user", "a"), "with fields");
        debugf_with(&Fields::new().with("n", 2), format_args!("formatted {}", "fields"));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("plain"));
        assert!(lines[1].contains("formatted 1"));
        assert!(lines[2].contains("with fields user=a"));
        assert!(lines[3].contains("formatted fields"));
    }

    #[test]
    fn test_empty_setup_keeps_previous_default() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);
        let before = default_entry();

        assert!(!setup(Vec::new()).unwrap());

        assert!(Arc::ptr_eq(&before, &default_entry()));
        info("still here");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_setup_swaps_default() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);

        assert!(setup(vec![SinkConfig::fallback(), SinkConfig::fallback()]).unwrap());
        assert_eq!(default_entry().len(), 2);

        info("goes to stdout");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_global_level_gates_installed_entry() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);

        set_global_level(Severity::Error);
        debug("dropped");
        warn("dropped");
        error("kept");
        set_global_level(Severity::Debug);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("kept"));
    }

    #[test]
    fn test_macros_join_and_format() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);

        crate::log!(Severity::Info, "served", 200, "in", 5);
        crate::infof!("user {} logged in", "a");
        crate::log_with!(Severity::Warn, Fields::new().with("k", 1), "slow", "call");
        crate::logf_with!(Severity::Error, Fields::new(), "failed after {} tries", 3);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("served 200 in 5"));
        assert!(lines[1].contains("user a logged in"));
        assert!(lines[2].contains("slow call") && lines[2].contains("k=1"));
        assert!(lines[3].contains("failed after 3 tries"));
    }

    #[test]
    fn test_level_macros() {
        let _guard = SERIAL.lock().unwrap_or_else(|p| p.into_inner());
        let buffer = install_memory(Severity::Debug);
        let fields = Fields::new().with("user", "a");

        crate::debug!("cache", "miss", 7);
        crate::info!("served", 200);
        crate::warn_with!(fields, "slow", "login");
        crate::errorf_with!(fields, "failed after {} tries", 3);
        crate::infof_with!(Fields::new().with("n", 1), "batch {}", "done");
        crate::error!("gone");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("DEBUG") && lines[0].ends_with("cache miss 7"));
        assert!(lines[1].contains("INFO") && lines[1].ends_with("served 200"));
        assert!(lines[2].contains("WARN") && lines[2].ends_with("slow login user=a"));
        assert!(lines[3].contains("ERROR") && lines[3].ends_with("failed after 3 tries user=a"));
        assert!(lines[4].ends_with("batch done n=1"));
        assert!(lines[5].ends_with("gone"));
    }

    #[test]
    fn test_build_default_fallback() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let entry = build_default(temp_dir.path(), Vec::new()).unwrap();

        let sinks: Vec<_> = entry.sinks().cloned().collect();
        assert_eq!(sinks, vec![SinkOptions::console(Severity::Debug, Format::Text)]);
    }
}
