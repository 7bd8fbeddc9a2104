//! fanlog - configuration-driven fan-out logging
//!
//! A process declares a list of sinks (stdout or daily rotating files, each
//! with its own level, format and retention) and every log call is delivered
//! to each sink that accepts it.
//!
//! ```ignore
//! use fanlog::{Fields, LogEntry, SinkConfig};
//!
//! let entry = LogEntry::new(&fanlog::load_config("config.yml".as_ref())?)?;
//! entry.info("service started");
//! entry.warn_with(&Fields::new().with("user", "a"), "slow login");
//!
//! // or through the process-wide default
//! fanlog::infof!("listening on {}", port);
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod fields;
pub mod filtered;
pub mod format;
pub mod global;
pub mod level;
mod macros;
pub mod options;
pub mod sink;

pub use config::{discover, find_config_file, load_config, Setup, SinkConfig, CONFIG_FILENAMES};
pub use entry::{LevelGate, LogEntry};
pub use error::LogError;
pub use fields::Fields;
pub use filtered::{FieldEntry, FilteredLogger, Joined};
pub use format::RecordFormat;
pub use global::{
    debug, debug_with, debugf, debugf_with, default_entry, error, error_with, errorf,
    errorf_with, global_level, info, info_with, infof, infof_with, init, install,
    set_global_level, setup, warn, warn_with, warnf, warnf_with,
};
pub use level::{Format, OutputKind, Severity};
pub use options::SinkOptions;
pub use sink::{MemoryBuffer, OutputSink};
