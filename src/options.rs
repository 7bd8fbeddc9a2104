//! Immutable per-sink options
//!
//! `SinkOptions` is what a sink is built from. It is normally derived from a
//! deserialized [`SinkConfig`](crate::config::SinkConfig) but can be assembled
//! directly when configuration comes from code.

use std::time::Duration;

use crate::config::SinkConfig;
use crate::level::{Format, OutputKind, Severity};

const SECS_PER_HOUR: u64 = 60 * 60;

/// Options for one log sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOptions {
    /// Minimum severity, or the only severity when `single_level` is set
    pub level: Severity,
    /// Record rendering
    pub format: Format,
    /// Destination type
    pub output: OutputKind,
    /// Directory for file sinks (empty selects `log/<level>`)
    pub out_dir: String,
    /// Age after which rotated files are removed (zero disables)
    pub max_age: Duration,
    /// Number of rotated files to keep (zero disables, ignored when `max_age` is set)
    pub max_count: u32,
    /// Accept records at exactly `level` and nothing else
    pub single_level: bool,
    /// Skip this sink entirely
    pub disabled: bool,
}

impl SinkOptions {
    /// Options for a plain stdout sink
    pub fn console(level: Severity, format: Format) -> Self {
        Self {
            level,
            format,
            output: OutputKind::Console,
            out_dir: String::new(),
            max_age: Duration::ZERO,
            max_count: 0,
            single_level: false,
            disabled: false,
        }
    }

    /// Options for a daily rotating file sink in `out_dir`
    pub fn file(level: Severity, format: Format, out_dir: impl Into<String>) -> Self {
        Self {
            output: OutputKind::File,
            out_dir: out_dir.into(),
            ..Self::console(level, format)
        }
    }

    /// Set the age-based retention, clearing any count-based retention
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self.normalize_retention()
    }

    /// Set the count-based retention (has no effect while an age is set)
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self.normalize_retention()
    }

    pub fn single_level(mut self) -> Self {
        self.single_level = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Rotated-file count actually handed to the rotation engine
    pub fn effective_max_count(&self) -> u32 {
        if self.max_age.is_zero() {
            self.max_count
        } else {
            0
        }
    }

    /// Whether a record at `level` may reach this sink's engine at all
    pub fn accepts(&self, level: Severity) -> bool {
        !self.single_level || self.level == level
    }

    // Age-based retention wins over count-based retention.
    fn normalize_retention(mut self) -> Self {
        self.max_count = self.effective_max_count();
        self
    }
}

impl From<&SinkConfig> for SinkOptions {
    fn from(config: &SinkConfig) -> Self {
        Self {
            level: config.level,
            format: config.format,
            output: config.out_type,
            out_dir: config.out_dir.clone(),
            max_age: Duration::from_secs(config.max_age.saturating_mul(SECS_PER_HOUR)),
            max_count: config.max_count,
            single_level: config.single_level,
            disabled: config.disabled,
        }
        .normalize_retention()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(max_age: u64, max_count: u32) -> SinkConfig {
        SinkConfig {
            out_type: OutputKind::File,
            out_dir: "log/app".to_string(),
            max_age,
            max_count,
            ..SinkConfig::new(Severity::Info, Format::Text)
        }
    }

    #[test]
    fn test_age_wins_over_count() {
        let options = SinkOptions::from(&file_config(24, 5));
        assert_eq!(options.max_age, Duration::from_secs(24 * 60 * 60));
        assert_eq!(options.max_count, 0);
        assert_eq!(options.effective_max_count(), 0);
    }

    #[test]
    fn test_count_kept_without_age() {
        let options = SinkOptions::from(&file_config(0, 5));
        assert!(options.max_age.is_zero());
        assert_eq!(options.effective_max_count(), 5);
    }

    #[test]
    fn test_builder_retention_exclusive() {
        let options = SinkOptions::file(Severity::Warn, Format::Json, "out")
            .with_max_count(3)
            .with_max_age(Duration::from_secs(3600));
        assert_eq!(options.max_count, 0);

        let options = options.with_max_count(9);
        assert_eq!(options.max_count, 0);
    }

    #[test]
    fn test_conversion_copies_flags() {
        let config = SinkConfig {
            single_level: true,
            disabled: true,
            ..SinkConfig::new(Severity::Error, Format::Json)
        };
        let options = SinkOptions::from(&config);
        assert_eq!(options.level, Severity::Error);
        assert_eq!(options.format, Format::Json);
        assert_eq!(options.output, OutputKind::Unrecognized);
        assert!(options.single_level);
        assert!(options.disabled);
    }

    #[test]
    fn test_accepts_single_level() {
        let options = SinkOptions::console(Severity::Warn, Format::Text).single_level();
        assert!(options.accepts(Severity::Warn));
        assert!(!options.accepts(Severity::Error));
        assert!(!options.accepts(Severity::Info));

        let options = SinkOptions::console(Severity::Warn, Format::Text);
        assert!(options.accepts(Severity::Debug));
    }
}
