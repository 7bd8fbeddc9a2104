//! Daily rotating file sink
//!
//! Files are written to `<dir>/<YYYY-MM-DD>.log`. The day boundary is UTC
//! midnight, both for the rotation engine and for the date in the file name,
//! so hosts east or west of UTC roll over at a local time other than
//! midnight. Retention (by age or by count) is swept at open and again on the
//! first write of each new day.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing_appender::rolling::{RollingFileAppender, RollingWriter, Rotation};
use tracing_subscriber::fmt::MakeWriter;

use super::retention::{cleanup_excess_logs, cleanup_expired_logs};
use crate::error::LogError;
use crate::options::SinkOptions;

/// Suffix of every rotated log file
pub const LOG_SUFFIX: &str = "log";

/// Resolve the directory for a file sink
///
/// An empty `out_dir` selects `log/<level>`. Trailing separators are dropped.
pub fn resolve_dir(options: &SinkOptions) -> PathBuf {
    let dir = if options.out_dir.is_empty() {
        format!("log/{}", options.level)
    } else {
        options.out_dir.clone()
    };

    let trimmed = dir.trim_end_matches(|c: char| c == '/' || c == MAIN_SEPARATOR);
    if trimmed.is_empty() {
        PathBuf::from(dir)
    } else {
        PathBuf::from(trimmed)
    }
}

/// Rotating file writer with optional retention by age or count
pub struct RotatingFile {
    appender: RollingFileAppender,
    dir: PathBuf,
    max_age: Duration,
    max_count: usize,
    last_sweep: Mutex<NaiveDate>,
}

impl RotatingFile {
    /// Open the rotating writer for a file sink, creating its directory if missing
    pub fn open(options: &SinkOptions) -> Result<Self, LogError> {
        let dir = resolve_dir(options);
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| LogError::io(&dir, e))?;
            tracing::debug!("Created log directory {}", dir.display());
        }

        // No max_log_files: the engine would prune any file ending in "log"
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_suffix(LOG_SUFFIX)
            .build(&dir)?;

        let today = Utc::now().date_naive();
        let file = Self {
            appender,
            dir,
            max_age: options.max_age,
            max_count: options.effective_max_count() as usize,
            last_sweep: Mutex::new(today),
        };
        file.sweep(today);
        Ok(file)
    }

    /// Directory the rotated files live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file written today
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            Utc::now().format("%Y-%m-%d"),
            LOG_SUFFIX
        ))
    }

    fn has_retention(&self) -> bool {
        !self.max_age.is_zero() || self.max_count > 0
    }

    fn sweep(&self, today: NaiveDate) {
        let result = if !self.max_age.is_zero() {
            cleanup_expired_logs(&self.dir, self.max_age)
        } else if self.max_count > 0 {
            cleanup_excess_logs(&self.dir, self.max_count, today)
        } else {
            return;
        };
        match result {
            Ok(0) => {}
            Ok(count) => {
                tracing::debug!("Removed {} old log files from {}", count, self.dir.display())
            }
            Err(e) => tracing::warn!("Failed to sweep {}: {}", self.dir.display(), e),
        }
    }

    fn sweep_on_new_day(&self) {
        if !self.has_retention() {
            return;
        }
        let today = Utc::now().date_naive();
        let rolled = match self.last_sweep.lock() {
            Ok(mut last) if *last != today => {
                *last = today;
                true
            }
            _ => false,
        };
        if rolled {
            self.sweep(today);
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.sweep_on_new_day();
        self.appender.make_writer()
    }
}
