//! Retention for rotated log files
//!
//! Only files named `YYYY-MM-DD.log` are ever considered, so a log directory
//! shared with other files is safe. Files are pruned either by age (last
//! modification time) or by count (newest dates kept).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;

/// Whether `name` looks like a file produced by daily rotation (`YYYY-MM-DD.log`)
pub fn is_rotated_log_name(name: &str) -> bool {
    name.strip_suffix(".log")
        .map(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").is_ok())
        .unwrap_or(false)
}

/// Delete rotated log files in `logs_dir` last modified more than `max_age` ago
///
/// Returns the number of files deleted.
pub fn cleanup_expired_logs(logs_dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted_count = 0;

    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let path = entry.path();

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_rotated_log_name(name) => {}
            _ => continue,
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    deleted_count += 1;
                }
            }
        }
    }

    Ok(deleted_count)
}

/// Rotated log files in `logs_dir` with the date parsed from their names
fn rotated_logs(logs_dir: &Path) -> std::io::Result<Vec<(NaiveDate, PathBuf)>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(logs_dir)? {
        let path = entry?.path();
        let date = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".log"))
            .and_then(|stem| NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok());
        if let Some(date) = date {
            if path.is_file() {
                logs.push((date, path));
            }
        }
    }
    Ok(logs)
}

/// Keep the `max_count` newest rotated log files in `logs_dir`, by file name date
///
/// The file for `today` always counts towards `max_count`, even before it has
/// been created. Returns the number of files deleted.
pub fn cleanup_excess_logs(
    logs_dir: &Path,
    max_count: usize,
    today: NaiveDate,
) -> std::io::Result<usize> {
    if !logs_dir.exists() || max_count == 0 {
        return Ok(0);
    }

    let mut logs = rotated_logs(logs_dir)?;
    logs.sort_by(|a, b| b.0.cmp(&a.0));

    let reserved = usize::from(!logs.iter().any(|(date, _)| *date == today));
    let keep = max_count.saturating_sub(reserved);

    let mut deleted_count = 0;
    for (_, path) in logs.into_iter().skip(keep) {
        if fs::remove_file(&path).is_ok() {
            deleted_count += 1;
        }
    }

    Ok(deleted_count)
}
