//! Tracing setup for the atlas viewer.
//!
//! One global subscriber fans events out to stdout and to a log file created
//! for this launch under `<app dir>/logs`. Older launch files beyond
//! [`MAX_LOG_FILES`] are deleted on startup.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Launch files kept in the log directory, the current one included.
pub const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "parasite_atlas";
const LOG_EXTENSION: &str = "log";
/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,parasite_atlas::map=debug";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list log directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to delete old log file {path}: {source}")]
    DeleteFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("A global tracing subscriber is already installed: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the stdout + file subscriber. Later calls do nothing.
///
/// Errors are returned rather than panicking so the binary can carry on
/// without a log file.
pub fn init() -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }
    let dir = app_dirs::logs_dir()?;
    let launch = LaunchLog::create(&dir, now_local_or_utc())?;
    let pruned = prune_old_logs(&dir, MAX_LOG_FILES)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::never(&dir, &launch.file_name));
    let timer = local_timer();
    let subscriber = Registry::default()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!(
        "Logging to {} ({pruned} old log files removed)",
        launch.path.display()
    );
    Ok(())
}

/// The file this launch writes to.
struct LaunchLog {
    file_name: String,
    path: PathBuf,
}

impl LaunchLog {
    fn create(dir: &Path, started: OffsetDateTime) -> Result<Self, LoggingError> {
        let file_name = launch_file_name(started)?;
        let path = dir.join(&file_name);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::CreateFile {
                path: path.clone(),
                source,
            })?;
        Ok(Self { file_name, path })
    }
}

fn launch_file_name(started: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = started.format(NAME_FORMAT)?;
    Ok(format!("{LOG_FILE_PREFIX}_{stamp}.{LOG_EXTENSION}"))
}

/// Delete all but the `keep` most recently modified `.log` files in `dir`.
///
/// Returns how many files were removed. Other files are left alone.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<(SystemTime, PathBuf)> = listing
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    logs.sort_by(|a, b| b.0.cmp(&a.0));
    let mut removed = 0;
    for (_, path) in logs.into_iter().skip(keep) {
        fs::remove_file(&path).map_err(|source| LoggingError::DeleteFile { path, source })?;
        removed += 1;
    }
    Ok(removed)
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    fn log_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".log"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn launch_file_is_named_after_start_time() {
        let dir = tempdir().unwrap();
        let started = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let launch = LaunchLog::create(dir.path(), started).unwrap();
        assert_eq!(launch.file_name, "parasite_atlas_2023-11-14_22-13-20.log");
        assert!(launch.path.is_file());
    }

    #[test]
    fn prune_keeps_newest_logs_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        for idx in 0..6 {
            fs::write(dir.path().join(format!("parasite_atlas_{idx}.log")), b"").unwrap();
            thread::sleep(Duration::from_millis(15));
        }
        fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        assert_eq!(prune_old_logs(dir.path(), 4).unwrap(), 2);
        assert_eq!(
            log_names(dir.path()),
            vec![
                "parasite_atlas_2.log",
                "parasite_atlas_3.log",
                "parasite_atlas_4.log",
                "parasite_atlas_5.log",
            ]
        );
        assert!(dir.path().join("notes.txt").exists());
        assert_eq!(prune_old_logs(dir.path(), 4).unwrap(), 0);
    }
}
