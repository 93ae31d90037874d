//! Log file initialization.
//!
//! One plain-text log file per process start, named with a second-resolution
//! timestamp so consecutive boots never collide. No rotation and no size
//! cap — the table reboots often enough that files stay small, and the
//! operator prunes the directory by hand.

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::TableConfig;

/// Initialize the global logger writing to a fresh timestamped file in
/// `config.log_dir`.
///
/// Returns the worker guard, which must be kept alive for the duration of
/// the program so buffered writes are flushed — including on the reboot
/// path, where the process exits moments after the last log line.
pub fn init_logging(config: &TableConfig) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let path = log_file_path(&config.log_dir);
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir))?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// `<log_dir>/foostable-YYYY-MM-DD_HH-MM-SS.log`
fn log_file_path(log_dir: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(log_dir).join(format!("foostable-{stamp}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_name_carries_second_resolution_stamp() {
        let path = log_file_path("/var/log/foostable");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("foostable-"));
        assert!(name.ends_with(".log"));
        // foostable-YYYY-MM-DD_HH-MM-SS.log
        assert_eq!(name.len(), "foostable-".len() + 19 + ".log".len());
    }
}
