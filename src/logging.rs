//! File logging.
//!
//! The terminal belongs to the UI, so logs only go to a file, and only when a
//! log directory is configured. The level comes from `RUST_LOG` (default
//! `info`).

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub const LOG_FILE: &str = "plant-map.log";

/// Install the global subscriber writing to `<log_dir>/plant-map.log`.
/// Without a directory, tracing events are dropped.
pub fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let Some(log_dir) = log_dir else {
        return Ok(());
    };

    std::fs::create_dir_all(log_dir)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(rolling::never(log_dir, LOG_FILE))
        .with_ansi(false)
        .with_target(true);

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "File logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dir_is_noop() {
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn test_log_dir_gets_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        init_logging(Some(&log_dir)).unwrap();
        tracing::warn!(plants = 3, "written to file");

        let contents = std::fs::read_to_string(log_dir.join(LOG_FILE)).unwrap();
        assert!(contents.contains("File logging initialized"));
        assert!(contents.contains("written to file"));
        assert!(contents.contains("plants=3"));
    }
}
