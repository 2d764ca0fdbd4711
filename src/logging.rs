// Logging initialization.
// Writes tracing output to a file, since the terminal belongs to the UI.
//
// Filter with the CARDPIN_LOG environment variable, e.g. CARDPIN_LOG=cardpin=debug.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AppError, Result};
use crate::paths;

const LOG_ENV: &str = "CARDPIN_LOG";

/// Build the level filter from `CARDPIN_LOG`, falling back to `info`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, appending to `path` or the default log file.
/// Returns the file being written.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => paths::log_path().ok_or(AppError::NoCacheDir)?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("logs").join("cardpin.log");

        let path = init(Some(&target)).unwrap();
        assert_eq!(path, target);
        assert!(path.exists());

        tracing::error!("log file smoke test");
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("log file smoke test"));

        // The global subscriber can only be installed once.
        assert!(matches!(init(Some(&target)), Err(AppError::Logging(_))));
    }

    #[test]
    fn test_filter_directives_parse() {
        for directive in ["info", "debug", "cardpin=debug,warn", "cardpin::state=trace"] {
            assert!(
                EnvFilter::try_new(directive).is_ok(),
                "failed to parse directive: {}",
                directive
            );
        }
    }
}
