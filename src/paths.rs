// Filesystem path utilities.
// Locates the config file and log file in the platform's project directories.

use std::path::PathBuf;

use directories::ProjectDirs;

const APP_NAME: &str = "cardpin";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the base config directory (~/.config/cardpin on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the base cache directory (~/.cache/cardpin on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(format!("{}.log", APP_NAME)))
}
