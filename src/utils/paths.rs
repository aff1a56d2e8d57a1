use dirs::home_dir;
use std::{env, path::PathBuf};

pub const HOME_ENV: &str = "DONATION_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".donation_core";
const STORE_DIR: &str = "store";

/// Returns the application data directory, defaulting to `~/.donation_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the JSON backend's collections.
pub fn store_dir() -> PathBuf {
    app_data_dir().join(STORE_DIR)
}
