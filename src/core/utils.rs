use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".rentease";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.rentease`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("RENTEASE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Location of the configuration file under `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
