use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in};
use crate::errors::LedgerError;
use crate::ledger::DateFilter;

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Period used when `--period` is not given.
    pub default_period: String,
    pub items_per_page: usize,
    pub ui_color_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_snapshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-PH".into(),
            currency: "PHP".into(),
            default_period: DateFilter::default().to_string(),
            items_per_page: 10,
            ui_color_enabled: true,
            last_snapshot: None,
        }
    }
}

impl Config {
    pub fn period(&self) -> Result<DateFilter, LedgerError> {
        self.default_period.parse()
    }

    /// Applies `key=value` style edits coming from the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_ascii_uppercase(),
            "default_period" => {
                let period: DateFilter = value.parse()?;
                self.default_period = period.to_string();
            }
            "items_per_page" => {
                let per_page: usize = value.parse().map_err(|_| {
                    LedgerError::InvalidInput(format!("`{value}` is not a page size"))
                })?;
                if per_page == 0 {
                    return Err(LedgerError::InvalidInput("page size must be at least 1".into()));
                }
                self.items_per_page = per_page;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = value.parse().map_err(|_| {
                    LedgerError::InvalidInput(format!("`{value}` is not true or false"))
                })?;
            }
            "last_snapshot" => {
                self.last_snapshot = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(LedgerError::InvalidInput(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    /// The directory is created on first save, so read-only use never writes.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: config_file_in(&base),
        }
    }

    /// Loads the stored configuration, or defaults when none has been saved.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("default_period", "ALL_TIME").unwrap();
        assert_eq!(config.default_period, "all-time");
        assert!(config.set("items_per_page", "0").is_err());
        assert!(config.set("ui_color_enabled", "maybe").is_err());
        assert!(config.set("theme", "dark").is_err());
        config.set("currency", "usd").unwrap();
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/config.json")),
            PathBuf::from("/data/config.json.tmp")
        );
    }
}
