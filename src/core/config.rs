use crate::core::currency::Currency;
use crate::core::query::QueryParams;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBU_BASE_URL: &str = "https://bank.gov.ua";
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_ROLLING_WINDOW: usize = 7;
pub const DEFAULT_EXPORT_DIR: &str = "data";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NbuProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub nbu: Option<NbuProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            nbu: Some(NbuProviderConfig {
                base_url: DEFAULT_NBU_BASE_URL.to_string(),
            }),
        }
    }
}

fn default_currencies() -> Vec<Currency> {
    Currency::ALL.to_vec()
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<Currency>,
    /// Number of published daily rates per series.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    /// Calendar days probed per series; twice `window_days` when unset.
    pub lookback_days: Option<u32>,
    pub export_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currencies: default_currencies(),
            window_days: DEFAULT_WINDOW_DAYS,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            lookback_days: None,
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "hryvnia", "hryvnia")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn nbu_base_url(&self) -> &str {
        self.providers
            .nbu
            .as_ref()
            .map_or(DEFAULT_NBU_BASE_URL, |p| &p.base_url)
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(self.export_dir.as_deref().unwrap_or(DEFAULT_EXPORT_DIR))
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            currencies: self.currencies.clone(),
            window_days: self.window_days,
            lookback_days: self
                .lookback_days
                .unwrap_or_else(|| self.window_days.saturating_mul(2)),
            rolling_window: self.rolling_window,
        }
    }
}
