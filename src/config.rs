use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::forecast::{BandTable, ConditionKeywords};
use crate::selection::{DisplayConfig, SafetyNetConfig, SelectionRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub windy_mph: f64,
    pub umbrella_max_wind_mph: f64,
    pub precip_likely_percent: f64,
    pub precip_heavy_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            windy_mph: 15.0,
            umbrella_max_wind_mph: 20.0,
            precip_likely_percent: 40.0,
            precip_heavy_percent: 70.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub catalog: CatalogConfig,
    pub thresholds: Thresholds,
    pub bands: BandTable,
    pub keywords: ConditionKeywords,
    pub display: DisplayConfig,
    pub rules: SelectionRules,
    pub safety_net: SafetyNetConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| EngineError::Io {
                        path: path.clone(),
                        source,
                    })?;
                EngineConfig::from_toml_str(&contents)?
            }
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| EngineError::ConfigParse(err.to_string()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| EngineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| EngineError::ConfigWrite(err.to_string()))?;
        std::fs::write(path, payload).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_f64("OUTFIT_WINDY_MPH") {
            self.thresholds.windy_mph = value;
        }
        if let Some(value) = env_f64("OUTFIT_UMBRELLA_MAX_WIND_MPH") {
            self.thresholds.umbrella_max_wind_mph = value;
        }
        if let Some(value) = env_f64("OUTFIT_PRECIP_LIKELY_PERCENT") {
            self.thresholds.precip_likely_percent = value;
        }
        if let Some(value) = env_f64("OUTFIT_PRECIP_HEAVY_PERCENT") {
            self.thresholds.precip_heavy_percent = value;
        }
        if let Ok(path) = env::var("OUTFIT_CATALOG_PATH") {
            if !path.trim().is_empty() {
                self.catalog.path = Some(PathBuf::from(path));
            }
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|value| value.trim().parse::<f64>().ok())
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var("OUTFIT_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/outfit.toml")))
}
