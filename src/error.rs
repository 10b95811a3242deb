use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown temperature band: {0}")]
    UnknownBand(String),

    #[error("unknown temperature unit: {0}")]
    UnknownUnit(String),

    #[error("unknown condition: {0}")]
    UnknownCondition(String),

    #[error("wind speed must be a non-negative number of mph, got {0}")]
    InvalidWindSpeed(f64),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("duplicate catalog id: {0}")]
    DuplicateItem(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("failed to write config: {0}")]
    ConfigWrite(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
