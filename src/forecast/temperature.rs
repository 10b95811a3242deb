use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Discrete temperature classification. Variants are declared coldest first so the
/// derived ordering doubles as the position on the temperature scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemperatureBand {
    Freezing,
    Frigid,
    Cold,
    Crisp,
    Mild,
    Warm,
    Hot,
    Dangerous,
}

impl TemperatureBand {
    pub const ALL: [TemperatureBand; 8] = [
        TemperatureBand::Freezing,
        TemperatureBand::Frigid,
        TemperatureBand::Cold,
        TemperatureBand::Crisp,
        TemperatureBand::Mild,
        TemperatureBand::Warm,
        TemperatureBand::Hot,
        TemperatureBand::Dangerous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TemperatureBand::Freezing => "Freezing",
            TemperatureBand::Frigid => "Frigid",
            TemperatureBand::Cold => "Cold",
            TemperatureBand::Crisp => "Crisp",
            TemperatureBand::Mild => "Mild",
            TemperatureBand::Warm => "Warm",
            TemperatureBand::Hot => "Hot",
            TemperatureBand::Dangerous => "Dangerous",
        }
    }

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn is_one_of(self, bands: &[TemperatureBand]) -> bool {
        bands.contains(&self)
    }
}

impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for TemperatureBand {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        TemperatureBand::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownBand(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }

    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(value),
            TemperatureUnit::Celsius => value,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            _ => Err(EngineError::UnknownUnit(value.to_string())),
        }
    }
}

pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    (value - 32.0) * 5.0 / 9.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRule {
    pub band: TemperatureBand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_c: Option<f64>,
}

impl BandRule {
    fn fahrenheit(band: TemperatureBand, min_f: Option<f64>, max_f: Option<f64>) -> Self {
        Self {
            band,
            min_c: min_f.map(fahrenheit_to_celsius),
            max_c: max_f.map(fahrenheit_to_celsius),
        }
    }

    pub fn matches(&self, celsius: f64) -> bool {
        match (self.min_c, self.max_c) {
            (Some(min), Some(max)) => celsius >= min && celsius <= max,
            (Some(min), None) => celsius >= min,
            (None, Some(max)) => celsius <= max,
            (None, None) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandTable {
    pub default_band: TemperatureBand,
    pub rules: Vec<BandRule>,
}

impl Default for BandTable {
    fn default() -> Self {
        use TemperatureBand::*;
        Self {
            default_band: Mild,
            rules: vec![
                BandRule::fahrenheit(Dangerous, Some(95.0), None),
                BandRule::fahrenheit(Hot, Some(80.0), Some(95.0)),
                BandRule::fahrenheit(Warm, Some(70.0), Some(80.0)),
                BandRule::fahrenheit(Mild, Some(58.0), Some(70.0)),
                BandRule::fahrenheit(Crisp, Some(45.0), Some(58.0)),
                BandRule::fahrenheit(Cold, Some(32.0), Some(45.0)),
                BandRule::fahrenheit(Frigid, Some(20.0), Some(32.0)),
                BandRule::fahrenheit(Freezing, None, Some(20.0)),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemperatureClassifier {
    table: BandTable,
}

impl TemperatureClassifier {
    pub fn new(table: BandTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, value: f64, unit: TemperatureUnit) -> TemperatureBand {
        self.classify_celsius(unit.to_celsius(value))
    }

    /// First matching rule wins; values no rule claims (NaN, gaps in a custom table)
    /// fall back to the table's default band.
    pub fn classify_celsius(&self, celsius: f64) -> TemperatureBand {
        self.table
            .rules
            .iter()
            .find(|rule| rule.matches(celsius))
            .map(|rule| rule.band)
            .unwrap_or(self.table.default_band)
    }

    pub fn rules(&self) -> &[BandRule] {
        &self.table.rules
    }

    pub fn default_band(&self) -> TemperatureBand {
        self.table.default_band
    }
}
