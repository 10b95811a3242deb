use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::{EngineConfig, Thresholds};
use crate::error::{EngineError, Result};
use crate::forecast::{
    primary_condition_label, Condition, ConditionDetector, ConditionFlags, TemperatureBand,
    TemperatureClassifier, TemperatureUnit,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastPeriod {
    #[serde(default)]
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: String,
    pub temperature: f64,
    #[serde(default = "default_unit")]
    pub temperature_unit: String,
    #[serde(default)]
    pub apparent_temperature_c: Option<f64>,
    #[serde(default)]
    pub wind_speed: String,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
}

fn default_unit() -> String {
    "F".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSpan {
    pub low: TemperatureBand,
    pub high: TemperatureBand,
}

impl BandSpan {
    pub fn single(band: TemperatureBand) -> Self {
        Self {
            low: band,
            high: band,
        }
    }

    pub fn widen(self, band: TemperatureBand) -> Self {
        Self {
            low: self.low.min(band),
            high: self.high.max(band),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub temperature_band: TemperatureBand,
    #[serde(default)]
    pub conditions: ConditionFlags,
    #[serde(default)]
    pub wind_speed_mph: f64,
    #[serde(default)]
    pub is_heavy_precipitation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_span: Option<BandSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_unit: Option<TemperatureUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<f64>,
}

impl ForecastSummary {
    pub fn new(band: TemperatureBand, conditions: ConditionFlags, wind_speed_mph: f64) -> Self {
        Self {
            temperature_band: band,
            conditions,
            wind_speed_mph,
            is_heavy_precipitation: false,
            band_span: None,
            temperature: None,
            feels_like: None,
            temperature_unit: None,
            precipitation_probability: None,
        }
    }

    pub fn with_heavy_precipitation(mut self, heavy: bool) -> Self {
        self.is_heavy_precipitation = heavy;
        self
    }

    pub fn with_band_span(mut self, span: BandSpan) -> Self {
        self.band_span = Some(span);
        self
    }

    pub fn span(&self) -> BandSpan {
        self.band_span
            .unwrap_or_else(|| BandSpan::single(self.temperature_band))
    }

    pub fn primary_condition(&self) -> &'static str {
        primary_condition_label(&self.conditions)
    }
}

pub fn parse_wind_speed(value: &str) -> f64 {
    let digits: String = value
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

pub fn check_wind_speed(mph: f64) -> Result<f64> {
    if mph >= 0.0 {
        Ok(mph)
    } else {
        Err(EngineError::InvalidWindSpeed(mph))
    }
}

fn is_heavy(thresholds: &Thresholds, flags: &ConditionFlags, precipitation_percent: f64) -> bool {
    precipitation_percent >= thresholds.precip_heavy_percent
        && flags.any(&[Condition::Rainy, Condition::Snowy, Condition::Thunderstorm])
}

#[derive(Debug, Clone)]
pub struct ForecastProcessor {
    classifier: TemperatureClassifier,
    detector: ConditionDetector,
    thresholds: Thresholds,
    window_periods: usize,
}

impl ForecastProcessor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: TemperatureClassifier::new(config.bands.clone()),
            detector: ConditionDetector::new(config.keywords.clone(), config.thresholds.clone()),
            thresholds: config.thresholds.clone(),
            window_periods: config.safety_net.window_periods,
        }
    }

    pub fn summarize(&self, period: &ForecastPeriod) -> Result<ForecastSummary> {
        let unit = TemperatureUnit::from_str(&period.temperature_unit)?;
        let band = self.classifier.classify(period.temperature, unit);
        let wind = parse_wind_speed(&period.wind_speed);
        let precipitation = period.precipitation_probability.unwrap_or(0.0);
        let conditions = self.detector.detect(
            &period.short_forecast,
            &period.detailed_forecast,
            wind,
            precipitation,
            band,
        );
        let feels_like = match (period.apparent_temperature_c, unit) {
            (Some(celsius), TemperatureUnit::Fahrenheit) => Some(celsius * 9.0 / 5.0 + 32.0),
            (Some(celsius), TemperatureUnit::Celsius) => Some(celsius),
            (None, _) => Some(period.temperature),
        };

        Ok(ForecastSummary {
            temperature_band: band,
            is_heavy_precipitation: is_heavy(&self.thresholds, &conditions, precipitation),
            conditions,
            wind_speed_mph: wind,
            band_span: None,
            temperature: Some(period.temperature),
            feels_like,
            temperature_unit: Some(unit),
            precipitation_probability: Some(precipitation),
        })
    }

    pub fn summarize_window(&self, periods: &[ForecastPeriod]) -> Result<Option<ForecastSummary>> {
        let Some(first) = periods.first() else {
            return Ok(None);
        };
        let mut summary = self.summarize(first)?;
        let mut span = BandSpan::single(summary.temperature_band);
        for period in periods.iter().take(self.window_periods.max(1)).skip(1) {
            let unit = TemperatureUnit::from_str(&period.temperature_unit)?;
            span = span.widen(self.classifier.classify(period.temperature, unit));
        }
        summary.band_span = Some(span);
        Ok(Some(summary))
    }

    pub fn simulate(
        &self,
        band: TemperatureBand,
        conditions: ConditionFlags,
        wind_speed_mph: f64,
        precipitation_percent: f64,
    ) -> ForecastSummary {
        let heavy = is_heavy(&self.thresholds, &conditions, precipitation_percent);
        let mut summary = ForecastSummary::new(band, conditions, wind_speed_mph)
            .with_heavy_precipitation(heavy);
        summary.precipitation_probability = Some(precipitation_percent);
        summary
    }
}
