pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use crate::catalog::{Catalog, Category, GarmentRecord, GarmentType, Layer, Resistance};
pub use crate::config::EngineConfig;
pub use crate::error::{EngineError, Result};
pub use crate::forecast::{
    Condition, ConditionFlags, ForecastPeriod, ForecastSummary, TemperatureBand, TemperatureUnit,
};
pub use crate::selection::{Engine, SelectionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub primary_condition: String,
    pub forecast: ForecastSummary,
    pub selection: SelectionResult,
}

pub fn recommend(engine: &Engine, forecast: ForecastSummary, category: Category) -> Recommendation {
    let selection = engine.select(&forecast, category);
    Recommendation {
        category,
        primary_condition: forecast.primary_condition().to_string(),
        forecast,
        selection,
    }
}

pub fn recommend_for_periods(
    engine: &Engine,
    periods: &[ForecastPeriod],
    category: Category,
) -> Result<Option<Recommendation>> {
    let summary = engine.processor().summarize_window(periods)?;
    Ok(summary.map(|forecast| recommend(engine, forecast, category)))
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

pub fn format_conditions(flags: &ConditionFlags) -> String {
    let names: Vec<&str> = flags.active().map(Condition::name).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
