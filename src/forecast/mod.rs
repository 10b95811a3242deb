pub mod conditions;
pub mod summary;
pub mod temperature;

pub use conditions::{
    primary_condition, primary_condition_label, Condition, ConditionDetector, ConditionFlags,
    ConditionKeywords,
};
pub use summary::{
    check_wind_speed, parse_wind_speed, BandSpan, ForecastPeriod, ForecastProcessor,
    ForecastSummary,
};
pub use temperature::{
    fahrenheit_to_celsius, BandRule, BandTable, TemperatureBand, TemperatureClassifier,
    TemperatureUnit,
};
