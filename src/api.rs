use serde::{Deserialize, Serialize};
use std::str::FromStr;

use outfit_advisor::forecast::check_wind_speed;
use outfit_advisor::selection::ItemGroup;
use outfit_advisor::{
    Category, Condition, ConditionFlags, Engine, ForecastPeriod, ForecastSummary, GarmentRecord,
    Recommendation, TemperatureBand,
};

#[derive(Debug, Deserialize)]
pub struct ApiRecommendRequest {
    pub request_id: Option<String>,
    pub category: Option<String>,
    pub forecast: Option<ForecastSummary>,
    pub periods: Option<Vec<ForecastPeriod>>,
    pub band: Option<String>,
    pub conditions: Option<Vec<String>>,
    pub wind_mph: Option<f64>,
    pub precipitation_probability: Option<f64>,
}

impl ApiRecommendRequest {
    pub fn into_input(self, engine: &Engine) -> Result<(ForecastSummary, Category), String> {
        let category = match self.category.as_deref() {
            Some(value) => Category::from_str(value).map_err(|err| err.to_string())?,
            None => Category::Casual,
        };

        if let Some(forecast) = self.forecast {
            check_wind_speed(forecast.wind_speed_mph).map_err(|err| err.to_string())?;
            return Ok((forecast, category));
        }

        if let Some(periods) = self.periods {
            let summary = engine
                .processor()
                .summarize_window(&periods)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| "periods must not be empty".to_string())?;
            return Ok((summary, category));
        }

        let band = self
            .band
            .as_deref()
            .ok_or_else(|| "one of forecast, periods or band is required".to_string())?;
        let band = TemperatureBand::from_str(band).map_err(|err| err.to_string())?;
        let conditions = self
            .conditions
            .unwrap_or_default()
            .iter()
            .map(|name| Condition::from_str(name).map_err(|err| err.to_string()))
            .collect::<Result<ConditionFlags, String>>()?;
        let wind = check_wind_speed(self.wind_mph.unwrap_or(0.0)).map_err(|err| err.to_string())?;
        let precipitation = self.precipitation_probability.unwrap_or(0.0).clamp(0.0, 100.0);

        Ok((
            engine
                .processor()
                .simulate(band, conditions, wind, precipitation),
            category,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiRecommendResponse {
    pub request_id: String,
    pub category: Category,
    pub primary_condition: String,
    pub forecast: ForecastSummary,
    pub prominent_item: Option<ApiItem>,
    pub selected_items: Vec<ApiItem>,
    pub grouped_items: Vec<ItemGroup>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiItem {
    pub id: String,
    #[serde(flatten)]
    pub item: GarmentRecord,
}

impl ApiRecommendResponse {
    pub fn from_output(output: Recommendation, request_id: String) -> Self {
        let selection = output.selection;
        let prominent_item = selection.prominent().map(|entry| ApiItem {
            id: entry.key.clone(),
            item: entry.item.clone(),
        });
        Self {
            request_id,
            category: output.category,
            primary_condition: output.primary_condition,
            forecast: output.forecast,
            prominent_item,
            selected_items: selection
                .selected_items
                .into_iter()
                .map(|entry| ApiItem {
                    id: entry.key,
                    item: entry.item,
                })
                .collect(),
            grouped_items: selection.grouped_items,
            warnings: selection.warnings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}
