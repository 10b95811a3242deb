use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::config::Thresholds;
use crate::error::EngineError;
use crate::forecast::TemperatureBand;

/// Weather condition flags. Declaration order is the display priority used by
/// [`primary_condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Severe,
    Thunderstorm,
    Snowy,
    Rainy,
    Drizzling,
    Scorching,
    Windy,
    Foggy,
    Cloudy,
    Sunny,
}

impl Condition {
    pub const PRIORITY: [Condition; 10] = [
        Condition::Severe,
        Condition::Thunderstorm,
        Condition::Snowy,
        Condition::Rainy,
        Condition::Drizzling,
        Condition::Scorching,
        Condition::Windy,
        Condition::Foggy,
        Condition::Cloudy,
        Condition::Sunny,
    ];

    /// Keyword scan order. The precipitation hierarchy must be settled before the
    /// weaker flags so the suppression checks see the stronger ones.
    const DETECTION_ORDER: [Condition; 9] = [
        Condition::Severe,
        Condition::Thunderstorm,
        Condition::Snowy,
        Condition::Rainy,
        Condition::Drizzling,
        Condition::Foggy,
        Condition::Cloudy,
        Condition::Sunny,
        Condition::Windy,
    ];

    pub const PRECIPITATION: [Condition; 5] = [
        Condition::Rainy,
        Condition::Drizzling,
        Condition::Snowy,
        Condition::Thunderstorm,
        Condition::Severe,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Condition::Severe => "severe",
            Condition::Thunderstorm => "thunderstorm",
            Condition::Snowy => "snowy",
            Condition::Rainy => "rainy",
            Condition::Drizzling => "drizzling",
            Condition::Scorching => "scorching",
            Condition::Windy => "windy",
            Condition::Foggy => "foggy",
            Condition::Cloudy => "cloudy",
            Condition::Sunny => "sunny",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Severe => "Severe",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snowy => "Snowy",
            Condition::Rainy => "Rainy",
            Condition::Drizzling => "Drizzling",
            Condition::Scorching => "Scorching",
            Condition::Windy => "Windy",
            Condition::Foggy => "Foggy",
            Condition::Cloudy => "Cloudy",
            Condition::Sunny => "Sunny",
        }
    }

    pub fn flag_name(self) -> String {
        format!("is_{}", self.name())
    }

    pub fn from_flag_name(flag: &str) -> Option<Self> {
        let name = flag.strip_prefix("is_")?;
        Condition::PRIORITY
            .into_iter()
            .find(|condition| condition.name() == name)
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Condition::from_flag_name(&format!("is_{}", keyword.trim().to_lowercase()))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Condition {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().to_lowercase();
        Condition::from_flag_name(&trimmed)
            .or_else(|| Condition::from_keyword(&trimmed))
            .ok_or_else(|| EngineError::UnknownCondition(value.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Condition, bool>", into = "BTreeMap<Condition, bool>")]
pub struct ConditionFlags {
    active: BTreeSet<Condition>,
}

impl ConditionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is(&self, condition: Condition) -> bool {
        self.active.contains(&condition)
    }

    pub fn any(&self, conditions: &[Condition]) -> bool {
        conditions.iter().any(|condition| self.is(*condition))
    }

    pub fn set(&mut self, condition: Condition) {
        self.active.insert(condition);
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.set(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = Condition> + '_ {
        self.active.iter().copied()
    }

    pub fn matches_keywords(&self, keywords: &[String]) -> bool {
        keywords
            .iter()
            .filter_map(|keyword| Condition::from_keyword(keyword))
            .any(|condition| self.is(condition))
    }
}

impl FromIterator<Condition> for ConditionFlags {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<Condition, bool>> for ConditionFlags {
    fn from(map: BTreeMap<Condition, bool>) -> Self {
        map.into_iter()
            .filter(|(_, value)| *value)
            .map(|(condition, _)| condition)
            .collect()
    }
}

impl From<ConditionFlags> for BTreeMap<Condition, bool> {
    fn from(flags: ConditionFlags) -> Self {
        Condition::PRIORITY
            .into_iter()
            .map(|condition| (condition, flags.is(condition)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionKeywords {
    pub severe: Vec<String>,
    pub thunderstorm: Vec<String>,
    pub snowy: Vec<String>,
    pub rainy: Vec<String>,
    pub drizzling: Vec<String>,
    pub foggy: Vec<String>,
    pub cloudy: Vec<String>,
    pub sunny: Vec<String>,
    pub windy: Vec<String>,
    pub snow_hints: Vec<String>,
    pub clear_fallback: Vec<String>,
    pub cloud_fallback: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

impl Default for ConditionKeywords {
    fn default() -> Self {
        Self {
            severe: words(&[
                "hurricane",
                "tornado",
                "tropical storm",
                "severe thunderstorm",
                "blizzard",
            ]),
            thunderstorm: words(&["thunderstorm", "t-storm", "lightning"]),
            snowy: words(&["snow", "sleet", "flurries", "ice pellets", "wintry mix"]),
            rainy: words(&["rain", "showers"]),
            drizzling: words(&["drizzle", "sprinkles"]),
            foggy: words(&["fog", "haze", "mist"]),
            cloudy: words(&["cloudy", "overcast"]),
            sunny: words(&["sunny", "clear"]),
            windy: words(&["windy", "breezy", "gusty"]),
            snow_hints: words(&["snow", "sleet", "flurries"]),
            clear_fallback: words(&["clear", "sunny"]),
            cloud_fallback: words(&["cloud", "overcast"]),
        }
    }
}

impl ConditionKeywords {
    pub fn for_condition(&self, condition: Condition) -> &[String] {
        match condition {
            Condition::Severe => &self.severe,
            Condition::Thunderstorm => &self.thunderstorm,
            Condition::Snowy => &self.snowy,
            Condition::Rainy => &self.rainy,
            Condition::Drizzling => &self.drizzling,
            Condition::Foggy => &self.foggy,
            Condition::Cloudy => &self.cloudy,
            Condition::Sunny => &self.sunny,
            Condition::Windy => &self.windy,
            Condition::Scorching => &[],
        }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

#[derive(Debug, Clone)]
pub struct ConditionDetector {
    keywords: ConditionKeywords,
    thresholds: Thresholds,
}

impl ConditionDetector {
    pub fn new(keywords: ConditionKeywords, thresholds: Thresholds) -> Self {
        Self {
            keywords,
            thresholds,
        }
    }

    pub fn detect(
        &self,
        short_forecast: &str,
        detailed_forecast: &str,
        wind_mph: f64,
        precipitation_percent: f64,
        band: TemperatureBand,
    ) -> ConditionFlags {
        let text = format!("{} {}", short_forecast, detailed_forecast).to_lowercase();
        let mut flags = ConditionFlags::new();

        for condition in Condition::DETECTION_ORDER {
            if self.suppressed(condition, &flags) {
                continue;
            }
            if contains_any(&text, self.keywords.for_condition(condition)) {
                flags.set(condition);
            }
        }

        if wind_mph >= self.thresholds.windy_mph {
            flags.set(Condition::Windy);
        }

        if precipitation_percent >= self.thresholds.precip_likely_percent
            && !flags.any(&Condition::PRECIPITATION)
        {
            if contains_any(&text, &self.keywords.snow_hints) {
                flags.set(Condition::Snowy);
            } else if precipitation_percent >= self.thresholds.precip_heavy_percent {
                flags.set(Condition::Rainy);
            } else {
                flags.set(Condition::Drizzling);
            }
        }

        if band == TemperatureBand::Dangerous {
            flags.set(Condition::Scorching);
        }

        if !flags.any(&Condition::PRIORITY) {
            if contains_any(&text, &self.keywords.clear_fallback) {
                flags.set(Condition::Sunny);
            } else if contains_any(&text, &self.keywords.cloud_fallback) {
                flags.set(Condition::Cloudy);
            }
        }

        flags
    }

    fn suppressed(&self, condition: Condition, flags: &ConditionFlags) -> bool {
        match condition {
            Condition::Rainy => flags.any(&[Condition::Thunderstorm, Condition::Severe]),
            Condition::Drizzling => flags.any(&[
                Condition::Rainy,
                Condition::Thunderstorm,
                Condition::Severe,
            ]),
            Condition::Snowy => flags.is(Condition::Severe),
            _ => false,
        }
    }
}

pub fn primary_condition(flags: &ConditionFlags) -> Option<Condition> {
    Condition::PRIORITY
        .into_iter()
        .find(|condition| flags.is(*condition))
}

pub fn primary_condition_label(flags: &ConditionFlags) -> &'static str {
    primary_condition(flags)
        .map(Condition::label)
        .unwrap_or("Variable")
}
