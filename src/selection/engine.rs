use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, GarmentType, Layer, Resistance};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::forecast::{Condition, ForecastProcessor, ForecastSummary, TemperatureBand};
use crate::selection::{
    Candidate, CandidateFilter, Cascade, Exclusion, ItemGroup, OutfitSlots, PresentationGrouper,
    SafetyNet, SelectedItem,
};

use Condition::*;
use TemperatureBand::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRules {
    pub dress_shirts: Vec<String>,
    pub undershirt: String,
    pub light_overcoat: String,
    pub insulated_boots: String,
    pub rain_boots: String,
    pub hiking_boots: String,
    pub weatherproof_sneakers: String,
    pub leather_shoes: String,
    pub light_gloves: String,
    pub heavy_gloves: String,
    pub light_scarf: String,
    pub warm_scarf: String,
    pub exclusions: Vec<Exclusion>,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self {
            dress_shirts: vec![
                "shirt-base-professional-light".to_string(),
                "shirt-base-professional-medium".to_string(),
                "shirt-base-professional-heavy".to_string(),
            ],
            undershirt: "shirt-base-tee".to_string(),
            light_overcoat: "coat-outer-professional-light".to_string(),
            insulated_boots: "boots-insulated".to_string(),
            rain_boots: "boots-rain".to_string(),
            hiking_boots: "boots-hiking".to_string(),
            weatherproof_sneakers: "sneakers-casual-resistant".to_string(),
            leather_shoes: "shoes-professional-leather".to_string(),
            light_gloves: "gloves-light".to_string(),
            heavy_gloves: "gloves-heavy".to_string(),
            light_scarf: "scarf-light".to_string(),
            warm_scarf: "scarf-warm".to_string(),
            exclusions: vec![
                Exclusion::new("pants-outer-casual-jeans", &[Rainy, Drizzling]),
                Exclusion::new("sneakers-casual-light", &[Rainy, Drizzling, Snowy]),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_items: Vec<SelectedItem>,
    pub prominent_item_key: Option<String>,
    pub grouped_items: Vec<ItemGroup>,
    pub warnings: Vec<String>,
}

impl SelectionResult {
    pub fn get(&self, key: &str) -> Option<&SelectedItem> {
        self.selected_items.iter().find(|entry| entry.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.selected_items.iter().map(|entry| entry.key.as_str())
    }

    pub fn count_of(&self, types: &[GarmentType]) -> usize {
        self.selected_items
            .iter()
            .filter(|entry| types.contains(&entry.item.garment_type))
            .count()
    }

    pub fn prominent(&self) -> Option<&SelectedItem> {
        self.prominent_item_key
            .as_deref()
            .and_then(|key| self.get(key))
    }

    pub fn is_grouped(&self, key: &str) -> bool {
        self.grouped_items
            .iter()
            .any(|group| group.items.iter().any(|entry| entry.key == key))
    }
}

fn find_id<'a>(pool: &[Candidate<'a>], id: &str) -> Option<Candidate<'a>> {
    pool.iter().find(|candidate| candidate.key == id).copied()
}

fn first_of<'a>(pool: &[Candidate<'a>], garment_type: GarmentType) -> Option<Candidate<'a>> {
    pool.iter()
        .find(|candidate| candidate.item.garment_type == garment_type)
        .copied()
}

fn first_special<'a>(pool: &[Candidate<'a>], conditions: &[Condition]) -> Option<Candidate<'a>> {
    pool.iter()
        .find(|candidate| candidate.item.has_special(conditions))
        .copied()
}

#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
    processor: ForecastProcessor,
}

impl Engine {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        for garment_type in catalog.unmapped_types(&config.display) {
            tracing::warn!(
                garment_type = garment_type.label(),
                group = config.display.fallback_group.as_str(),
                "garment type has no display group"
            );
        }
        let processor = ForecastProcessor::new(&config);
        Self {
            catalog,
            config,
            processor,
        }
    }

    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let catalog = match config.catalog.path.as_ref() {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        Ok(Engine::new(catalog, config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn processor(&self) -> &ForecastProcessor {
        &self.processor
    }

    pub fn select(&self, forecast: &ForecastSummary, category: Category) -> SelectionResult {
        let band = forecast.temperature_band;
        let filter = CandidateFilter::new(
            &self.catalog,
            category,
            band,
            &forecast.conditions,
            &self.config.rules.exclusions,
        );

        let mut slots = OutfitSlots::default();
        slots.base_top = self.pick_base_top(&filter, forecast);
        slots.undershirt = self.pick_undershirt(category, slots.base_top);
        slots.bottom = self.pick_bottom(&filter, forecast);
        slots.base_bottom = self.pick_base_bottom(&filter, band, slots.bottom);
        slots.socks = filter
            .candidates(&[GarmentType::Socks], Some(Layer::Single))
            .first()
            .copied();
        slots.footwear = self.pick_footwear(&filter, forecast);
        slots.mid = self.pick_mid(&filter, band);
        slots.outer = self.pick_outer(&filter, category, forecast);
        slots.accessories = self.pick_accessories(&filter, category, forecast);

        let warnings = SafetyNet::new(&self.catalog, &self.config.safety_net).fill(
            &mut slots,
            &filter,
            forecast,
        );
        // fallbacks can change the base top and bottom, so their companions are re-derived
        if slots.undershirt.is_none() {
            slots.undershirt = self.pick_undershirt(category, slots.base_top);
        }
        if slots.base_bottom.is_none() {
            slots.base_bottom = self.pick_base_bottom(&filter, band, slots.bottom);
        }

        let prominent_item_key = slots.prominent().map(|candidate| candidate.key.to_string());
        let selected_items = slots.assemble();
        let grouped_items = PresentationGrouper::new(&self.config.display, &self.config.rules)
            .group(&selected_items, prominent_item_key.as_deref(), category);

        tracing::debug!(
            category = category.label(),
            band = band.label(),
            items = selected_items.len(),
            prominent = prominent_item_key.as_deref().unwrap_or("none"),
            "outfit selected"
        );

        SelectionResult {
            selected_items,
            prominent_item_key,
            grouped_items,
            warnings,
        }
    }

    fn pick_base_top<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        forecast: &ForecastSummary,
    ) -> Option<Candidate<'a>> {
        let pool = filter.candidates(&[GarmentType::Shirt], Some(Layer::Base));
        let sunny_and_warm = forecast.conditions.is(Sunny)
            && forecast.temperature_band.is_one_of(&[Hot, Warm, Mild]);

        let cascade = Cascade::new("base-top")
            .rule(
                "sun-protection",
                || sunny_and_warm,
                || pool.iter().find(|candidate| candidate.item.sun_protection).copied(),
            )
            .rule("warmest", || true, || pool.first().copied());
        cascade.resolve()
    }

    fn pick_undershirt<'a>(
        &'a self,
        category: Category,
        base_top: Option<Candidate<'_>>,
    ) -> Option<Candidate<'a>> {
        let rules = &self.config.rules;
        let top = base_top?;
        if category != Category::Professional || !rules.dress_shirts.iter().any(|id| id == top.key) {
            return None;
        }
        let undershirt = self.catalog.get(&rules.undershirt);
        if undershirt.is_none() {
            tracing::warn!(item = rules.undershirt.as_str(), "undershirt missing from catalog");
        }
        undershirt.map(|item| Candidate {
            key: rules.undershirt.as_str(),
            item,
        })
    }

    fn pick_bottom<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        forecast: &ForecastSummary,
    ) -> Option<Candidate<'a>> {
        let flags = &forecast.conditions;
        let pants = filter.candidates(&[GarmentType::Pants], Some(Layer::Outer));
        let shorts = filter.candidates(&[GarmentType::Shorts], Some(Layer::Outer));

        let cascade = Cascade::new("bottom")
            .rule(
                "precipitation-pants",
                || flags.any(&[Rainy, Drizzling, Snowy]),
                || first_special(&pants, &[Rainy, Drizzling, Snowy, Thunderstorm]),
            )
            .rule("shorts", || true, || shorts.first().copied())
            .rule("pants", || true, || pants.first().copied());
        cascade.resolve()
    }

    fn pick_base_bottom<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        band: TemperatureBand,
        bottom: Option<Candidate<'_>>,
    ) -> Option<Candidate<'a>> {
        let wearing_pants =
            bottom.is_some_and(|candidate| candidate.item.garment_type == GarmentType::Pants);
        if !wearing_pants || !band.is_one_of(&[Cold, Frigid, Freezing]) {
            return None;
        }
        filter
            .candidates(&[GarmentType::BasePants], None)
            .first()
            .copied()
    }

    fn pick_footwear<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        forecast: &ForecastSummary,
    ) -> Option<Candidate<'a>> {
        let rules = &self.config.rules;
        let flags = &forecast.conditions;
        let band = forecast.temperature_band;
        let pool = filter.candidates(
            &[GarmentType::Boots, GarmentType::Sneakers, GarmentType::Shoes],
            None,
        );
        let rough_weather = || flags.any(&[Rainy, Drizzling, Snowy, Windy]) || band == Cold;

        let cascade = Cascade::new("footwear")
            .rule(
                "insulated-boots",
                || flags.any(&[Snowy, Severe]) || band.is_one_of(&[Frigid, Freezing]),
                || find_id(&pool, &rules.insulated_boots),
            )
            .rule(
                "rain-boots",
                || flags.any(&[Rainy, Drizzling]) && forecast.is_heavy_precipitation,
                || find_id(&pool, &rules.rain_boots),
            )
            .rule(
                "hiking-boots",
                || flags.any(&[Rainy, Drizzling, Snowy]) || band.is_one_of(&[Cold, Frigid]),
                || find_id(&pool, &rules.hiking_boots),
            )
            .rule("weatherproof-sneakers", rough_weather, || {
                find_id(&pool, &rules.weatherproof_sneakers)
            })
            .rule("leather-shoes", rough_weather, || {
                find_id(&pool, &rules.leather_shoes)
            })
            .rule("first-boot", || true, || first_of(&pool, GarmentType::Boots))
            .rule("first-sneaker", || true, || {
                first_of(&pool, GarmentType::Sneakers)
            })
            .rule("first-shoe", || true, || first_of(&pool, GarmentType::Shoes));
        cascade.resolve()
    }

    fn pick_mid<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        band: TemperatureBand,
    ) -> Option<Candidate<'a>> {
        if !band.is_one_of(&[Mild, Crisp, Cold, Frigid]) {
            return None;
        }
        filter
            .candidates(&[GarmentType::Sweater], Some(Layer::Mid))
            .first()
            .copied()
    }

    fn pick_outer<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        category: Category,
        forecast: &ForecastSummary,
    ) -> Option<Candidate<'a>> {
        let flags = &forecast.conditions;
        let band = forecast.temperature_band;
        let needed = band.is_one_of(&[Mild, Crisp, Cold, Frigid, Freezing])
            || flags.any(&[Rainy, Drizzling, Snowy, Windy, Severe, Thunderstorm]);
        if !needed {
            return None;
        }

        let pool = filter.candidates(&[GarmentType::Jacket, GarmentType::Coat], Some(Layer::Outer));
        let wet = flags.any(&[Rainy, Drizzling, Thunderstorm]);
        let gusty = flags.is(Windy) && !flags.any(&[Rainy, Snowy]);
        let wintry = flags.any(&[Snowy, Severe]) || band.is_one_of(&[Frigid, Freezing]);
        let windproof =
            |candidate: &&Candidate<'a>| candidate.item.wind_resistance == Resistance::Proof;

        let cascade = Cascade::new("outer")
            .rule(
                "rain-shell",
                || wet,
                || first_special(&pool, &[Rainy, Drizzling, Thunderstorm]),
            )
            .rule(
                "professional-overcoat",
                || wet && category == Category::Professional,
                || find_id(&pool, &self.config.rules.light_overcoat),
            )
            .rule(
                "windproof-for-wind",
                || gusty,
                || {
                    pool.iter()
                        .filter(windproof)
                        .find(|candidate| candidate.item.has_special(&[Windy]))
                        .copied()
                },
            )
            .rule("windproof", || gusty, || pool.iter().find(windproof).copied())
            .rule(
                "snow-shell",
                || wintry,
                || first_special(&pool, &[Snowy, Severe]),
            )
            .rule("warmest-for-winter", || wintry, || pool.first().copied())
            .rule("warmest", || true, || pool.first().copied());
        cascade.resolve()
    }

    fn pick_accessories<'a>(
        &self,
        filter: &CandidateFilter<'a>,
        category: Category,
        forecast: &ForecastSummary,
    ) -> Vec<Candidate<'a>> {
        let rules = &self.config.rules;
        let flags = &forecast.conditions;
        let band = forecast.temperature_band;
        let mut picked = Vec::new();

        if flags.any(&[Sunny, Scorching]) {
            picked.extend(
                filter
                    .candidates(&[GarmentType::Sunglasses], None)
                    .first()
                    .copied(),
            );
        }

        let hats = filter.candidates(&[GarmentType::Hat], None);
        let hat = Cascade::new("hat")
            .rule(
                "sun-hat",
                || flags.is(Sunny) && band.is_one_of(&[Dangerous, Hot, Warm, Mild]),
                || hats.iter().find(|candidate| candidate.item.sun_protection).copied(),
            )
            .rule(
                "snow-hat",
                || flags.is(Snowy) && band.is_one_of(&[Crisp, Cold, Frigid, Freezing]),
                || first_special(&hats, &[Snowy]),
            )
            .rule(
                "warm-hat",
                || band.is_one_of(&[Crisp, Cold, Frigid, Freezing]),
                || hats.first().copied(),
            )
            .resolve();
        picked.extend(hat);

        let gloves = filter.candidates(&[GarmentType::Gloves], None);
        let glove_id = if band.is_one_of(&[Crisp, Cold]) {
            Some(&rules.light_gloves)
        } else if band.is_one_of(&[Frigid, Freezing]) {
            Some(&rules.heavy_gloves)
        } else {
            None
        };
        if let Some(id) = glove_id {
            picked.extend(find_id(&gloves, id).or_else(|| gloves.first().copied()));
        }

        let scarves = filter.candidates(&[GarmentType::Scarf], None);
        let scarf_id = if band.is_one_of(&[Mild, Crisp]) {
            Some(&rules.light_scarf)
        } else if band.is_one_of(&[Cold, Frigid, Freezing]) {
            Some(&rules.warm_scarf)
        } else {
            None
        };
        if let Some(id) = scarf_id {
            picked.extend(find_id(&scarves, id).or_else(|| scarves.first().copied()));
        }

        let wants_umbrella = flags.any(&[Rainy, Drizzling, Thunderstorm])
            && forecast.wind_speed_mph < self.config.thresholds.umbrella_max_wind_mph
            && category != Category::Hiking;
        if wants_umbrella {
            picked.extend(
                filter
                    .candidates(&[GarmentType::Umbrella], None)
                    .first()
                    .copied(),
            );
        }

        picked
    }
}
