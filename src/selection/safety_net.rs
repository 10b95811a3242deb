use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, GarmentRecord, GarmentType};
use crate::forecast::{BandSpan, ForecastSummary};
use crate::selection::{Candidate, CandidateFilter, OutfitSlots};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyNetConfig {
    pub enabled: bool,
    pub current_band_bonus: i32,
    pub raw_candidate_bonus: i32,
    pub score_floor: i32,
    pub window_periods: usize,
}

impl Default for SafetyNetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            current_band_bonus: 5,
            raw_candidate_bonus: 2,
            score_floor: -1,
            window_periods: 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssentialSlot {
    Top,
    Bottom,
    Footwear,
}

impl EssentialSlot {
    pub const ALL: [EssentialSlot; 3] = [
        EssentialSlot::Top,
        EssentialSlot::Bottom,
        EssentialSlot::Footwear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EssentialSlot::Top => "top",
            EssentialSlot::Bottom => "bottom",
            EssentialSlot::Footwear => "footwear",
        }
    }

    pub fn types(self) -> &'static [GarmentType] {
        match self {
            EssentialSlot::Top => &[GarmentType::Shirt],
            EssentialSlot::Bottom => &[GarmentType::Pants, GarmentType::Shorts],
            EssentialSlot::Footwear => &[
                GarmentType::Shoes,
                GarmentType::Boots,
                GarmentType::Sneakers,
            ],
        }
    }

    fn is_filled(self, slots: &OutfitSlots<'_>) -> bool {
        match self {
            EssentialSlot::Top => slots.has_top(),
            EssentialSlot::Bottom => slots.has_bottom(),
            EssentialSlot::Footwear => slots.has_footwear(),
        }
    }
}

fn overlap(a: (usize, usize), b: (usize, usize)) -> i32 {
    let low = a.0.max(b.0);
    let high = a.1.min(b.1);
    if high >= low {
        (high - low + 1) as i32
    } else {
        0
    }
}

pub struct SafetyNet<'a> {
    catalog: &'a Catalog,
    config: &'a SafetyNetConfig,
}

impl<'a> SafetyNet<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a SafetyNetConfig) -> Self {
        Self { catalog, config }
    }

    pub fn score(
        &self,
        item: &GarmentRecord,
        forecast: &ForecastSummary,
        raw_candidate: bool,
    ) -> i32 {
        let mut score = 0;
        let current = forecast.temperature_band.position();
        let span: BandSpan = forecast.span();
        if let Some(range) = item.band_range() {
            if range.0 <= current && current <= range.1 {
                score += self.config.current_band_bonus;
            }
            score += overlap(range, (span.low.position(), span.high.position()));
        }
        if raw_candidate {
            score += self.config.raw_candidate_bonus;
        }
        score
    }

    /// Best-scoring item of the slot's types, ignoring band and condition filters but
    /// keeping the category. Ties keep catalog order.
    pub fn best_fallback(
        &self,
        slot: EssentialSlot,
        filter: &CandidateFilter<'_>,
        forecast: &ForecastSummary,
    ) -> Option<Candidate<'a>> {
        let category = filter.category();
        let mut best: Option<(i32, Candidate<'a>)> = None;
        for (key, item) in self.catalog.iter() {
            if !slot.types().contains(&item.garment_type) || !item.fits_category(category) {
                continue;
            }
            let score = self.score(item, forecast, filter.is_raw_candidate(item));
            if score <= self.config.score_floor {
                continue;
            }
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, Candidate { key, item }));
            }
        }
        best.map(|(_, candidate)| candidate)
    }

    pub fn fill(
        &self,
        slots: &mut OutfitSlots<'a>,
        filter: &CandidateFilter<'_>,
        forecast: &ForecastSummary,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.config.enabled {
            return warnings;
        }

        for slot in EssentialSlot::ALL {
            if slot.is_filled(slots) {
                continue;
            }
            let Some(fallback) = self.best_fallback(slot, filter, forecast) else {
                let message = format!(
                    "No suitable {} found for {} in {} weather",
                    slot.label(),
                    filter.category(),
                    forecast.temperature_band
                );
                tracing::warn!(slot = slot.label(), "{}", message);
                warnings.push(message);
                continue;
            };

            tracing::warn!(
                slot = slot.label(),
                item = fallback.key,
                "filled empty slot with fallback item"
            );
            match slot {
                EssentialSlot::Top => slots.base_top = Some(fallback),
                // one bottom slot, so pants and shorts can never coexist
                EssentialSlot::Bottom => slots.bottom = Some(fallback),
                EssentialSlot::Footwear => slots.footwear = Some(fallback),
            }
        }
        warnings
    }
}
