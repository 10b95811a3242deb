use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, GarmentRecord, GarmentType, Layer};
use crate::forecast::{Condition, ConditionFlags, TemperatureBand};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub item: String,
    pub when: Vec<Condition>,
}

impl Exclusion {
    pub fn new(item: &str, when: &[Condition]) -> Self {
        Self {
            item: item.to_string(),
            when: when.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub key: &'a str,
    pub item: &'a GarmentRecord,
}

pub struct CandidateFilter<'a> {
    catalog: &'a Catalog,
    category: Category,
    band: TemperatureBand,
    flags: &'a ConditionFlags,
    exclusions: &'a [Exclusion],
}

impl<'a> CandidateFilter<'a> {
    pub fn new(
        catalog: &'a Catalog,
        category: Category,
        band: TemperatureBand,
        flags: &'a ConditionFlags,
        exclusions: &'a [Exclusion],
    ) -> Self {
        Self {
            catalog,
            category,
            band,
            flags,
            exclusions,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_raw_candidate(&self, item: &GarmentRecord) -> bool {
        item.fits_category(self.category) && item.fits_band(self.band)
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.exclusions
            .iter()
            .any(|exclusion| exclusion.item == key && self.flags.any(&exclusion.when))
    }

    pub fn admits(&self, key: &str, item: &GarmentRecord) -> bool {
        self.is_raw_candidate(item)
            && item.special_conditions_met(self.flags)
            && !self.is_excluded(key)
    }

    /// Admitted items of the given types (and layer, when set), warmest first. Equal
    /// thermal values keep catalog order.
    pub fn candidates(&self, types: &[GarmentType], layer: Option<Layer>) -> Vec<Candidate<'a>> {
        let mut found: Vec<Candidate<'a>> = self
            .catalog
            .iter()
            .filter(|(_, item)| types.contains(&item.garment_type))
            .filter(|(_, item)| layer.map_or(true, |layer| item.layer == layer))
            .filter(|(key, item)| self.admits(key, item))
            .map(|(key, item)| Candidate { key, item })
            .collect();
        found.sort_by(|a, b| b.item.thermal_value.cmp(&a.item.thermal_value));
        found
    }
}
