use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::forecast::{Condition, ConditionFlags, TemperatureBand};
use crate::selection::DisplayConfig;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Casual,
    Professional,
    Hiking,
    Tourism,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Casual,
        Category::Professional,
        Category::Hiking,
        Category::Tourism,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Casual => "Casual",
            Category::Professional => "Professional",
            Category::Hiking => "Hiking",
            Category::Tourism => "Tourism",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentType {
    Shirt,
    Sweater,
    Jacket,
    Coat,
    Pants,
    Shorts,
    BasePants,
    Socks,
    Shoes,
    Boots,
    Sneakers,
    Hat,
    Gloves,
    Scarf,
    Umbrella,
    Sunglasses,
    Accessory,
}

impl GarmentType {
    pub fn label(self) -> &'static str {
        match self {
            GarmentType::Shirt => "shirt",
            GarmentType::Sweater => "sweater",
            GarmentType::Jacket => "jacket",
            GarmentType::Coat => "coat",
            GarmentType::Pants => "pants",
            GarmentType::Shorts => "shorts",
            GarmentType::BasePants => "base_pants",
            GarmentType::Socks => "socks",
            GarmentType::Shoes => "shoes",
            GarmentType::Boots => "boots",
            GarmentType::Sneakers => "sneakers",
            GarmentType::Hat => "hat",
            GarmentType::Gloves => "gloves",
            GarmentType::Scarf => "scarf",
            GarmentType::Umbrella => "umbrella",
            GarmentType::Sunglasses => "sunglasses",
            GarmentType::Accessory => "accessory",
        }
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Base,
    Mid,
    Outer,
    Single,
}

impl Layer {
    pub fn label(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Mid => "mid",
            Layer::Outer => "outer",
            Layer::Single => "single",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resistance {
    #[default]
    None,
    Light,
    Medium,
    Resistant,
    Proof,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub garment_type: GarmentType,
    pub layer: Layer,
    pub categories: Vec<Category>,
    pub temp_bands: Vec<TemperatureBand>,
    #[serde(default)]
    pub thermal_value: u8,
    #[serde(default)]
    pub water_resistance: Resistance,
    #[serde(default)]
    pub wind_resistance: Resistance,
    #[serde(default)]
    pub sun_protection: bool,
    #[serde(default)]
    pub special_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_fallback: Option<String>,
}

impl GarmentRecord {
    pub fn new(
        name: &str,
        garment_type: GarmentType,
        layer: Layer,
        categories: &[Category],
        temp_bands: &[TemperatureBand],
        thermal_value: u8,
    ) -> Self {
        Self {
            name: name.to_string(),
            garment_type,
            layer,
            categories: categories.to_vec(),
            temp_bands: temp_bands.to_vec(),
            thermal_value,
            water_resistance: Resistance::None,
            wind_resistance: Resistance::None,
            sun_protection: false,
            special_conditions: Vec::new(),
            image_primary: None,
            image_fallback: None,
        }
    }

    pub fn with_special_conditions(mut self, keywords: &[&str]) -> Self {
        self.special_conditions = keywords.iter().map(|keyword| keyword.to_string()).collect();
        self
    }

    pub fn with_sun_protection(mut self) -> Self {
        self.sun_protection = true;
        self
    }

    pub fn fits_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn fits_band(&self, band: TemperatureBand) -> bool {
        self.temp_bands.contains(&band)
    }

    pub fn special_conditions_met(&self, flags: &ConditionFlags) -> bool {
        self.special_conditions.is_empty() || flags.matches_keywords(&self.special_conditions)
    }

    pub fn has_special(&self, conditions: &[Condition]) -> bool {
        self.special_conditions
            .iter()
            .filter_map(|keyword| Condition::from_keyword(keyword))
            .any(|condition| conditions.contains(&condition))
    }

    pub fn band_range(&self) -> Option<(usize, usize)> {
        let positions = self.temp_bands.iter().map(|band| band.position());
        let low = positions.clone().min()?;
        let high = positions.max()?;
        Some((low, high))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    garment: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(flatten)]
    record: GarmentRecord,
}

/// Read-only garment table. Iteration follows insertion order, which is also the
/// tie-break order for every selection pass.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(String, GarmentRecord)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, GarmentRecord)>,
    {
        let mut catalog = Catalog::default();
        for (id, record) in entries {
            if catalog.index.contains_key(&id) {
                return Err(EngineError::DuplicateItem(id));
            }
            catalog.index.insert(id.clone(), catalog.entries.len());
            catalog.entries.push((id, record));
        }
        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(contents).map_err(|err| EngineError::CatalogParse(err.to_string()))?;
        Catalog::from_entries(file.garment.into_iter().map(|entry| (entry.id, entry.record)))
    }

    pub fn builtin() -> Result<Self> {
        Catalog::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Catalog::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&GarmentRecord> {
        self.index.get(id).map(|position| &self.entries[*position].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GarmentRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn unmapped_types(&self, display: &DisplayConfig) -> Vec<GarmentType> {
        self.iter()
            .map(|(_, record)| record.garment_type)
            .filter(|garment_type| !display.is_mapped(*garment_type))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn unknown_special_conditions(&self) -> Vec<(String, String)> {
        let mut unknown = Vec::new();
        for (id, record) in self.iter() {
            for keyword in &record.special_conditions {
                if Condition::from_keyword(keyword).is_none() {
                    unknown.push((id.to_string(), keyword.clone()));
                }
            }
        }
        unknown
    }
}
