use serde::{Deserialize, Serialize};

use crate::catalog::{Category, GarmentType};
use crate::selection::{SelectedItem, SelectionRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayGroup {
    pub name: String,
    pub types: Vec<GarmentType>,
}

impl DisplayGroup {
    fn new(name: &str, types: &[GarmentType]) -> Self {
        Self {
            name: name.to_string(),
            types: types.to_vec(),
        }
    }
}

/// Type-to-group table. Group order here is presentation order; a type listed under
/// more than one group belongs to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fallback_group: String,
    pub groups: Vec<DisplayGroup>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        use GarmentType::*;
        Self {
            fallback_group: "Other".to_string(),
            groups: vec![
                DisplayGroup::new("Tops", &[Shirt, Sweater, Jacket, Coat]),
                DisplayGroup::new("Bottoms", &[Pants, Shorts, BasePants]),
                DisplayGroup::new("Footwear", &[Socks, Shoes, Boots, Sneakers]),
                DisplayGroup::new(
                    "Accessories",
                    &[Hat, Gloves, Scarf, Umbrella, Sunglasses, Accessory],
                ),
            ],
        }
    }
}

impl DisplayConfig {
    pub fn group_for(&self, garment_type: GarmentType) -> &str {
        self.groups
            .iter()
            .find(|group| group.types.contains(&garment_type))
            .map(|group| group.name.as_str())
            .unwrap_or(self.fallback_group.as_str())
    }

    pub fn is_mapped(&self, garment_type: GarmentType) -> bool {
        self.groups
            .iter()
            .any(|group| group.types.contains(&garment_type))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub name: String,
    pub items: Vec<SelectedItem>,
}

pub struct PresentationGrouper<'a> {
    display: &'a DisplayConfig,
    rules: &'a SelectionRules,
}

impl<'a> PresentationGrouper<'a> {
    pub fn new(display: &'a DisplayConfig, rules: &'a SelectionRules) -> Self {
        Self { display, rules }
    }

    pub fn is_hidden_companion(
        &self,
        key: &str,
        selected: &[SelectedItem],
        category: Category,
    ) -> bool {
        category == Category::Professional
            && key == self.rules.undershirt
            && selected
                .iter()
                .any(|entry| self.rules.dress_shirts.iter().any(|id| *id == entry.key))
    }

    pub fn group(
        &self,
        selected: &[SelectedItem],
        prominent: Option<&str>,
        category: Category,
    ) -> Vec<ItemGroup> {
        let mut groups: Vec<ItemGroup> = self
            .display
            .groups
            .iter()
            .map(|group| ItemGroup {
                name: group.name.clone(),
                items: Vec::new(),
            })
            .collect();
        let mut fallback = ItemGroup {
            name: self.display.fallback_group.clone(),
            items: Vec::new(),
        };

        for entry in selected {
            if prominent == Some(entry.key.as_str()) {
                continue;
            }
            if self.is_hidden_companion(&entry.key, selected, category) {
                continue;
            }
            let name = self.display.group_for(entry.item.garment_type);
            match groups.iter_mut().find(|group| group.name == name) {
                Some(group) => group.items.push(entry.clone()),
                None => fallback.items.push(entry.clone()),
            }
        }

        groups.push(fallback);
        groups.retain(|group| !group.items.is_empty());
        groups
    }
}
