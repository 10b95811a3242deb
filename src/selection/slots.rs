use serde::{Deserialize, Serialize};

use crate::catalog::GarmentRecord;
use crate::selection::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub key: String,
    pub item: GarmentRecord,
}

impl From<Candidate<'_>> for SelectedItem {
    fn from(candidate: Candidate<'_>) -> Self {
        Self {
            key: candidate.key.to_string(),
            item: candidate.item.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutfitSlots<'a> {
    pub base_top: Option<Candidate<'a>>,
    pub undershirt: Option<Candidate<'a>>,
    pub bottom: Option<Candidate<'a>>,
    pub base_bottom: Option<Candidate<'a>>,
    pub socks: Option<Candidate<'a>>,
    pub footwear: Option<Candidate<'a>>,
    pub mid: Option<Candidate<'a>>,
    pub outer: Option<Candidate<'a>>,
    pub accessories: Vec<Candidate<'a>>,
}

impl<'a> OutfitSlots<'a> {
    pub fn has_top(&self) -> bool {
        self.base_top.is_some() || self.undershirt.is_some()
    }

    pub fn has_bottom(&self) -> bool {
        self.bottom.is_some()
    }

    pub fn has_footwear(&self) -> bool {
        self.footwear.is_some()
    }

    pub fn prominent(&self) -> Option<Candidate<'a>> {
        self.outer.or(self.mid)
    }

    pub fn assemble(&self) -> Vec<SelectedItem> {
        let singles = [
            self.base_top,
            self.undershirt,
            self.bottom,
            self.base_bottom,
            self.socks,
            self.footwear,
            self.mid,
            self.outer,
        ];
        let mut selected: Vec<SelectedItem> = Vec::new();
        for candidate in singles
            .into_iter()
            .flatten()
            .chain(self.accessories.iter().copied())
        {
            if selected.iter().any(|existing| existing.key == candidate.key) {
                continue;
            }
            selected.push(candidate.into());
        }
        selected
    }
}
