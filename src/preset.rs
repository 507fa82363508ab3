//! Named outfit presets.
//!
//! A preset is an ordered list of `{category, item}` selections. Order
//! matters: when two selections name the same category the later one wins,
//! exactly as if the user had clicked them in sequence.

use crate::catalog::{CategoryName, ItemId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One category -> item pick inside a preset.
pub struct Selection {
    pub category: CategoryName,
    #[serde(deserialize_with = "normalized_item_id")]
    pub item: ItemId,
}

impl Selection {
    pub fn new(category: &str, item: &str) -> Self {
        Selection {
            category: CategoryName::new(category),
            item: ItemId::normalized(item),
        }
    }
}

fn normalized_item_id<'de, D>(deserializer: D) -> Result<ItemId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(ItemId::normalized(&raw))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub name: String,
    pub selections: Vec<Selection>,
}

impl Preset {
    pub fn new(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Preset {
            name: name.into(),
            selections,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Presets keyed by name.
pub struct PresetBook {
    presets: BTreeMap<String, Preset>,
}

impl PresetBook {
    pub fn from_map(map: BTreeMap<String, Vec<Selection>>) -> Self {
        let presets = map
            .into_iter()
            .map(|(name, selections)| (name.clone(), Preset::new(name, selections)))
            .collect();
        PresetBook { presets }
    }

    pub fn register(&mut self, preset: Preset) {
        self.presets.insert(preset.name.clone(), preset);
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Iterates presets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
