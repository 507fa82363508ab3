//! Indexed view over every loaded category.
//!
//! The wardrobe keeps categories in manifest order and maintains an id index
//! so toggles and presets resolve items without scanning. Duplicate item ids
//! are skipped with a warning rather than failing the load, since a single bad
//! file should not take the rest of the outfit down with it.

use crate::catalog::identity::{CategoryName, ItemId};
use crate::catalog::model::{Category, Item};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    category: usize,
    item: usize,
}

#[derive(Debug, Default, Clone)]
/// All categories plus a derived index keyed by item id.
pub struct Wardrobe {
    categories: Vec<Category>,
    by_id: BTreeMap<ItemId, Slot>,
}

impl Wardrobe {
    /// Build a wardrobe from categories in load order.
    ///
    /// A category that appears twice is merged into the first occurrence; an
    /// item id that was already registered is dropped.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut wardrobe = Wardrobe::default();
        for category in categories {
            wardrobe.insert_category(category);
        }
        wardrobe
    }

    fn insert_category(&mut self, category: Category) {
        let category_idx = match self
            .categories
            .iter()
            .position(|existing| existing.name == category.name)
        {
            Some(idx) => {
                warn!(
                    category = %category.name,
                    file = %category.file,
                    "category loaded more than once; merging items"
                );
                idx
            }
            None => {
                self.categories.push(Category {
                    name: category.name.clone(),
                    file: category.file.clone(),
                    items: Vec::new(),
                });
                self.categories.len() - 1
            }
        };

        for item in category.items {
            if self.by_id.contains_key(&item.id) {
                warn!(item = %item.id, file = %category.file, "duplicate item id; skipping");
                continue;
            }
            let items = &mut self.categories[category_idx].items;
            self.by_id.insert(
                item.id.clone(),
                Slot {
                    category: category_idx,
                    item: items.len(),
                },
            );
            items.push(item);
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &CategoryName) -> Option<&Category> {
        self.categories.iter().find(|category| &category.name == name)
    }

    pub(crate) fn category_mut(&mut self, name: &CategoryName) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| &category.name == name)
    }

    pub(crate) fn categories_mut(&mut self) -> impl Iterator<Item = &mut Category> {
        self.categories.iter_mut()
    }

    /// Resolve an item by id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        let slot = self.by_id.get(id)?;
        self.categories.get(slot.category)?.items.get(slot.item)
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        let slot = *self.by_id.get(id)?;
        self.categories
            .get_mut(slot.category)?
            .items
            .get_mut(slot.item)
    }

    /// Iterates every item in category order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories.iter().flat_map(|category| category.items.iter())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
