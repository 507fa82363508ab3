//! Visibility engine.
//!
//! `Dresser` owns the loaded wardrobe plus the outfit state that used to live
//! in page globals (the active preset). Every mutation ends with
//! `ensure_invariants`, which restores:
//!
//! - regular categories: at most one visible item (enforced by the mutations
//!   themselves, and by `normalize` for freshly loaded data, which also
//!   collapses stacked face items)
//! - base: exactly one visible item
//! - each face group: at least one visible item

use crate::catalog::{CategoryKind, CategoryName, Item, ItemId, Wardrobe};
use crate::config::FacePolicy;
use crate::preset::{Preset, PresetBook, Selection};
use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of a single toggle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Shown,
    Hidden,
    /// The category's policy forbids hiding its active item.
    Refused,
    /// The item is unknown or does not belong to the named category.
    Missing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// What a preset application actually changed.
pub struct PresetReport {
    pub preset: String,
    pub shown: Vec<ItemId>,
    pub skipped: Vec<Selection>,
}

#[derive(Debug, Clone)]
pub struct Dresser {
    wardrobe: Wardrobe,
    face_policy: FacePolicy,
    active_preset: Option<String>,
}

impl Dresser {
    /// Take ownership of a loaded wardrobe and bring it into a consistent
    /// state.
    pub fn new(wardrobe: Wardrobe, face_policy: FacePolicy) -> Self {
        let mut dresser = Dresser {
            wardrobe,
            face_policy,
            active_preset: None,
        };
        dresser.normalize();
        dresser
    }

    pub fn wardrobe(&self) -> &Wardrobe {
        &self.wardrobe
    }

    pub fn face_policy(&self) -> FacePolicy {
        self.face_policy
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn is_visible(&self, id: &ItemId) -> bool {
        self.wardrobe.item(id).is_some_and(|item| item.visible)
    }

    pub fn visible_in(&self, category: &CategoryName) -> Vec<&Item> {
        self.wardrobe
            .category(category)
            .map(|category| category.items.iter().filter(|item| item.visible).collect())
            .unwrap_or_default()
    }

    /// Every visible item, in category load order.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.wardrobe.items().filter(|item| item.visible).collect()
    }

    /// Flip an item on or off within its category.
    ///
    /// Showing an item hides its siblings. Hiding is refused for base, and
    /// for face groups under `FacePolicy::KeepActive`; under
    /// `FacePolicy::RevealFirst` the face item is hidden and the group's first
    /// item is brought back by the invariant repair.
    pub fn toggle(&mut self, id: &ItemId, category: &CategoryName) -> ToggleOutcome {
        let Some(item) = self.wardrobe.item(id) else {
            warn!(item = %id, category = %category, "toggle requested for unknown item");
            return ToggleOutcome::Missing;
        };
        if &item.category != category {
            warn!(
                item = %id,
                category = %category,
                actual = %item.category,
                "toggle requested with mismatched category"
            );
            return ToggleOutcome::Missing;
        }

        let outcome = match (category.kind(), item.visible) {
            (_, false) => {
                self.show_exclusive(id, category);
                ToggleOutcome::Shown
            }
            (CategoryKind::Regular, true) => {
                self.set_visible(id, false);
                ToggleOutcome::Hidden
            }
            (CategoryKind::Face, true) if self.face_policy == FacePolicy::RevealFirst => {
                self.set_visible(id, false);
                ToggleOutcome::Hidden
            }
            (CategoryKind::Base | CategoryKind::Face, true) => {
                debug!(item = %id, category = %category, "refusing to hide required item");
                ToggleOutcome::Refused
            }
        };

        self.ensure_invariants();
        outcome
    }

    /// Make sure the base category shows exactly one item. Returns true when
    /// anything changed.
    pub fn ensure_base_visible(&mut self) -> bool {
        let mut changed = false;
        for category in self.wardrobe.categories_mut() {
            if category.name.kind() != CategoryKind::Base || category.items.is_empty() {
                continue;
            }
            let keep = category
                .items
                .iter()
                .position(|item| item.visible)
                .unwrap_or(0);
            for (idx, item) in category.items.iter_mut().enumerate() {
                let visible = idx == keep;
                if item.visible != visible {
                    item.visible = visible;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Make sure every non-empty face group shows at least one item. Returns
    /// true when anything changed.
    pub fn ensure_face_visible(&mut self) -> bool {
        let mut changed = false;
        for category in self.wardrobe.categories_mut() {
            if category.name.kind() != CategoryKind::Face {
                continue;
            }
            if category.items.iter().any(|item| item.visible) {
                continue;
            }
            if let Some(first) = category.items.first_mut() {
                debug!(category = %category.name, item = %first.id, "revealing first face item");
                first.visible = true;
                changed = true;
            }
        }
        changed
    }

    pub fn ensure_invariants(&mut self) {
        self.ensure_base_visible();
        self.ensure_face_visible();
    }

    /// Collapse any category that was loaded with several visible items down
    /// to the first one, then repair base and face.
    pub fn normalize(&mut self) {
        for category in self.wardrobe.categories_mut() {
            let mut seen_visible = false;
            for item in category.items.iter_mut().filter(|item| item.visible) {
                if seen_visible {
                    warn!(
                        category = %category.name,
                        item = %item.id,
                        "category has more than one visible item; hiding"
                    );
                    item.visible = false;
                }
                seen_visible = true;
            }
        }
        self.ensure_invariants();
    }

    /// Hide every item in the named categories. Base and face groups are
    /// repaired afterwards, so naming them only resets them to their first
    /// item.
    pub fn hide_categories(&mut self, names: &[CategoryName]) {
        for name in names {
            match self.wardrobe.category_mut(name) {
                Some(category) => category.items.iter_mut().for_each(|item| item.visible = false),
                None => debug!(category = %name, "hide requested for unknown category"),
            }
        }
        self.ensure_invariants();
    }

    /// Show one item in a regular category, hiding its siblings.
    ///
    /// Base and face categories are ignored so presets never disturb them.
    /// Returns false when nothing was shown.
    pub fn show_item(&mut self, id: &ItemId, category: &CategoryName) -> bool {
        if category.is_required() {
            debug!(item = %id, category = %category, "presets do not touch base or face");
            return false;
        }
        match self.wardrobe.item(id) {
            Some(item) if &item.category == category => {}
            Some(item) => {
                warn!(
                    item = %id,
                    category = %category,
                    actual = %item.category,
                    "item not found in category"
                );
                return false;
            }
            None => {
                warn!(item = %id, category = %category, "item not found");
                return false;
            }
        }
        self.show_exclusive(id, category);
        true
    }

    /// Replace the current outfit's regular categories with a preset.
    ///
    /// All regular categories are cleared first, so switching from one preset
    /// to another never leaves stray items behind and re-applying the same
    /// preset is idempotent.
    pub fn apply_preset(&mut self, preset: &Preset) -> PresetReport {
        if let Some(previous) = self.active_preset.as_deref() {
            debug!(previous, next = %preset.name, "replacing active preset");
        }
        self.clear_regular();

        let mut report = PresetReport {
            preset: preset.name.clone(),
            ..Default::default()
        };
        for selection in &preset.selections {
            if self.show_item(&selection.item, &selection.category) {
                report
                    .shown
                    .retain(|shown| !self.in_category(shown, &selection.category));
                report.shown.push(selection.item.clone());
            } else {
                report.skipped.push(selection.clone());
            }
        }

        self.ensure_invariants();
        self.active_preset = Some(preset.name.clone());
        info!(
            preset = %preset.name,
            shown = report.shown.len(),
            skipped = report.skipped.len(),
            "applied preset"
        );
        report
    }

    /// Look a preset up by name and apply it.
    pub fn apply_named_preset(&mut self, book: &PresetBook, name: &str) -> Result<PresetReport> {
        let preset = book.get(name).ok_or_else(|| {
            let known = book.names().collect::<Vec<_>>().join(", ");
            anyhow!("Unknown preset: {name} (known presets: {known})")
        })?;
        Ok(self.apply_preset(preset))
    }

    /// Clear every regular category and forget the active preset.
    pub fn reset_preset(&mut self) {
        self.clear_regular();
        self.ensure_invariants();
        self.active_preset = None;
    }

    fn clear_regular(&mut self) {
        for category in self.wardrobe.categories_mut() {
            if category.name.kind() == CategoryKind::Regular {
                category.items.iter_mut().for_each(|item| item.visible = false);
            }
        }
    }

    fn in_category(&self, id: &ItemId, category: &CategoryName) -> bool {
        self.wardrobe
            .item(id)
            .is_some_and(|item| &item.category == category)
    }

    fn show_exclusive(&mut self, id: &ItemId, category: &CategoryName) {
        if let Some(category) = self.wardrobe.category_mut(category) {
            for item in category.items.iter_mut() {
                item.visible = &item.id == id;
            }
        }
    }

    fn set_visible(&mut self, id: &ItemId, visible: bool) {
        if let Some(item) = self.wardrobe.item_mut(id) {
            item.visible = visible;
        }
    }
}
