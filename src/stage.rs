//! Render model for the dress-up stage.
//!
//! The stage is what the page would build out of `<img>` elements: one layer
//! per item, stacked by category family, plus a control group of buttons for
//! every category except base. It carries no pixels, only the attributes a
//! renderer needs.

use crate::catalog::{CategoryKind, CategoryName, ItemId};
use crate::config::LayerOrder;
use crate::engine::Dresser;
use serde::Serialize;

const IMAGE_SUFFIX: &str = ".png";
const BUTTON_SUFFIX: &str = "b.png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One stacked image on the stage.
pub struct Layer {
    pub id: ItemId,
    pub src: String,
    pub alt: String,
    pub category: CategoryName,
    pub z_index: i32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Button that toggles `target` within `category`.
pub struct ControlButton {
    pub target: ItemId,
    pub category: CategoryName,
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ControlGroup {
    pub category: CategoryName,
    pub buttons: Vec<ControlButton>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<String>,
    /// Layers sorted bottom to top; ties keep load order.
    pub layers: Vec<Layer>,
    pub controls: Vec<ControlGroup>,
}

impl Stage {
    pub fn render(dresser: &Dresser, order: &LayerOrder) -> Self {
        let mut layers = Vec::new();
        let mut controls = Vec::new();

        for category in dresser.wardrobe().categories() {
            let z_index = order.z_index(&category.name);
            layers.extend(category.items.iter().map(|item| Layer {
                id: item.id.clone(),
                src: item.src.clone(),
                alt: item.alt.clone(),
                category: category.name.clone(),
                z_index,
                visible: item.visible,
            }));

            if category.name.kind() == CategoryKind::Base {
                continue;
            }
            controls.push(ControlGroup {
                category: category.name.clone(),
                buttons: category
                    .items
                    .iter()
                    .map(|item| ControlButton {
                        target: item.id.clone(),
                        category: category.name.clone(),
                        src: button_src(&item.src),
                        alt: format!("{} Button", item.alt),
                    })
                    .collect(),
            });
        }

        layers.sort_by_key(|layer| layer.z_index);
        Stage {
            active_preset: dresser.active_preset().map(str::to_string),
            layers,
            controls,
        }
    }

    /// Visible layers, bottom to top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.visible)
    }
}

/// Button art sits next to the layer art with a `b` suffix
/// (`hat1_1.png` -> `hat1_1b.png`). Only the first `.png` is rewritten.
pub fn button_src(src: &str) -> String {
    src.replacen(IMAGE_SUFFIX, BUTTON_SUFFIX, 1)
}
