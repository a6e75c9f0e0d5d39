use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weight::WeightUnit;

/// A reusable piece of gear. Items live in the library registry and are
/// referenced from categories through [`CategoryItem`]s, so one item can
/// appear in several lists at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Weight of a single unit in milligrams.
    #[serde(default)]
    pub weight: f64,
    /// Unit the author entered the weight in; used for display only.
    pub author_unit: WeightUnit,
}

impl Item {
    /// Create an unnamed, weightless item with a fresh id.
    pub fn new(author_unit: WeightUnit) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            url: String::new(),
            weight: 0.0,
            author_unit,
        }
    }
}

/// Binds an item into a category with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    pub item_id: Uuid,
    pub qty: f64,
    #[serde(default)]
    pub worn: bool,
    #[serde(default)]
    pub consumable: bool,
}

impl CategoryItem {
    pub fn new(item_id: Uuid) -> Self {
        Self {
            item_id,
            qty: 1.0,
            worn: false,
            consumable: false,
        }
    }
}
