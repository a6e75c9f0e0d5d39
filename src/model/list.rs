use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weight::{from_canonical, WeightUnit};

/// One packing list: an ordered sequence of categories plus derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// Derived from the library; recomputed, never persisted.
    #[serde(skip)]
    pub totals: ListTotals,
}

impl List {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            category_ids: Vec::new(),
            totals: ListTotals::default(),
        }
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

/// Weight and quantity subtotal of one category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryTotals {
    pub category_id: Uuid,
    /// Milligrams.
    pub weight: f64,
    pub qty: f64,
}

/// Aggregates over every category item of a list. Weights are milligrams.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListTotals {
    pub total_weight: f64,
    pub worn_weight: f64,
    pub consumable_weight: f64,
    /// Total minus worn and consumable weight.
    pub base_weight: f64,
    pub total_qty: f64,
    pub categories: Vec<CategoryTotals>,
    /// Library display unit at the time the totals were computed.
    pub unit: WeightUnit,
}

impl ListTotals {
    /// Total weight converted to `unit`.
    pub fn total_in_unit(&self) -> f64 {
        from_canonical(self.total_weight, self.unit)
    }

    pub fn base_in_unit(&self) -> f64 {
        from_canonical(self.base_weight, self.unit)
    }
}
