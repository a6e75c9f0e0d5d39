use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::CategoryItem;

/// A named, colored grouping of items inside exactly one list.
///
/// The order of `category_items` is the display and pack order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category_items: Vec<CategoryItem>,
}

impl Category {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            color: String::new(),
            category_items: Vec::new(),
        }
    }

    pub fn category_item(&self, item_id: Uuid) -> Option<&CategoryItem> {
        self.category_items.iter().find(|ci| ci.item_id == item_id)
    }

    pub fn contains(&self, item_id: Uuid) -> bool {
        self.position(item_id).is_some()
    }

    /// Index of the item's entry in the pack order.
    pub fn position(&self, item_id: Uuid) -> Option<usize> {
        self.category_items
            .iter()
            .position(|ci| ci.item_id == item_id)
    }

    /// Append an entry for `item_id` unless one already exists.
    ///
    /// Returns the entry's index either way.
    pub fn add_item(&mut self, item_id: Uuid) -> usize {
        if let Some(index) = self.position(item_id) {
            return index;
        }
        self.category_items.push(CategoryItem::new(item_id));
        self.category_items.len() - 1
    }

    /// Detach the entry for `item_id`. Absent items are ignored.
    pub fn remove_item(&mut self, item_id: Uuid) -> Option<CategoryItem> {
        let index = self.position(item_id)?;
        Some(self.category_items.remove(index))
    }

    /// Copy qty and flags from `update` onto the matching entry.
    ///
    /// Returns false when the category holds no entry for that item.
    pub fn update_category_item(&mut self, update: &CategoryItem) -> bool {
        match self
            .category_items
            .iter_mut()
            .find(|ci| ci.item_id == update.item_id)
        {
            Some(entry) => {
                entry.qty = update.qty;
                entry.worn = update.worn;
                entry.consumable = update.consumable;
                true
            }
            None => false,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_is_idempotent() {
        let mut category = Category::new();
        let item = Uuid::new_v4();
        assert_eq!(category.add_item(item), 0);
        assert_eq!(category.add_item(item), 0);
        assert_eq!(category.category_items.len(), 1);
        assert_eq!(category.category_items[0].qty, 1.0);
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let mut category = Category::new();
        category.add_item(Uuid::new_v4());
        assert!(category.remove_item(Uuid::new_v4()).is_none());
        assert_eq!(category.category_items.len(), 1);
    }

    #[test]
    fn update_category_item_copies_qty_and_flags() {
        let mut category = Category::new();
        let item = Uuid::new_v4();
        category.add_item(item);

        let update = CategoryItem {
            item_id: item,
            qty: 3.0,
            worn: true,
            consumable: false,
        };
        assert!(category.update_category_item(&update));
        assert_eq!(category.category_item(item), Some(&update));

        let stranger = CategoryItem::new(Uuid::new_v4());
        assert!(!category.update_category_item(&stranger));
    }
}
