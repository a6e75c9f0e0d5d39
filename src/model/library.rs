//! The library aggregate: registries of items, categories and lists.
//!
//! All mutating operations check their preconditions before touching any
//! registry, so an `Err` always means "nothing changed".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::error::{EntityKind, ModelError};
use super::item::{CategoryItem, Item};
use super::list::{CategoryTotals, List, ListTotals};
use super::weight::WeightUnit;
use crate::ordering::{insert_at, move_element};

const FORMAT_VERSION: u32 = 1;

fn format_version() -> u32 {
    FORMAT_VERSION
}

fn default_show_sidebar() -> bool {
    true
}

/// Toggleable display columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalField {
    Images,
    Price,
    Worn,
    Consumable,
    ListDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionalFields {
    pub images: bool,
    pub price: bool,
    pub worn: bool,
    pub consumable: bool,
    pub list_description: bool,
}

impl OptionalFields {
    pub fn get(&self, field: OptionalField) -> bool {
        match field {
            OptionalField::Images => self.images,
            OptionalField::Price => self.price,
            OptionalField::Worn => self.worn,
            OptionalField::Consumable => self.consumable,
            OptionalField::ListDescription => self.list_description,
        }
    }

    pub fn toggle(&mut self, field: OptionalField) {
        let flag = match field {
            OptionalField::Images => &mut self.images,
            OptionalField::Price => &mut self.price,
            OptionalField::Worn => &mut self.worn,
            OptionalField::Consumable => &mut self.consumable,
            OptionalField::ListDescription => &mut self.list_description,
        };
        *flag = !*flag;
    }
}

/// Root aggregate owning every item, category and list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default = "format_version")]
    version: u32,
    #[serde(default)]
    pub total_unit: WeightUnit,
    #[serde(default)]
    pub item_unit: WeightUnit,
    #[serde(default = "default_show_sidebar")]
    pub show_sidebar: bool,
    #[serde(default)]
    pub optional_fields: OptionalFields,
    #[serde(default)]
    default_list_id: Option<Uuid>,
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    lists: Vec<List>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            total_unit: WeightUnit::default(),
            item_unit: WeightUnit::default(),
            show_sidebar: true,
            optional_fields: OptionalFields::default(),
            default_list_id: None,
            items: Vec::new(),
            categories: Vec::new(),
            lists: Vec::new(),
        }
    }
}

impl Library {
    /// An empty library with no lists.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Snapshot -------------------------------------------------------------

    /// Serialize to the persisted JSON form.
    ///
    /// Output is deterministic: equal libraries produce identical bytes.
    pub fn save(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a library from [`Library::save`] output.
    ///
    /// Every cross-reference is checked and totals are recomputed.
    pub fn load(data: &str) -> Result<Self, ModelError> {
        let mut library: Library = serde_json::from_str(data)?;
        library.validate()?;
        library.recalculate_totals()?;
        Ok(library)
    }

    /// Check that ids are unique and every reference resolves.
    pub fn validate(&self) -> Result<(), ModelError> {
        let item_ids = unique_ids(self.items.iter().map(|i| i.id), "item")?;
        let category_ids = unique_ids(self.categories.iter().map(|c| c.id), "category")?;
        let list_ids = unique_ids(self.lists.iter().map(|l| l.id), "list")?;

        if let Some(default) = self.default_list_id {
            if !list_ids.contains(&default) {
                return Err(ModelError::Corrupt(format!(
                    "default list '{}' does not exist",
                    default
                )));
            }
        }

        let mut owned = HashSet::new();
        for list in &self.lists {
            let mut in_list = HashSet::new();
            for category_id in &list.category_ids {
                if !category_ids.contains(category_id) {
                    return Err(ModelError::Corrupt(format!(
                        "list '{}' references missing category '{}'",
                        list.id, category_id
                    )));
                }
                if !owned.insert(*category_id) {
                    return Err(ModelError::Corrupt(format!(
                        "category '{}' belongs to more than one list",
                        category_id
                    )));
                }
                let category = self.category(*category_id)?;
                for entry in &category.category_items {
                    if !item_ids.contains(&entry.item_id) {
                        return Err(ModelError::Corrupt(format!(
                            "category '{}' references missing item '{}'",
                            category.id, entry.item_id
                        )));
                    }
                    if !in_list.insert(entry.item_id) {
                        return Err(ModelError::Corrupt(format!(
                            "item '{}' appears twice in list '{}'",
                            entry.item_id, list.id
                        )));
                    }
                }
            }
        }

        if owned.len() != self.categories.len() {
            return Err(ModelError::Corrupt(
                "library contains categories not owned by any list".to_string(),
            ));
        }
        Ok(())
    }

    // -- Lookups --------------------------------------------------------------

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn default_list_id(&self) -> Option<Uuid> {
        self.default_list_id
    }

    pub fn item(&self, id: Uuid) -> Result<&Item, ModelError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::Item, id))
    }

    pub fn category(&self, id: Uuid) -> Result<&Category, ModelError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::Category, id))
    }

    pub fn list(&self, id: Uuid) -> Result<&List, ModelError> {
        self.lists
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::List, id))
    }

    pub(crate) fn item_mut(&mut self, id: Uuid) -> Result<&mut Item, ModelError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::Item, id))
    }

    pub(crate) fn category_mut(&mut self, id: Uuid) -> Result<&mut Category, ModelError> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::Category, id))
    }

    pub(crate) fn list_mut(&mut self, id: Uuid) -> Result<&mut List, ModelError> {
        self.lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ModelError::not_found(EntityKind::List, id))
    }

    /// The list whose `category_ids` contains `category_id`.
    pub fn list_for_category(&self, category_id: Uuid) -> Option<&List> {
        self.lists
            .iter()
            .find(|l| l.category_ids.contains(&category_id))
    }

    /// The category of `list_id` currently holding `item_id`.
    pub fn find_category_with_item_by_id(
        &self,
        item_id: Uuid,
        list_id: Uuid,
    ) -> Result<&Category, ModelError> {
        let list = self.list(list_id)?;
        for category_id in &list.category_ids {
            let category = self.category(*category_id)?;
            if category.contains(item_id) {
                return Ok(category);
            }
        }
        Err(ModelError::ItemNotInList { item_id, list_id })
    }

    // -- Factories ------------------------------------------------------------

    /// Create a list seeded with one category holding one item, and make it
    /// the default list.
    pub fn new_list(&mut self) -> Uuid {
        let list_id = self.create_list();
        let category_id = self.push_category(list_id);
        self.push_item(category_id);
        self.default_list_id = Some(list_id);
        if let Err(e) = self.calculate_totals(list_id) {
            tracing::warn!(list_id = %list_id, error = %e, "Totals of new list not computed");
        }
        list_id
    }

    /// Register a bare list with no categories.
    pub(crate) fn create_list(&mut self) -> Uuid {
        let list = List::new();
        let id = list.id;
        self.lists.push(list);
        id
    }

    /// Create an empty category at the end of `list_id`.
    pub fn new_category(&mut self, list_id: Uuid) -> Result<Uuid, ModelError> {
        self.list(list_id)?;
        Ok(self.push_category(list_id))
    }

    /// Create an item and place it in `category_id` with qty 1.
    pub fn new_item(&mut self, category_id: Uuid) -> Result<Uuid, ModelError> {
        self.category(category_id)?;
        Ok(self.push_item(category_id))
    }

    fn push_category(&mut self, list_id: Uuid) -> Uuid {
        let category = Category::new();
        let id = category.id;
        self.categories.push(category);
        if let Some(list) = self.lists.iter_mut().find(|l| l.id == list_id) {
            list.category_ids.push(id);
        }
        id
    }

    fn push_item(&mut self, category_id: Uuid) -> Uuid {
        let item = Item::new(self.item_unit);
        let id = item.id;
        self.items.push(item);
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == category_id) {
            category.add_item(id);
        }
        id
    }

    // -- Item membership ------------------------------------------------------

    /// Put `item_id` into `category_id` with the default qty. Idempotent.
    pub fn add_item(&mut self, category_id: Uuid, item_id: Uuid) -> Result<(), ModelError> {
        self.item(item_id)?;
        self.category_mut(category_id)?.add_item(item_id);
        Ok(())
    }

    /// Detach `item_id` from `category_id`. No-op when it is not there.
    pub fn remove_item(&mut self, category_id: Uuid, item_id: Uuid) -> Result<(), ModelError> {
        self.category_mut(category_id)?.remove_item(item_id);
        Ok(())
    }

    /// Replace name, description, url, weight and author unit of the stored
    /// item with the same id.
    pub fn update_item(&mut self, update: &Item) -> Result<(), ModelError> {
        check_amount("weight", update.weight)?;
        let item = self.item_mut(update.id)?;
        item.name = update.name.clone();
        item.description = update.description.clone();
        item.url = update.url.clone();
        item.weight = update.weight;
        item.author_unit = update.author_unit;
        Ok(())
    }

    pub fn update_category_item(
        &mut self,
        category_id: Uuid,
        update: &CategoryItem,
    ) -> Result<(), ModelError> {
        check_amount("qty", update.qty)?;
        if self.category_mut(category_id)?.update_category_item(update) {
            Ok(())
        } else {
            Err(ModelError::not_found(EntityKind::Item, update.item_id))
        }
    }

    // -- Reordering -----------------------------------------------------------

    pub fn reorder_lists(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        move_element(&mut self.lists, from, to)
    }

    pub fn reorder_categories(
        &mut self,
        list_id: Uuid,
        from: usize,
        to: usize,
    ) -> Result<(), ModelError> {
        move_element(&mut self.list_mut(list_id)?.category_ids, from, to)
    }

    /// Move an item to `drop_index` of `category_id`, taking it out of
    /// whichever category of `list_id` currently holds it.
    pub fn reorder_item(
        &mut self,
        list_id: Uuid,
        item_id: Uuid,
        category_id: Uuid,
        drop_index: usize,
    ) -> Result<(), ModelError> {
        self.item(item_id)?;
        let list = self.list(list_id)?;
        if !list.category_ids.contains(&category_id) {
            self.category(category_id)?;
            return Err(ModelError::CategoryNotInList {
                category_id,
                list_id,
            });
        }
        let source = self.find_category_with_item_by_id(item_id, list_id)?;
        let source_id = source.id;
        let old_index = source
            .position(item_id)
            .ok_or(ModelError::ItemNotInList { item_id, list_id })?;

        if source_id == category_id {
            let category = self.category_mut(category_id)?;
            return move_element(&mut category.category_items, old_index, drop_index);
        }

        let len = self.category(category_id)?.category_items.len();
        if drop_index > len {
            return Err(ModelError::InvalidIndex {
                index: drop_index,
                len,
            });
        }
        let entry = self.category_mut(source_id)?.category_items.remove(old_index);
        insert_at(
            &mut self.category_mut(category_id)?.category_items,
            drop_index,
            entry,
        )
    }

    /// Drop a library item into a category at `drop_index`.
    ///
    /// An item already held by another category of the same list is moved
    /// rather than duplicated.
    pub fn add_item_to_category(
        &mut self,
        item_id: Uuid,
        category_id: Uuid,
        drop_index: usize,
    ) -> Result<(), ModelError> {
        self.item(item_id)?;
        self.category(category_id)?;

        if let Some(list_id) = self.list_for_category(category_id).map(|l| l.id) {
            let source_id = self
                .find_category_with_item_by_id(item_id, list_id)
                .ok()
                .map(|c| c.id);
            if source_id.is_some_and(|id| id != category_id) {
                return self.reorder_item(list_id, item_id, category_id, drop_index);
            }
        }

        let category = self.category(category_id)?;
        let len_after = category.category_items.len() + usize::from(!category.contains(item_id));
        if drop_index >= len_after {
            return Err(ModelError::InvalidIndex {
                index: drop_index,
                len: len_after,
            });
        }
        let category = self.category_mut(category_id)?;
        let index = category.add_item(item_id);
        move_element(&mut category.category_items, index, drop_index)
    }

    // -- Lists ----------------------------------------------------------------

    pub fn set_default_list(&mut self, list_id: Uuid) -> Result<(), ModelError> {
        self.list(list_id)?;
        self.default_list_id = Some(list_id);
        Ok(())
    }

    /// Duplicate a list with fresh list and category ids. The copies
    /// reference the same items as the original.
    pub fn copy_list(&mut self, list_id: Uuid) -> Result<Uuid, ModelError> {
        let original = self.list(list_id)?;
        let sources = original
            .category_ids
            .iter()
            .map(|id| self.category(*id).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let mut copy = List::new();
        copy.name = format!("Copy of {}", original.name);
        copy.description = original.description.clone();

        for source in sources {
            let category = Category {
                id: Uuid::new_v4(),
                ..source
            };
            copy.category_ids.push(category.id);
            self.categories.push(category);
        }

        let copy_id = copy.id;
        self.lists.push(copy);
        self.calculate_totals(copy_id)?;
        Ok(copy_id)
    }

    /// Remove a list together with its categories. Items stay in the library.
    pub fn remove_list(&mut self, list_id: Uuid) -> Result<(), ModelError> {
        let owned = self.list(list_id)?.category_ids.clone();
        self.categories.retain(|c| !owned.contains(&c.id));
        self.lists.retain(|l| l.id != list_id);
        if self.default_list_id == Some(list_id) {
            self.default_list_id = self.lists.first().map(|l| l.id);
        }
        Ok(())
    }

    pub fn remove_category(&mut self, category_id: Uuid) -> Result<(), ModelError> {
        self.category(category_id)?;
        for list in &mut self.lists {
            list.category_ids.retain(|id| *id != category_id);
        }
        self.categories.retain(|c| c.id != category_id);
        Ok(())
    }

    /// Delete an item from the registry and from every category using it.
    pub fn remove_library_item(&mut self, item_id: Uuid) -> Result<(), ModelError> {
        self.item(item_id)?;
        for category in &mut self.categories {
            category.remove_item(item_id);
        }
        self.items.retain(|i| i.id != item_id);
        Ok(())
    }

    // -- Totals ---------------------------------------------------------------

    /// Recompute the derived totals of one list.
    pub fn calculate_totals(&mut self, list_id: Uuid) -> Result<(), ModelError> {
        let totals = self.compute_totals(list_id)?;
        self.list_mut(list_id)?.totals = totals;
        Ok(())
    }

    pub fn recalculate_totals(&mut self) -> Result<(), ModelError> {
        let ids: Vec<Uuid> = self.lists.iter().map(|l| l.id).collect();
        for id in ids {
            self.calculate_totals(id)?;
        }
        Ok(())
    }

    fn compute_totals(&self, list_id: Uuid) -> Result<ListTotals, ModelError> {
        let list = self.list(list_id)?;
        let mut totals = ListTotals {
            unit: self.total_unit,
            ..ListTotals::default()
        };

        for category_id in &list.category_ids {
            let category = self.category(*category_id)?;
            let mut subtotal = CategoryTotals {
                category_id: category.id,
                ..CategoryTotals::default()
            };
            for entry in &category.category_items {
                let weight = entry.qty * self.item(entry.item_id)?.weight;
                subtotal.weight += weight;
                subtotal.qty += entry.qty;
                if entry.worn {
                    totals.worn_weight += weight;
                }
                if entry.consumable {
                    totals.consumable_weight += weight;
                }
            }
            totals.total_weight += subtotal.weight;
            totals.total_qty += subtotal.qty;
            totals.categories.push(subtotal);
        }

        totals.base_weight = totals.total_weight - totals.worn_weight - totals.consumable_weight;
        Ok(totals)
    }
}

/// Weights and quantities must survive a JSON round-trip.
fn check_amount(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidValue { field, value })
    }
}

fn unique_ids(
    ids: impl Iterator<Item = Uuid>,
    kind: &str,
) -> Result<HashSet<Uuid>, ModelError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ModelError::Corrupt(format!("duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(seen)
}
