use uuid::Uuid;

use crate::import::ImportRow;
use crate::model::{CategoryItem, Item, Library, OptionalField, WeightUnit};

/// Everything that can change the store.
///
/// Session bookkeeping variants update in-memory state only. Library edits
/// are the persisting kind: subscribers save the resulting snapshot.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Drop the library and the signed-in user.
    SignOut,
    SetLoggedIn { username: Option<String> },
    /// Replace the library wholesale (after a load from storage).
    LoadLibrary(Box<Library>),
    ClearLibrary,
    Edit(Edit),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SignOut => "signout",
            Mutation::SetLoggedIn { .. } => "setLoggedIn",
            Mutation::LoadLibrary(_) => "loadLibraryData",
            Mutation::ClearLibrary => "clearLibraryData",
            Mutation::Edit(edit) => edit.name(),
        }
    }

    /// Whether the resulting snapshot must be persisted.
    pub fn persists(&self) -> bool {
        matches!(self, Mutation::Edit(_))
    }
}

impl From<Edit> for Mutation {
    fn from(edit: Edit) -> Self {
        Mutation::Edit(edit)
    }
}

/// A single library edit, as issued by the user.
#[derive(Debug, Clone)]
pub enum Edit {
    ToggleSidebar,
    SetDefaultList {
        list_id: Uuid,
    },
    SetTotalUnit(WeightUnit),
    SetItemUnit(WeightUnit),
    ToggleOptionalField(OptionalField),
    NewItem {
        category_id: Uuid,
    },
    /// New category at the end of the list, seeded with one item.
    NewCategory {
        list_id: Uuid,
    },
    NewList,
    ReorderList {
        before: usize,
        after: usize,
    },
    ReorderCategory {
        list_id: Uuid,
        before: usize,
        after: usize,
    },
    /// Drag an item to `drop_index` of `category_id`, possibly out of
    /// another category of the same list.
    ReorderItem {
        list_id: Uuid,
        item_id: Uuid,
        category_id: Uuid,
        drop_index: usize,
    },
    /// Drop a library item into a category.
    AddItemToCategory {
        item_id: Uuid,
        category_id: Uuid,
        drop_index: usize,
    },
    UpdateListName {
        list_id: Uuid,
        name: String,
    },
    UpdateCategoryName {
        category_id: Uuid,
        name: String,
    },
    UpdateCategoryColor {
        category_id: Uuid,
        color: String,
    },
    UpdateItem(Item),
    UpdateItemLink {
        item_id: Uuid,
        url: String,
    },
    UpdateCategoryItem {
        category_id: Uuid,
        category_item: CategoryItem,
    },
    RemoveItemFromCategory {
        category_id: Uuid,
        item_id: Uuid,
    },
    RemoveCategory {
        category_id: Uuid,
    },
    RemoveList {
        list_id: Uuid,
    },
    /// Delete an item from the whole library.
    RemoveItem {
        item_id: Uuid,
    },
    CopyList {
        list_id: Uuid,
    },
    ImportRows {
        name: String,
        rows: Vec<ImportRow>,
    },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Edit::ToggleSidebar => "toggleSidebar",
            Edit::SetDefaultList { .. } => "setDefaultList",
            Edit::SetTotalUnit(_) => "setTotalUnit",
            Edit::SetItemUnit(_) => "setItemUnit",
            Edit::ToggleOptionalField(_) => "toggleOptionalField",
            Edit::NewItem { .. } => "newItem",
            Edit::NewCategory { .. } => "newCategory",
            Edit::NewList => "newList",
            Edit::ReorderList { .. } => "reorderList",
            Edit::ReorderCategory { .. } => "reorderCategory",
            Edit::ReorderItem { .. } => "reorderItem",
            Edit::AddItemToCategory { .. } => "addItemToCategory",
            Edit::UpdateListName { .. } => "updateListName",
            Edit::UpdateCategoryName { .. } => "updateCategoryName",
            Edit::UpdateCategoryColor { .. } => "updateCategoryColor",
            Edit::UpdateItem(_) => "updateItem",
            Edit::UpdateItemLink { .. } => "updateItemLink",
            Edit::UpdateCategoryItem { .. } => "updateCategoryItem",
            Edit::RemoveItemFromCategory { .. } => "removeItemFromCategory",
            Edit::RemoveCategory { .. } => "removeCategory",
            Edit::RemoveList { .. } => "removeList",
            Edit::RemoveItem { .. } => "removeItem",
            Edit::CopyList { .. } => "copyList",
            Edit::ImportRows { .. } => "importCSV",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_edits_persist() {
        assert!(Mutation::from(Edit::NewList).persists());
        assert!(Mutation::from(Edit::ToggleSidebar).persists());
        assert!(!Mutation::SignOut.persists());
        assert!(!Mutation::ClearLibrary.persists());
        assert!(!Mutation::SetLoggedIn { username: None }.persists());
        assert!(!Mutation::LoadLibrary(Box::default()).persists());
    }

    #[test]
    fn edit_names_pass_through() {
        let mutation = Mutation::from(Edit::ReorderList {
            before: 0,
            after: 1,
        });
        assert_eq!(mutation.name(), "reorderList");
        assert_eq!(Mutation::SignOut.name(), "signout");
    }
}
