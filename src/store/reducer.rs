//! Reducer turning mutations into state transitions.

use crate::import::import_rows;
use crate::model::{Library, ModelError};
use crate::store::mutation::{Edit, Mutation};

/// Reducer transforms state based on mutations.
///
/// The reducer is the only place where state transitions happen. It takes
/// the state by value and either returns the next state or an error, in
/// which case the caller keeps the previous state.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: Clone;

    /// The mutation type this reducer handles.
    type Mutation;

    /// Process a mutation and return the new state.
    fn reduce(state: Self::State, mutation: Self::Mutation) -> Result<Self::State, ModelError>;
}

/// In-memory application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// `None` while signed out or before anything was loaded.
    pub library: Option<Library>,
    /// Username when signed in to a remote account.
    pub logged_in: Option<String>,
}

pub struct StoreReducer;

impl Reducer for StoreReducer {
    type State = StoreState;
    type Mutation = Mutation;

    fn reduce(mut state: StoreState, mutation: Mutation) -> Result<StoreState, ModelError> {
        match mutation {
            Mutation::SignOut => {
                state.library = None;
                state.logged_in = None;
            }
            Mutation::SetLoggedIn { username } => state.logged_in = username,
            Mutation::LoadLibrary(library) => state.library = Some(*library),
            Mutation::ClearLibrary => state.library = None,
            Mutation::Edit(edit) => {
                let library = state.library.as_mut().ok_or(ModelError::NoLibrary)?;
                apply(library, edit)?;
                library.recalculate_totals()?;
            }
        }
        Ok(state)
    }
}

/// Apply one edit to `library`.
pub fn apply(library: &mut Library, edit: Edit) -> Result<(), ModelError> {
    match edit {
        Edit::ToggleSidebar => library.show_sidebar = !library.show_sidebar,
        Edit::SetDefaultList { list_id } => library.set_default_list(list_id)?,
        Edit::SetTotalUnit(unit) => library.total_unit = unit,
        Edit::SetItemUnit(unit) => library.item_unit = unit,
        Edit::ToggleOptionalField(field) => library.optional_fields.toggle(field),
        Edit::NewItem { category_id } => {
            library.new_item(category_id)?;
        }
        Edit::NewCategory { list_id } => {
            let category_id = library.new_category(list_id)?;
            library.new_item(category_id)?;
        }
        Edit::NewList => {
            library.new_list();
        }
        Edit::ReorderList { before, after } => library.reorder_lists(before, after)?,
        Edit::ReorderCategory {
            list_id,
            before,
            after,
        } => library.reorder_categories(list_id, before, after)?,
        Edit::ReorderItem {
            list_id,
            item_id,
            category_id,
            drop_index,
        } => library.reorder_item(list_id, item_id, category_id, drop_index)?,
        Edit::AddItemToCategory {
            item_id,
            category_id,
            drop_index,
        } => library.add_item_to_category(item_id, category_id, drop_index)?,
        Edit::UpdateListName { list_id, name } => library.list_mut(list_id)?.name = name,
        Edit::UpdateCategoryName { category_id, name } => {
            library.category_mut(category_id)?.name = name
        }
        Edit::UpdateCategoryColor { category_id, color } => {
            library.category_mut(category_id)?.color = color
        }
        Edit::UpdateItem(item) => library.update_item(&item)?,
        Edit::UpdateItemLink { item_id, url } => library.item_mut(item_id)?.url = url,
        Edit::UpdateCategoryItem {
            category_id,
            category_item,
        } => library.update_category_item(category_id, &category_item)?,
        Edit::RemoveItemFromCategory {
            category_id,
            item_id,
        } => library.remove_item(category_id, item_id)?,
        Edit::RemoveCategory { category_id } => library.remove_category(category_id)?,
        Edit::RemoveList { list_id } => library.remove_list(list_id)?,
        Edit::RemoveItem { item_id } => library.remove_library_item(item_id)?,
        Edit::CopyList { list_id } => {
            let copy_id = library.copy_list(list_id)?;
            library.set_default_list(copy_id)?;
        }
        Edit::ImportRows { name, rows } => {
            import_rows(library, &name, &rows)?;
        }
    }
    Ok(())
}
