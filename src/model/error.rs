use thiserror::Error;
use uuid::Uuid;

/// Kind of entity a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Item,
    Category,
    List,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Item => write!(f, "item"),
            EntityKind::Category => write!(f, "category"),
            EntityKind::List => write!(f, "list"),
        }
    }
}

/// Errors raised by the entity model and the operations built on it.
///
/// Every variant is raised before any state is touched, so a failed
/// operation leaves the library exactly as it was.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A referenced id does not resolve. Callers passed a stale or bogus id.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// The item is not held by any category of the list.
    #[error("item '{item_id}' is not in any category of list '{list_id}'")]
    ItemNotInList { item_id: Uuid, list_id: Uuid },

    /// The category exists but belongs to a different list.
    #[error("category '{category_id}' does not belong to list '{list_id}'")]
    CategoryNotInList { category_id: Uuid, list_id: Uuid },

    /// A reorder or insert index is out of range.
    #[error("index {index} out of range for sequence of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// A weight or quantity is negative, NaN or infinite.
    #[error("invalid {field} {value}: must be a finite, non-negative number")]
    InvalidValue { field: &'static str, value: f64 },

    /// An import row could not be converted.
    #[error("import row {row}: {reason}")]
    InvalidImportRow { row: usize, reason: String },

    /// Loaded data breaks a cross-reference invariant.
    #[error("corrupt library data: {0}")]
    Corrupt(String),

    #[error("library serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A library mutation was requested while no library is loaded.
    #[error("no library loaded")]
    NoLibrary,
}

impl ModelError {
    pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> Self {
        ModelError::NotFound { kind, id }
    }
}
