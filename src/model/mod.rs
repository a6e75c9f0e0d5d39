//! Entity model: library, lists, categories, items.
//!
//! ```text
//! Library ──owns──→ List ──orders──→ Category ──orders──→ CategoryItem
//!    │                                                        │
//!    └──────────────owns──→ Item ←──────references────────────┘
//! ```
//!
//! Items are library-wide and may be referenced from several lists.
//! Categories belong to exactly one list.

mod category;
mod error;
mod item;
mod library;
mod list;
pub mod weight;

pub use category::Category;
pub use error::{EntityKind, ModelError};
pub use item::{CategoryItem, Item};
pub use library::{Library, OptionalField, OptionalFields};
pub use list::{CategoryTotals, List, ListTotals};
pub use weight::{from_canonical, to_canonical, WeightUnit};
