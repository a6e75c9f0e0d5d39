//! Importing a list from spreadsheet rows.
//!
//! Rows arrive as raw strings (one per CSV cell). Every row is parsed
//! before the library is touched; a bad row rejects the whole import.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{to_canonical, Library, ModelError, WeightUnit};

/// One imported line, as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(alias = "Category")]
    pub category: String,
    #[serde(alias = "Item Name")]
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    pub qty: String,
    pub weight: String,
    pub unit: String,
}

struct ParsedRow<'a> {
    row: &'a ImportRow,
    qty: f64,
    weight: f64,
    unit: WeightUnit,
}

/// Read rows from CSV with a header line.
///
/// Accepts both the field names of [`ImportRow`] and the spreadsheet export
/// headers (`Item Name`, `Category`, `desc`, `qty`, `weight`, `unit`).
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ImportRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.deserialize().collect()
}

/// Build a new list named `name` from `rows`, grouping rows by category
/// name in first-seen order. The new list becomes the default list.
pub fn import_rows(
    library: &mut Library,
    name: &str,
    rows: &[ImportRow],
) -> Result<Uuid, ModelError> {
    let parsed = rows
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(index, row))
        .collect::<Result<Vec<_>, _>>()?;

    let list_id = library.create_list();
    library.list_mut(list_id)?.name = name.to_string();

    let mut categories: HashMap<&str, Uuid> = HashMap::new();
    for entry in parsed {
        let category_id = match categories.get(entry.row.category.as_str()) {
            Some(id) => *id,
            None => {
                let id = library.new_category(list_id)?;
                library.category_mut(id)?.name = entry.row.category.clone();
                categories.insert(entry.row.category.as_str(), id);
                id
            }
        };

        let item_id = library.new_item(category_id)?;
        let item = library.item_mut(item_id)?;
        item.name = entry.row.name.clone();
        item.description = entry.row.description.clone();
        item.weight = to_canonical(entry.weight, entry.unit);
        item.author_unit = entry.unit;

        if let Some(ci) = library
            .category_mut(category_id)?
            .category_items
            .iter_mut()
            .find(|ci| ci.item_id == item_id)
        {
            ci.qty = entry.qty;
        }
    }

    library.calculate_totals(list_id)?;
    library.set_default_list(list_id)?;
    Ok(list_id)
}

fn parse_row(index: usize, row: &ImportRow) -> Result<ParsedRow<'_>, ModelError> {
    let invalid = |reason: String| ModelError::InvalidImportRow { row: index, reason };

    let qty = parse_number(&row.qty).ok_or_else(|| invalid(format!("bad qty '{}'", row.qty)))?;
    let weight = parse_number(&row.weight)
        .ok_or_else(|| invalid(format!("bad weight '{}'", row.weight)))?;
    let unit = WeightUnit::parse(&row.unit)
        .ok_or_else(|| invalid(format!("unknown unit '{}'", row.unit)))?;

    Ok(ParsedRow {
        row,
        qty,
        weight,
        unit,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}
