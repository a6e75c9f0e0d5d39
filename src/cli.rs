//! Command-line surface.

use std::fmt::Write as _;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::import::read_csv;
use crate::model::{from_canonical, Library, List, WeightUnit};
use crate::store::{Edit, Store};

#[derive(Parser, Debug)]
#[command(name = "packlist")]
#[command(about = "Packing lists with weight totals, saved locally or to your account", long_about = None)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a list with its totals (default list if omitted)
    Show { list: Option<String> },
    /// Print every list with its total weight
    Lists,
    /// Create a list, seeded with one category and one item
    NewList {
        #[arg(long)]
        name: Option<String>,
    },
    /// Import a CSV file as a new list
    Import {
        file: PathBuf,
        /// List name (default: file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Duplicate a list; items stay shared
    CopyList { list: String },
    RenameList { list: String, name: String },
    RemoveList { list: String },
    /// Make a list the default one
    SetDefault { list: String },
    /// Set the unit totals are shown in, or with --items the unit new items start in
    SetUnit {
        #[arg(value_parser = parse_unit)]
        unit: WeightUnit,
        #[arg(long, default_value_t = false)]
        items: bool,
    },
    /// Store a session token and load the library from the server
    Login { token: String },
    /// Forget the session token
    Signout,
    /// Show where the library is saved
    Status,
}

impl Command {
    /// Whether this command edits the library.
    pub fn edits(&self) -> bool {
        !matches!(
            self,
            Command::Show { .. }
                | Command::Lists
                | Command::Login { .. }
                | Command::Signout
                | Command::Status
        )
    }
}

fn parse_unit(s: &str) -> Result<WeightUnit, String> {
    WeightUnit::parse(s).ok_or_else(|| format!("unknown unit '{s}' (expected oz, lb, g or kg)"))
}

/// Resolve a list by id, or by case-insensitive name.
pub fn find_list(library: &Library, selector: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(selector) {
        if library.list(id).is_ok() {
            return Ok(id);
        }
    }
    let mut matches = library
        .lists()
        .iter()
        .filter(|l| l.name.eq_ignore_ascii_case(selector));
    match (matches.next(), matches.next()) {
        (Some(list), None) => Ok(list.id),
        (Some(_), Some(_)) => bail!("more than one list is named '{selector}', use its id"),
        (None, _) => bail!("no list named '{selector}'"),
    }
}

/// Run a library command against the store. Returns text for stdout.
pub fn execute(store: &mut Store, command: &Command) -> Result<String> {
    let Some(library) = store.library() else {
        bail!("no library loaded");
    };

    match command {
        Command::Show { list } => {
            let list_id = match list {
                Some(selector) => find_list(library, selector)?,
                None => library.default_list_id().context("library has no lists")?,
            };
            render_list(library, library.list(list_id)?)
        }
        Command::Lists => Ok(render_lists(library)),
        Command::NewList { name } => {
            store.dispatch(Edit::NewList)?;
            let list_id = current_default(store)?;
            if let Some(name) = name {
                store.dispatch(Edit::UpdateListName {
                    list_id,
                    name: name.clone(),
                })?;
            }
            Ok(format!("Created list {list_id}\n"))
        }
        Command::Import { file, name } => {
            let reader =
                File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
            let rows =
                read_csv(reader).with_context(|| format!("failed to read {}", file.display()))?;
            let count = rows.len();
            let name = name.clone().unwrap_or_else(|| list_name_from_path(file));
            store.dispatch(Edit::ImportRows { name, rows })?;
            let list_id = current_default(store)?;
            Ok(format!("Imported {count} rows into list {list_id}\n"))
        }
        Command::CopyList { list } => {
            let list_id = find_list(library, list)?;
            store.dispatch(Edit::CopyList { list_id })?;
            Ok(format!("Created list {}\n", current_default(store)?))
        }
        Command::RenameList { list, name } => {
            let list_id = find_list(library, list)?;
            store.dispatch(Edit::UpdateListName {
                list_id,
                name: name.clone(),
            })?;
            Ok(String::new())
        }
        Command::RemoveList { list } => {
            let list_id = find_list(library, list)?;
            store.dispatch(Edit::RemoveList { list_id })?;
            Ok(format!("Removed list {list_id}\n"))
        }
        Command::SetDefault { list } => {
            let list_id = find_list(library, list)?;
            store.dispatch(Edit::SetDefaultList { list_id })?;
            Ok(String::new())
        }
        Command::SetUnit { unit, items } => {
            let edit = if *items {
                Edit::SetItemUnit(*unit)
            } else {
                Edit::SetTotalUnit(*unit)
            };
            store.dispatch(edit)?;
            Ok(String::new())
        }
        Command::Login { .. } | Command::Signout | Command::Status => {
            bail!("not a library command")
        }
    }
}

fn current_default(store: &Store) -> Result<Uuid> {
    store
        .library()
        .and_then(Library::default_list_id)
        .context("library has no default list")
}

fn list_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "Imported list".to_string())
}

fn render_lists(library: &Library) -> String {
    let mut out = String::new();
    for list in library.lists() {
        let marker = if library.default_list_id() == Some(list.id) {
            "*"
        } else {
            " "
        };
        let name = if list.name.is_empty() {
            "(untitled)"
        } else {
            list.name.as_str()
        };
        let _ = writeln!(
            out,
            "{marker} {name:<32} {:>10.2} {}  {}",
            list.totals.total_in_unit(),
            list.totals.unit,
            list.id
        );
    }
    out
}

/// Render one list: categories, items and weight totals.
pub fn render_list(library: &Library, list: &List) -> Result<String> {
    let totals = &list.totals;
    let unit = totals.unit;
    let mut out = String::new();

    let title = if list.name.is_empty() {
        "(untitled)"
    } else {
        list.name.as_str()
    };
    let _ = writeln!(out, "{title}");
    if !list.description.is_empty() {
        let _ = writeln!(out, "{}", list.description);
    }

    for category_id in &list.category_ids {
        let category = library.category(*category_id)?;
        let weight = totals
            .categories
            .iter()
            .find(|c| c.category_id == *category_id)
            .map_or(0.0, |c| c.weight);
        let _ = writeln!(
            out,
            "\n{:<40} {:>10.2} {unit}",
            category.name,
            from_canonical(weight, unit)
        );

        for category_item in &category.category_items {
            let item = library.item(category_item.item_id)?;
            let mut flags = String::new();
            if category_item.worn {
                flags.push_str(" [worn]");
            }
            if category_item.consumable {
                flags.push_str(" [consumable]");
            }
            let _ = writeln!(
                out,
                "  {:<30} x{:<4} {:>8.2} {}{flags}",
                item.name,
                category_item.qty,
                from_canonical(item.weight, item.author_unit),
                item.author_unit
            );
        }
    }

    let _ = writeln!(out);
    for (label, mg) in [
        ("Total", totals.total_weight),
        ("Consumable", totals.consumable_weight),
        ("Worn", totals.worn_weight),
        ("Base weight", totals.base_weight),
    ] {
        let _ = writeln!(out, "{label:<40} {:>10.2} {unit}", from_canonical(mg, unit));
    }
    let _ = writeln!(out, "{:<40} {:>10}", "Items", totals.total_qty);
    Ok(out)
}
