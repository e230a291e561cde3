//! Name column heuristics.
//!
//! Picks the columns of a table that best describe a row to a human, such as
//! a person's first and last name, a title, or failing that a few short text
//! columns. The picks feed the label expressions of display SQL.
//!
//! Selection runs in tiers. Each tier adds its matches to what earlier tiers
//! found; the search stops as soon as at least [`MIN_LABEL_COLUMNS`] columns
//! are chosen. Chosen columns are reported in the order the tiers found
//! them, so better label columns lead; a column matched again by a later
//! tier keeps its first position.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::core::schema::{Column, TableColumns};
use crate::core::traits::Dialect;

/// Column names that identify a person or account.
pub const PERSON_COLUMNS: &[&str] = &[
    "firstname",
    "first_name",
    "lastname",
    "last_name",
    "username",
    "email",
];

/// Column names that title a record.
pub const TITLE_COLUMNS: &[&str] = &["title", "name"];

/// Longest declared length still considered short text.
pub const SHORT_TEXT_LENGTH: i64 = 255;

/// Most columns a scanning tier adds.
pub const MAX_SCANNED_COLUMNS: usize = 4;

/// Number of chosen columns that ends the search.
pub const MIN_LABEL_COLUMNS: usize = 2;

/// A selection tier, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Text columns named like a person or account.
    Person,
    /// Text columns named like a title.
    Title,
    /// Text columns of short declared length.
    ShortText,
    /// Any text columns.
    AnyText,
    /// Any columns except `id`.
    Fallback,
}

impl Tier {
    /// Every tier in search order.
    pub const ALL: [Tier; 5] = [
        Tier::Person,
        Tier::Title,
        Tier::ShortText,
        Tier::AnyText,
        Tier::Fallback,
    ];

    fn matches(&self, column: &Column) -> bool {
        match self {
            Tier::Person => {
                column.semantic_type.is_text() && PERSON_COLUMNS.contains(&column.name.as_str())
            }
            Tier::Title => {
                column.semantic_type.is_text() && TITLE_COLUMNS.contains(&column.name.as_str())
            }
            Tier::ShortText => column.is_short_text(SHORT_TEXT_LENGTH),
            Tier::AnyText => column.semantic_type.is_text(),
            Tier::Fallback => column.name != "id",
        }
    }

    /// Most matches this tier adds, or `None` when it takes every match.
    fn limit(&self) -> Option<usize> {
        match self {
            Tier::Person | Tier::Title => None,
            Tier::ShortText | Tier::AnyText | Tier::Fallback => Some(MAX_SCANNED_COLUMNS),
        }
    }

    fn collect<'a>(&self, columns: &'a TableColumns, chosen: &mut IndexSet<&'a str>) {
        let mut matched = 0;
        for column in columns.values() {
            if self.limit().is_some_and(|max| matched >= max) {
                break;
            }
            if self.matches(column) {
                chosen.insert(column.name.as_str());
                matched += 1;
            }
        }
    }
}

/// Choose the name columns of a table, in tier order.
///
/// Returns an empty list only for a table with no columns besides `id`.
pub fn select_name_columns(columns: &TableColumns) -> Vec<&Column> {
    let mut chosen = IndexSet::new();
    for tier in Tier::ALL {
        tier.collect(columns, &mut chosen);
        if chosen.len() >= MIN_LABEL_COLUMNS {
            debug!("Name columns settled at {:?} tier ({} chosen)", tier, chosen.len());
            break;
        }
    }

    chosen
        .into_iter()
        .filter_map(|name| columns.get(name))
        .collect()
}

/// Choose the name columns of a table and format them for a query.
///
/// Keys are column names; values are the columns qualified with `alias`
/// and quoted by `dialect`.
pub fn name_columns(
    columns: &TableColumns,
    alias: &str,
    dialect: &dyn Dialect,
) -> IndexMap<String, String> {
    select_name_columns(columns)
        .into_iter()
        .map(|c| (c.name.clone(), dialect.qualify(alias, &c.name)))
        .collect()
}
