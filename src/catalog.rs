//! Source-table catalog: listing with internal-table filtering, per-table
//! selection, and preview fetching.

use std::collections::BTreeMap;
use tracing::warn;

use crate::backend::DataBackend;
use crate::error::Error;
use crate::result_set::{ResultSet, Row};

/// Bookkeeping tables never offered as chart sources, regardless of what the
/// backend lists.
pub const INTERNAL_TABLES: [&str; 4] = [
    "visualisasi",
    "parameter_visualisasi",
    "analisis",
    "analisis_visualisasi",
];

/// Default number of preview rows shown per selected table.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug)]
pub struct Catalog {
    tables: Vec<String>,
    /// Selection state per listed table. Replaced wholesale on each toggle,
    /// never mutated in place.
    selected: BTreeMap<String, bool>,
    previews: BTreeMap<String, ResultSet>,
    /// Extra excluded names from configuration, on top of INTERNAL_TABLES.
    excluded: Vec<String>,
    preview_rows: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_excluded(Vec::new(), DEFAULT_PREVIEW_ROWS)
    }

    pub fn with_excluded(excluded: Vec<String>, preview_rows: usize) -> Self {
        Self {
            tables: Vec::new(),
            selected: BTreeMap::new(),
            previews: BTreeMap::new(),
            excluded,
            preview_rows,
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        INTERNAL_TABLES.contains(&name) || self.excluded.iter().any(|e| e == name)
    }

    /// Re-list the selectable sources. Selections reset to unchecked and
    /// previews are dropped; the internal-table filter always applies.
    pub fn refresh(&mut self, backend: &impl DataBackend) -> Result<(), Error> {
        let names = backend.list_tables()?;
        self.tables = names.into_iter().filter(|n| !self.is_excluded(n)).collect();
        self.selected = self
            .tables
            .iter()
            .map(|name| (name.clone(), false))
            .collect();
        self.previews.clear();
        Ok(())
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.get(name).copied().unwrap_or(false)
    }

    /// Toggle a table's checkbox. Checking fetches its preview; a fetch
    /// failure is logged and leaves all prior state unchanged. Unchecking
    /// drops the stored preview. Returns the table's selection state after
    /// the toggle.
    pub fn toggle(&mut self, backend: &impl DataBackend, name: &str) -> bool {
        if !self.selected.contains_key(name) {
            return false;
        }
        if self.is_selected(name) {
            let mut updated = self.selected.clone();
            updated.insert(name.to_string(), false);
            self.selected = updated;
            self.previews.remove(name);
            false
        } else {
            match backend.fetch_table(name) {
                Ok(rows) => {
                    let mut updated = self.selected.clone();
                    updated.insert(name.to_string(), true);
                    self.selected = updated;
                    self.previews.insert(name.to_string(), rows);
                    true
                }
                Err(err) => {
                    warn!(table = name, error = %err, "preview fetch failed");
                    false
                }
            }
        }
    }

    /// Full preview rows for a selected table.
    pub fn preview(&self, name: &str) -> Option<&ResultSet> {
        self.previews.get(name)
    }

    /// Preview rows capped at the configured display count.
    pub fn preview_head(&self, name: &str) -> Option<&[Row]> {
        self.previews
            .get(name)
            .map(|rows| &rows[..rows.len().min(self.preview_rows)])
    }

    /// Selected tables with their previews, in table-name order.
    pub fn selected_previews(&self) -> impl Iterator<Item = (&str, &ResultSet)> {
        self.previews.iter().map(|(name, rows)| (name.as_str(), rows))
    }
}
