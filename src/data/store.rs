//! Table Store Module
//! Named collection of loaded tables, reconciled against a requested set of
//! names and round-tripped through a single serialized blob.

use super::codec::{decode_table, encode_table};
use super::table::Table;
use super::DataError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Name of the placeholder table used by [`EmptyPolicy::DefaultTable`].
pub const DEFAULT_TABLE_NAME: &str = "df";

/// What an absent or blank blob deserializes to.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// An empty store.
    #[default]
    Empty,
    /// A store holding one empty table with the given columns.
    DefaultTable {
        #[serde(default = "EmptyPolicy::default_name")]
        name: String,
        #[serde(default)]
        columns: Vec<String>,
    },
}

impl EmptyPolicy {
    pub fn default_name() -> String {
        DEFAULT_TABLE_NAME.to_string()
    }
}

/// Outcome of a reconciliation step.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciliation {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Names whose loader failed; they stay absent from the store.
    pub failed: Vec<(String, DataError)>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Currently loaded tables keyed by name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableStore {
    tables: HashMap<String, Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Table)> {
        self.tables.iter()
    }

    /// Insert or replace a table, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    /// The named table, or an empty table with `default_columns` when absent.
    pub fn get<S: AsRef<str>>(&self, name: &str, default_columns: &[S]) -> Cow<'_, Table> {
        match self.tables.get(name) {
            Some(table) => Cow::Borrowed(table),
            None => Cow::Owned(Table::empty(default_columns)),
        }
    }

    /// Bring the key set in line with `desired`.
    ///
    /// Names already present are never reloaded and removed names cause no I/O.
    /// `loader` runs exactly once per missing name; a failed load leaves the
    /// name absent and is reported without stopping the other loads.
    pub fn reconcile<I, S, F>(&mut self, desired: I, mut loader: F) -> Reconciliation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str) -> Result<Table, DataError>,
    {
        let desired: BTreeSet<String> = desired.into_iter().map(Into::into).collect();
        let mut report = Reconciliation::default();

        let to_remove: Vec<String> = self
            .tables
            .keys()
            .filter(|name| !desired.contains(*name))
            .cloned()
            .collect();
        for name in to_remove {
            self.tables.remove(&name);
            report.removed.push(name);
        }
        report.removed.sort();

        for name in desired {
            if self.tables.contains_key(&name) {
                continue;
            }
            match loader(&name) {
                Ok(table) => {
                    self.tables.insert(name.clone(), table);
                    report.added.push(name);
                }
                Err(err) => report.failed.push((name, err)),
            }
        }

        report
    }

    /// Serialize the whole store as a JSON object of name to split table JSON.
    pub fn to_blob(&self) -> Result<String, DataError> {
        let mut encoded = BTreeMap::new();
        for (name, table) in &self.tables {
            encoded.insert(name.as_str(), encode_table(table)?);
        }
        Ok(serde_json::to_string(&encoded)?)
    }

    /// Inverse of [`TableStore::to_blob`]. An absent or blank blob, or one
    /// holding no tables, yields whatever `policy` prescribes.
    pub fn from_blob(blob: Option<&str>, policy: &EmptyPolicy) -> Result<Self, DataError> {
        let blob = match blob {
            Some(b) if !b.trim().is_empty() => b,
            _ => return Ok(Self::from_policy(policy)),
        };

        let encoded: HashMap<String, String> = serde_json::from_str(blob)?;
        if encoded.is_empty() {
            return Ok(Self::from_policy(policy));
        }

        let mut tables = HashMap::with_capacity(encoded.len());
        for (name, json) in encoded {
            let table = decode_table(&json).map_err(|e| {
                DataError::FormatError(format!("table '{}': {}", name, e))
            })?;
            tables.insert(name, table);
        }

        Ok(Self { tables })
    }

    fn from_policy(policy: &EmptyPolicy) -> Self {
        let mut store = Self::new();
        if let EmptyPolicy::DefaultTable { name, columns } = policy {
            store.insert(name.clone(), Table::empty(columns));
        }
        store
    }
}
