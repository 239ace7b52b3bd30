//! Dashboard Session
//! Carries the serialized table store between interaction steps. Each step
//! restores the store from the blob, applies one change and writes it back.

use crate::data::{
    table_name, CsvLoader, DataError, EmptyPolicy, Reconciliation, Table, TableLoader, TableStore,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct Session<L: TableLoader = CsvLoader> {
    loader: L,
    policy: EmptyPolicy,
    blob: Option<String>,
}

impl<L: TableLoader> Session<L> {
    pub fn new(loader: L, policy: EmptyPolicy) -> Self {
        Self {
            loader,
            policy,
            blob: None,
        }
    }

    /// The opaque serialized store, `None` when nothing is selected.
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Replace the carried blob, e.g. with one saved by the UI layer.
    pub fn restore(&mut self, blob: Option<String>) {
        self.blob = blob;
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Decode the current store.
    pub fn store(&self) -> Result<TableStore, DataError> {
        TableStore::from_blob(self.blob.as_deref(), &self.policy)
    }

    /// Tables actually loaded, ignoring the empty policy.
    fn loaded(&self) -> Result<TableStore, DataError> {
        TableStore::from_blob(self.blob.as_deref(), &EmptyPolicy::Empty)
    }

    /// Make the store hold exactly the tables for `files`.
    ///
    /// Files already loaded are not read again. An empty selection discards
    /// the store altogether; an unreadable blob is dropped with it and
    /// reports nothing removed.
    ///
    /// The configured [`EmptyPolicy`] placeholder is a lookup default only and
    /// never counts as a loaded table here.
    pub fn select(&mut self, files: &[PathBuf]) -> Result<Reconciliation, DataError> {
        if files.is_empty() {
            let removed = self.loaded().map(|s| s.names()).unwrap_or_default();
            self.blob = None;
            return Ok(Reconciliation {
                removed,
                ..Reconciliation::default()
            });
        }

        let sources: HashMap<String, &Path> = files
            .iter()
            .filter_map(|p| table_name(p).map(|name| (name, p.as_path())))
            .collect();

        let mut store = self.loaded()?;
        let loader = &self.loader;
        let report = store.reconcile(sources.keys().cloned(), |name| match sources.get(name) {
            Some(path) => loader.load(path),
            None => Err(DataError::NotFoundError(name.to_string())),
        });

        self.blob = Some(store.to_blob()?);
        Ok(report)
    }

    /// Drop the carried blob and load `files` from scratch.
    pub fn reset(&mut self, files: &[PathBuf]) -> Result<Reconciliation, DataError> {
        self.blob = None;
        self.select(files)
    }

    /// Look up a table by name, falling back to an empty one with `default_columns`.
    pub fn table<S: AsRef<str>>(
        &self,
        name: &str,
        default_columns: &[S],
    ) -> Result<Table, DataError> {
        Ok(self.store()?.get(name, default_columns).into_owned())
    }
}
