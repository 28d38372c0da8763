use super::types::{CaseRecord, HistoryStore, SuiteRecord};
use crate::utils::config::RetentionPolicy;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON object with 'suites' and 'cases' arrays, {0}")]
    Shape(String),
}

/// Keep only the last `cap` items, dropping the oldest from the front
pub fn keep_last<T>(mut items: Vec<T>, cap: usize) -> Vec<T> {
    if items.len() > cap {
        items.drain(..items.len() - cap);
    }
    items
}

fn to_entries<T: Serialize>(records: Vec<T>) -> serde_json::Result<Vec<Value>> {
    records.iter().map(serde_json::to_value).collect()
}

/// Pull one history list out of the document; absent means empty
fn take_entries(
    document: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<Value>, StoreError> {
    match document.remove(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => Err(StoreError::Shape(format!(
            "but '{}' is {}",
            key,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl HistoryStore {
    /// Parse a store document. Entries are not checked against the record layout.
    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        match serde_json::from_str(content)? {
            Value::Object(mut document) => Ok(Self {
                suites: take_entries(&mut document, "suites")?,
                cases: take_entries(&mut document, "cases")?,
            }),
            other => Err(StoreError::Shape(format!(
                "found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read a store from disk. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Like [`HistoryStore::load`], but a broken file is reported and replaced by an empty store
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Error loading JSON from {}: {}", path.display(), e);
                log::warn!("Proceeding with empty data.");
                Self::default()
            }
        }
    }

    /// Append the new records and apply the retention caps
    pub fn merge(
        &mut self,
        suites: Vec<SuiteRecord>,
        cases: Vec<CaseRecord>,
        retention: &RetentionPolicy,
    ) -> serde_json::Result<()> {
        self.suites.extend(to_entries(suites)?);
        self.cases.extend(to_entries(cases)?);
        self.suites = keep_last(std::mem::take(&mut self.suites), retention.max_suites);
        self.cases = keep_last(std::mem::take(&mut self.cases), retention.max_cases);
        Ok(())
    }

    /// Overwrite `path` with the pretty-printed store
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        Ok(())
    }
}

/// Load the store at `data_file_path`, fold in the new records and write it back
pub fn update_data_file(
    suites: Vec<SuiteRecord>,
    cases: Vec<CaseRecord>,
    data_file_path: &Path,
    retention: &RetentionPolicy,
) -> Result<HistoryStore> {
    let mut store = HistoryStore::load_or_empty(data_file_path);
    store
        .merge(suites, cases, retention)
        .context("failed to encode new records")?;
    store.save(data_file_path)?;

    log::info!(
        "History at {} now holds {} suites and {} cases",
        data_file_path.display(),
        store.suites.len(),
        store.cases.len()
    );

    Ok(store)
}
