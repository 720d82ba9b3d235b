//! JSON Lines file provider.
//!
//! Re-reads the file on every fetch, so an auto-refresh tick observes lines
//! that were appended or rewritten since the previous fetch.

use super::ItemsProvider;
use crate::model::{FetchError, Items, Record, DEFAULT_KEY_FIELD};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Serves records from a JSON Lines file, one object per line.
///
/// Blank lines are ignored. Lines that are not JSON objects are skipped with a
/// warning and do not count towards offsets. Filtering is a case-insensitive
/// substring match on the raw line text.
#[derive(Debug, Clone)]
pub struct JsonlFileProvider {
    path: PathBuf,
    key_field: String,
}

impl JsonlFileProvider {
    /// Provider keyed on the `id` field.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
        }
    }

    /// Use `field` as the unique key.
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Field used as the unique key.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    async fn read_records(&self, filter: Option<&str>) -> Result<Vec<Record>, FetchError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Io {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let needle = filter.map(str::to_lowercase);
        let records = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter(|(_, line)| match &needle {
                Some(needle) => line.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter_map(|(index, line)| match Record::parse(line, &self.key_field) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %err,
                        "skipping malformed line"
                    );
                    None
                }
            })
            .collect();
        Ok(records)
    }
}

#[async_trait(?Send)]
impl ItemsProvider for JsonlFileProvider {
    type Item = Record;

    async fn fetch_items(&self, offset: usize, count: usize) -> Result<Items<Record>, FetchError> {
        let records = self.read_records(None).await?;
        Ok(Items::slice_of(&records, offset, count))
    }

    async fn fetch_filtered_items(
        &self,
        filter: &str,
        offset: usize,
        count: usize,
    ) -> Result<Items<Record>, FetchError> {
        let records = self.read_records(Some(filter)).await?;
        Ok(Items::slice_of(&records, offset, count))
    }
}
