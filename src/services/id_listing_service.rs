use std::collections::BTreeSet;

use aws_sdk_dynamodb::types::AttributeValue;
use futures::TryStreamExt;
use tracing::{debug, instrument, warn};

use crate::store::{scan, ScanRequest, StoreError, TableStore};

/// Header line followed by one id per line
pub fn render_ids(id_attribute: &str, table_name: &str, region: &str, ids: &[String]) -> String {
    let mut out =
        format!("Retrieved unique {id_attribute} values from table {table_name} in {region}:\n");
    for id in ids {
        out.push_str(id);
        out.push('\n');
    }
    out
}

/// Collects the distinct values of the id attribute across the whole table
pub struct IdListingService<S> {
    store: S,
    id_attribute: String,
    page_size: Option<u32>,
}

impl<S: TableStore> IdListingService<S> {
    pub fn new(store: S, id_attribute: impl Into<String>) -> Self {
        Self {
            store,
            id_attribute: id_attribute.into(),
            page_size: None,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Unique ids in sorted order. Read-only; repeated calls on an unchanged table
    /// return the same list.
    #[instrument(skip(self), fields(table = %self.store.table_name()))]
    pub async fn list_unique_ids(&self) -> Result<Vec<String>, StoreError> {
        let request = ScanRequest::all()
            .project(vec![self.id_attribute.clone()])
            .page_size(self.page_size);
        let rows = scan(&self.store, request);
        futures::pin_mut!(rows);

        let mut ids = BTreeSet::new();
        let mut scanned = 0usize;
        while let Some(mut row) = rows.try_next().await? {
            scanned += 1;
            match row.remove(&self.id_attribute) {
                Some(AttributeValue::S(id)) => {
                    ids.insert(id);
                }
                Some(other) => warn!(
                    "Skipping row with non-string {}: {:?}",
                    self.id_attribute, other
                ),
                None => warn!("Skipping row without {}", self.id_attribute),
            }
        }

        debug!("Found {} unique ids in {} rows", ids.len(), scanned);
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ids_header_and_lines() {
        let ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(
            render_ids("Id", "Temperatures", "us-east-1", &ids),
            "Retrieved unique Id values from table Temperatures in us-east-1:\nA\nB\nC\n"
        );
    }

    #[test]
    fn test_render_ids_empty_table() {
        assert_eq!(
            render_ids("Id", "Temperatures", "us-east-1", &[]),
            "Retrieved unique Id values from table Temperatures in us-east-1:\n"
        );
    }
}
