use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::store::StoreError;

/// One record of the table, as returned by a scan
pub type Row = HashMap<String, AttributeValue>;

/// Primary key layout of a table: a partition key and an optional sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_key: String,
    pub sort_key: Option<String>,
}

impl KeySchema {
    pub fn new(partition_key: impl Into<String>, sort_key: Option<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key,
        }
    }

    pub fn attribute_names(&self) -> Vec<String> {
        let mut names = vec![self.partition_key.clone()];
        names.extend(self.sort_key.iter().cloned());
        names
    }

    /// Extract the key attributes needed to address `row` for a delete
    pub fn key_of(&self, row: &Row) -> Result<Row, StoreError> {
        let mut key = Row::new();
        for name in self.attribute_names() {
            let value = row
                .get(&name)
                .cloned()
                .ok_or_else(|| StoreError::MissingKeyAttribute(name.clone()))?;
            key.insert(name, value);
        }
        Ok(key)
    }
}

/// Server-side equality predicate: `attribute = value`
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    pub attribute: String,
    pub value: AttributeValue,
}

impl ScanFilter {
    pub fn equals(attribute: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            attribute: attribute.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRequest {
    /// Attributes to return; `None` returns every attribute
    pub projection: Option<Vec<String>>,
    pub filter: Option<ScanFilter>,
    /// Upper bound on rows evaluated per page (before filtering)
    pub page_size: Option<u32>,
}

impl ScanRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn project(mut self, attributes: Vec<String>) -> Self {
        self.projection = Some(attributes);
        self
    }

    pub fn filter(mut self, filter: ScanFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One page of scan results. A present `last_evaluated_key` means more pages follow,
/// even when `rows` is empty.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub rows: Vec<Row>,
    pub last_evaluated_key: Option<Row>,
}
