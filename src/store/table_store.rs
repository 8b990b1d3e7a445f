use async_trait::async_trait;

use crate::store::{KeySchema, Row, ScanPage, ScanRequest, StoreError};

/// A remote table that can be scanned page by page and have rows deleted by key
#[async_trait]
pub trait TableStore: Send + Sync {
    fn table_name(&self) -> &str;

    /// Where the table lives, for user-facing messages
    fn region(&self) -> &str;

    fn key_schema(&self) -> &KeySchema;

    /// Fetch one page, continuing after `start_key` when given
    async fn scan_page(
        &self,
        request: &ScanRequest,
        start_key: Option<Row>,
    ) -> Result<ScanPage, StoreError>;

    async fn delete_row(&self, key: Row) -> Result<(), StoreError>;
}
