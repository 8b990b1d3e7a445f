use aws_sdk_dynamodb::types::AttributeValue;
use futures::TryStreamExt;
use tracing::{debug, info, instrument, warn};

use crate::services::Confirmer;
use crate::store::{scan, ScanFilter, ScanRequest, StoreError, TableStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The confirmation was refused; nothing was touched
    Aborted,
    Deleted(usize),
}

impl std::fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteOutcome::Aborted => write!(f, "OK, not deleting anything!"),
            DeleteOutcome::Deleted(count) => write!(f, "Deleted {count} rows."),
        }
    }
}

/// Progress reported while `delete_rows` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteEvent {
    /// The prompt was accepted and the scan is about to start
    Confirmed,
    /// Running total after each successful delete
    RowDeleted(usize),
}

type EventHook = Box<dyn Fn(DeleteEvent) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("Failed to read confirmation: {0}")]
    Confirmation(#[from] std::io::Error),
    /// Rows removed before the failure stay removed
    #[error("Deletion stopped after {deleted} rows: {source}")]
    Interrupted {
        deleted: usize,
        #[source]
        source: StoreError,
    },
}

impl DeleteError {
    pub fn deleted(&self) -> usize {
        match self {
            DeleteError::Confirmation(_) => 0,
            DeleteError::Interrupted { deleted, .. } => *deleted,
        }
    }
}

/// Removes every row whose id attribute equals a given value, one delete call per row
pub struct DeleteService<S> {
    store: S,
    id_attribute: String,
    page_size: Option<u32>,
    on_event: EventHook,
}

impl<S: TableStore> DeleteService<S> {
    pub fn new(store: S, id_attribute: impl Into<String>) -> Self {
        Self {
            store,
            id_attribute: id_attribute.into(),
            page_size: None,
            on_event: Box::new(|_| {}),
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn on_event<F>(mut self, hook: F) -> Self
    where
        F: Fn(DeleteEvent) + Send + Sync + 'static,
    {
        self.on_event = Box::new(hook);
        self
    }

    pub fn prompt(&self, id: &str) -> String {
        format!(
            "About to delete all rows with {} {} from table {} in {}.",
            self.id_attribute,
            id,
            self.store.table_name(),
            self.store.region()
        )
    }

    /// Ask `confirmer`, then delete every matching row.
    ///
    /// Fails fast: the first scan or delete error ends the run and is returned together
    /// with the number of rows already deleted.
    #[instrument(skip(self, confirmer), fields(table = %self.store.table_name()))]
    pub async fn delete_rows<C>(
        &self,
        id: &str,
        confirmer: &mut C,
    ) -> Result<DeleteOutcome, DeleteError>
    where
        C: Confirmer + ?Sized,
    {
        if !confirmer.confirm(&self.prompt(id))? {
            info!("Deletion of {} not confirmed", id);
            return Ok(DeleteOutcome::Aborted);
        }
        (self.on_event)(DeleteEvent::Confirmed);

        let mut deleted = 0;
        let rows = scan(&self.store, self.matching_request(id));
        futures::pin_mut!(rows);

        loop {
            let row = match rows.try_next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(source) => return Err(self.interrupted(deleted, source)),
            };

            let result = match self.store.key_schema().key_of(&row) {
                Ok(key) => self.store.delete_row(key).await,
                Err(e) => Err(e),
            };
            if let Err(source) = result {
                return Err(self.interrupted(deleted, source));
            }

            deleted += 1;
            (self.on_event)(DeleteEvent::RowDeleted(deleted));
            debug!("Deleted row {}", deleted);
        }

        info!("Deleted {} rows with {} {}", deleted, self.id_attribute, id);
        Ok(DeleteOutcome::Deleted(deleted))
    }

    /// Count the rows `delete_rows` would remove, without prompting or deleting
    #[instrument(skip(self), fields(table = %self.store.table_name()))]
    pub async fn count_matching(&self, id: &str) -> Result<usize, StoreError> {
        let rows = scan(&self.store, self.matching_request(id));
        futures::pin_mut!(rows);

        let mut count = 0;
        while rows.try_next().await?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    // Only key attributes are fetched; they are all a delete needs
    fn matching_request(&self, id: &str) -> ScanRequest {
        ScanRequest::all()
            .filter(ScanFilter::equals(
                self.id_attribute.clone(),
                AttributeValue::S(id.to_string()),
            ))
            .project(self.store.key_schema().attribute_names())
            .page_size(self.page_size)
    }

    fn interrupted(&self, deleted: usize, source: StoreError) -> DeleteError {
        warn!("Deletion stopped after {} rows: {}", deleted, source);
        DeleteError::Interrupted { deleted, source }
    }
}
