#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not reach the table store: {0}")]
    Connection(String),
    #[error("Not authorized to access table: {0}")]
    Authorization(String),
    #[error("Table not found: {0}")]
    NotFound(String),
    #[error("Failed to delete row: {0}")]
    RemoteWrite(String),
    #[error("Table store rejected {operation}: {message}")]
    Service { operation: &'static str, message: String },
    #[error("Row is missing key attribute '{0}'")]
    MissingKeyAttribute(String),
    #[error("Table {0} has no usable key schema")]
    InvalidTable(String),
}
