pub mod dynamo_table;
pub mod error;
pub mod models;
pub mod scanner;
pub mod table_store;

pub use dynamo_table::DynamoTable;
pub use error::StoreError;
pub use models::*;
pub use scanner::scan;
pub use table_store::TableStore;
