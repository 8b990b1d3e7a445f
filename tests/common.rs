// Shared in-memory table for service and scanner tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use temperature_table_tools::store::{
    KeySchema, Row, ScanFilter, ScanPage, ScanRequest, StoreError, TableStore,
};

const DEFAULT_PAGE_SIZE: usize = 2;

#[derive(Default)]
struct State {
    rows: BTreeMap<String, Row>,
    deletes: usize,
    scan_calls: usize,
    fail_delete_after: Option<usize>,
    fail_scan_on_call: Option<usize>,
}

/// Table kept in memory, paginated by primary key like DynamoDB.
/// Clones share the same rows.
#[derive(Clone)]
pub struct MemoryTable {
    state: Arc<Mutex<State>>,
    key_schema: KeySchema,
    page_size: usize,
}

impl MemoryTable {
    /// Table keyed by `Id` (partition) and `v` (sort)
    pub fn new() -> Self {
        Self::with_schema(KeySchema::new("Id", Some("v".to_string())))
    }

    pub fn with_schema(key_schema: KeySchema) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            key_schema,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn insert(&self, row: Row) {
        let key = self.storage_key(&row);
        self.state.lock().unwrap().rows.insert(key, row);
    }

    /// Let `n` deletes succeed, then fail every delete after that
    pub fn fail_delete_after(&self, n: usize) {
        self.state.lock().unwrap().fail_delete_after = Some(n);
    }

    /// Fail the `n`th scan page request (1-based)
    pub fn fail_scan_on_call(&self, n: usize) {
        self.state.lock().unwrap().fail_scan_on_call = Some(n);
    }

    pub fn snapshot(&self) -> Vec<Row> {
        self.state.lock().unwrap().rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    pub fn scan_calls(&self) -> usize {
        self.state.lock().unwrap().scan_calls
    }

    fn storage_key(&self, row: &Row) -> String {
        self.key_schema
            .attribute_names()
            .iter()
            .map(|name| match row.get(name) {
                Some(AttributeValue::S(s)) => s.clone(),
                Some(AttributeValue::N(n)) => format!("{n:0>20}"),
                Some(other) => format!("{other:?}"),
                None => panic!("row is missing key attribute {name}"),
            })
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }
}

#[async_trait]
impl TableStore for MemoryTable {
    fn table_name(&self) -> &str {
        "Temperatures"
    }

    fn region(&self) -> &str {
        "local"
    }

    fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    async fn scan_page(
        &self,
        request: &ScanRequest,
        start_key: Option<Row>,
    ) -> Result<ScanPage, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.scan_calls += 1;
        if state.fail_scan_on_call == Some(state.scan_calls) {
            return Err(StoreError::Connection("simulated network failure".to_string()));
        }

        let limit = request
            .page_size
            .map(|n| n as usize)
            .unwrap_or(self.page_size);
        let start = start_key.map(|key| self.storage_key(&key));

        let mut remaining = state
            .rows
            .iter()
            .filter(|(key, _)| start.as_ref().map_or(true, |start| *key > start));
        let evaluated: Vec<&Row> = remaining.by_ref().take(limit).map(|(_, row)| row).collect();
        let more = remaining.next().is_some();

        let last_evaluated_key = match evaluated.last() {
            Some(last) if more => Some(self.key_schema.key_of(last)?),
            _ => None,
        };
        let rows = evaluated
            .into_iter()
            .filter(|row| request.filter.as_ref().map_or(true, |f| matches_filter(f, row)))
            .map(|row| project(request, row.clone()))
            .collect();

        Ok(ScanPage {
            rows,
            last_evaluated_key,
        })
    }

    async fn delete_row(&self, key: Row) -> Result<(), StoreError> {
        let storage_key = self.storage_key(&key);
        let mut state = self.state.lock().unwrap();
        if state.fail_delete_after == Some(state.deletes) {
            return Err(StoreError::RemoteWrite("simulated write failure".to_string()));
        }
        state.rows.remove(&storage_key);
        state.deletes += 1;
        Ok(())
    }
}

/// Equality check DynamoDB applies server-side for a scan filter
pub fn matches_filter(filter: &ScanFilter, row: &Row) -> bool {
    row.get(&filter.attribute) == Some(&filter.value)
}

/// Reduce `row` to the requested attributes
pub fn project(request: &ScanRequest, mut row: Row) -> Row {
    if let Some(attributes) = &request.projection {
        row.retain(|name, _| attributes.iter().any(|a| a == name));
    }
    row
}

pub fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

pub fn n(value: i64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// A reading row: `Id`, sort key `v`, and a temperature payload
pub fn reading(id: &str, v: i64) -> Row {
    let mut row = Row::new();
    row.insert("Id".to_string(), s(id));
    row.insert("v".to_string(), n(v));
    row.insert("Temperature".to_string(), n(20 + v));
    row
}

pub fn table_with(rows: Vec<Row>) -> MemoryTable {
    let table = MemoryTable::new();
    for row in rows {
        table.insert(row);
    }
    table
}
