//! Key/sort-key item store used to persist release events
//!
//! A table groups items by a string partition key and orders them by an
//! integer sort key. Items are schema-less JSON objects; the key attributes
//! are named by the table's [`TableSchema`].

pub mod memory;
pub mod sql;

use std::cmp::Ordering;

use async_trait::async_trait;
use json::{Map, Value};

pub use memory::MemoryStore;
pub use sql::SqlStore;

/// Native attribute representation of a stored record.
pub type Item = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("table `{0}` does not exist")]
  TableNotFound(String),

  #[error("item is missing key attribute `{0}`")]
  MissingKey(String),

  #[error("key attribute `{0}` has an unsupported type")]
  InvalidKey(String),

  #[error("backend error: {0}")]
  Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
  fn from(err: sea_orm::DbErr) -> Self {
    Self::Backend(err.to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
  pub partition_key: String,
  pub sort_key: String,
}

impl TableSchema {
  pub fn new(
    partition_key: impl Into<String>,
    sort_key: impl Into<String>,
  ) -> Self {
    Self { partition_key: partition_key.into(), sort_key: sort_key.into() }
  }

  pub(crate) fn keys_of(
    &self,
    item: &Item,
  ) -> Result<(String, i64), StoreError> {
    let partition = match item.get(&self.partition_key) {
      Some(Value::String(value)) => value.clone(),
      Some(_) => return Err(StoreError::InvalidKey(self.partition_key.clone())),
      None => return Err(StoreError::MissingKey(self.partition_key.clone())),
    };

    let sort = match item.get(&self.sort_key) {
      Some(value) => value
        .as_i64()
        .ok_or_else(|| StoreError::InvalidKey(self.sort_key.clone()))?,
      None => return Err(StoreError::MissingKey(self.sort_key.clone())),
    };

    Ok((partition, sort))
  }
}

/// Partition-scoped query with equality post-filters.
#[derive(Debug, Clone)]
pub struct Query {
  pub partition_key: String,
  pub descending: bool,
  pub filter: Vec<(String, Value)>,
}

impl Query {
  pub fn partition(key: impl Into<String>) -> Self {
    Self { partition_key: key.into(), descending: false, filter: Vec::new() }
  }

  pub fn descending(mut self) -> Self {
    self.descending = true;
    self
  }

  pub fn filter_eq(
    mut self,
    attribute: impl Into<String>,
    value: impl Into<Value>,
  ) -> Self {
    self.filter.push((attribute.into(), value.into()));
    self
  }

  pub(crate) fn matches(&self, item: &Item) -> bool {
    self.filter.iter().all(|(attr, value)| item.get(attr) == Some(value))
  }

  /// Ordering by sort key, ties broken by insertion sequence.
  pub(crate) fn order(&self, a: (i64, u64), b: (i64, u64)) -> Ordering {
    if self.descending { b.cmp(&a) } else { a.cmp(&b) }
  }
}

#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
  pub items: Vec<Item>,
  /// Number of items left after filtering.
  pub count: usize,
}

impl QueryOutput {
  pub fn new(items: Vec<Item>) -> Self {
    Self { count: items.len(), items }
  }
}

#[async_trait]
pub trait Store: Send + Sync {
  /// Creates the table if it does not exist yet.
  async fn ensure_table(
    &self,
    table: &str,
    schema: TableSchema,
  ) -> Result<(), StoreError>;

  /// Unconditional write; every call adds a new item.
  async fn put(&self, table: &str, item: Item) -> Result<(), StoreError>;

  async fn query(
    &self,
    table: &str,
    query: Query,
  ) -> Result<QueryOutput, StoreError>;
}
