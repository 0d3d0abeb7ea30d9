use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Item, Query, QueryOutput, Store, StoreError, TableSchema};

struct Row {
  seq: u64,
  partition: String,
  sort: i64,
  item: Item,
}

struct Table {
  schema: TableSchema,
  rows: Vec<Row>,
}

/// In-process store, lost on restart.
pub struct MemoryStore {
  tables: DashMap<String, Table>,
  seq: AtomicU64,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self { tables: DashMap::new(), seq: AtomicU64::new(0) }
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn ensure_table(
    &self,
    table: &str,
    schema: TableSchema,
  ) -> Result<(), StoreError> {
    self
      .tables
      .entry(table.to_string())
      .or_insert_with(|| Table { schema, rows: Vec::new() });
    Ok(())
  }

  async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
    let mut table = self
      .tables
      .get_mut(table)
      .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

    let (partition, sort) = table.schema.keys_of(&item)?;
    let seq = self.seq.fetch_add(1, Ordering::Relaxed);
    table.rows.push(Row { seq, partition, sort, item });
    Ok(())
  }

  async fn query(
    &self,
    table: &str,
    query: Query,
  ) -> Result<QueryOutput, StoreError> {
    let table = self
      .tables
      .get(table)
      .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

    let mut rows: Vec<&Row> = table
      .rows
      .iter()
      .filter(|row| row.partition == query.partition_key)
      .filter(|row| query.matches(&row.item))
      .collect();
    rows.sort_by(|a, b| query.order((a.sort, a.seq), (b.sort, b.seq)));

    Ok(QueryOutput::new(rows.into_iter().map(|row| row.item.clone()).collect()))
  }
}
