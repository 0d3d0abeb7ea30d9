use async_trait::async_trait;
use chrono::Utc;
use json::Value;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
  ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait,
  NotSet, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use super::{Item, Query, QueryOutput, Store, StoreError, TableSchema};
use crate::entity::{store_item, store_table};

/// SeaORM-backed store. Items of every table share one physical table.
pub struct SqlStore {
  db: DatabaseConnection,
}

impl SqlStore {
  pub fn new(db: DatabaseConnection) -> Self {
    Self { db }
  }

  /// Connects and brings the schema up to date.
  pub async fn connect(url: &str) -> Result<Self, StoreError> {
    info!("Connecting to database...");
    let db = Database::connect(url).await?;

    info!("Running migrations...");
    Migrator::up(&db, None).await?;

    Ok(Self::new(db))
  }

  async fn schema(&self, table: &str) -> Result<TableSchema, StoreError> {
    let table = store_table::Entity::find_by_id(table)
      .one(&self.db)
      .await?
      .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

    Ok(TableSchema::new(table.partition_key, table.sort_key))
  }
}

#[async_trait]
impl Store for SqlStore {
  async fn ensure_table(
    &self,
    table: &str,
    schema: TableSchema,
  ) -> Result<(), StoreError> {
    if store_table::Entity::find_by_id(table).one(&self.db).await?.is_some() {
      return Ok(());
    }

    store_table::ActiveModel {
      name: Set(table.to_string()),
      partition_key: Set(schema.partition_key),
      sort_key: Set(schema.sort_key),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&self.db)
    .await?;

    info!("Created table `{table}`");
    Ok(())
  }

  async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
    let schema = self.schema(table).await?;
    let (partition, sort) = schema.keys_of(&item)?;

    store_item::ActiveModel {
      id: NotSet,
      table_name: Set(table.to_string()),
      partition_key: Set(partition),
      sort_key: Set(sort),
      attributes: Set(Value::Object(item)),
    }
    .insert(&self.db)
    .await?;

    Ok(())
  }

  async fn query(
    &self,
    table: &str,
    query: Query,
  ) -> Result<QueryOutput, StoreError> {
    self.schema(table).await?;

    let select = store_item::Entity::find()
      .filter(store_item::Column::TableName.eq(table))
      .filter(store_item::Column::PartitionKey.eq(query.partition_key.clone()));

    let select = if query.descending {
      select
        .order_by_desc(store_item::Column::SortKey)
        .order_by_desc(store_item::Column::Id)
    } else {
      select
        .order_by_asc(store_item::Column::SortKey)
        .order_by_asc(store_item::Column::Id)
    };

    let rows = select.all(&self.db).await?;
    let scanned = rows.len();

    let items: Vec<Item> = rows
      .into_iter()
      .filter_map(|row| match row.attributes {
        Value::Object(item) => Some(item),
        _ => None,
      })
      .filter(|item| query.matches(item))
      .collect();

    debug!("Query on `{table}` scanned {scanned}, matched {}", items.len());
    Ok(QueryOutput::new(items))
  }
}
