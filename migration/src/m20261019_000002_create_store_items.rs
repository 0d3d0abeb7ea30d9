use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_store_tables::StoreTables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(StoreItems::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(StoreItems::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(StoreItems::TableName).string().not_null())
          .col(ColumnDef::new(StoreItems::PartitionKey).string().not_null())
          .col(ColumnDef::new(StoreItems::SortKey).big_integer().not_null())
          .col(ColumnDef::new(StoreItems::Attributes).json().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_store_items_table")
              .from(StoreItems::Table, StoreItems::TableName)
              .to(StoreTables::Table, StoreTables::Name)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_store_items_partition")
          .table(StoreItems::Table)
          .col(StoreItems::TableName)
          .col(StoreItems::PartitionKey)
          .col(StoreItems::SortKey)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(StoreItems::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum StoreItems {
  Table,
  Id,
  TableName,
  PartitionKey,
  SortKey,
  Attributes,
}
