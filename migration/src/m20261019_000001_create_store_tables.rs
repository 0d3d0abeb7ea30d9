use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(StoreTables::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(StoreTables::Name).string().not_null().primary_key(),
          )
          .col(ColumnDef::new(StoreTables::PartitionKey).string().not_null())
          .col(ColumnDef::new(StoreTables::SortKey).string().not_null())
          .col(ColumnDef::new(StoreTables::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(StoreTables::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum StoreTables {
  Table,
  Name,
  PartitionKey,
  SortKey,
  CreatedAt,
}
