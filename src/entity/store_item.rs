use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::store_table;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store_items")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub table_name: String,
  pub partition_key: String,
  pub sort_key: i64,
  /// Full item, attribute names verbatim
  pub attributes: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "store_table::Entity",
    from = "Column::TableName",
    to = "store_table::Column::Name"
  )]
  Table,
}

impl Related<store_table::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Table.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
