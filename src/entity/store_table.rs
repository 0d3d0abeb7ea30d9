use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store_tables")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub name: String,
  /// Attribute holding the partition key of each item
  pub partition_key: String,
  /// Attribute holding the integer sort key of each item
  pub sort_key: String,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::store_item::Entity")]
  Items,
}

impl Related<super::store_item::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Items.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
