pub mod store_item;
pub mod store_table;
