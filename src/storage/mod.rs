mod memory;
mod postgres;

use std::{error::Error, fmt::Debug};

use thiserror::Error;

pub use memory::{Fault, MemoryStorage, MemoryConnection};
pub use postgres::PgStorage;

use crate::{
    domain::BillLine,
    models::{
        NewOrder, NewOrderItem, NewProduct, Order, OrderChanges, OrderItem, OrderItemChanges,
        Product, ProductChanges,
    },
    utils::error_fmt_chain,
};

// `transaction` commits only when the closure returns Ok
pub trait Storage: Clone + Send + Sync + 'static {
    type Conn: Repository;

    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>;

    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>;
}

// Lookups return Ok(None) for missing or soft-deleted rows.
pub trait Repository {
    fn insert_product(&mut self, new_product: &NewProduct) -> Result<Product, StorageError>;
    fn list_products(&mut self) -> Result<Vec<Product>, StorageError>;
    fn find_product(&mut self, id: i32) -> Result<Option<Product>, StorageError>;
    fn update_product(&mut self, id: i32, changes: &ProductChanges) -> Result<Option<Product>, StorageError>;
    fn soft_delete_product(&mut self, id: i32) -> Result<Option<Product>, StorageError>;
    /// Ids among `ids` that belong to active products.
    fn active_product_ids(&mut self, ids: &[i32]) -> Result<Vec<i32>, StorageError>;

    fn insert_order(&mut self, new_order: &NewOrder) -> Result<Order, StorageError>;
    fn list_orders(&mut self) -> Result<Vec<Order>, StorageError>;
    fn find_order(&mut self, id: i32) -> Result<Option<Order>, StorageError>;
    fn update_order(&mut self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, StorageError>;
    fn soft_delete_order(&mut self, id: i32) -> Result<Option<Order>, StorageError>;

    fn insert_order_item(&mut self, new_item: &NewOrderItem) -> Result<OrderItem, StorageError>;
    fn list_order_items(&mut self) -> Result<Vec<OrderItem>, StorageError>;
    fn find_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError>;
    fn update_order_item(&mut self, id: i32, changes: &OrderItemChanges) -> Result<Option<OrderItem>, StorageError>;
    fn soft_delete_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError>;

    /// `SELECT DISTINCT station FROM products WHERE id IN (product_ids)`
    fn distinct_stations(&mut self, product_ids: &[i32]) -> Result<Vec<String>, StorageError>;
    fn order_stations(&mut self, order_id: i32) -> Result<Vec<String>, StorageError>;
    /// Live items of an order joined with their products, in item id order.
    fn bill_lines(&mut self, order_id: i32) -> Result<Vec<BillLine>, StorageError>;
}

#[derive(Error)]
pub enum StorageError{
    #[error("Failed to get connection from pool")]
    Pool(#[from] r2d2::Error),
    #[error("Failed to run query")]
    Query(#[from] diesel::result::Error),
    #[error("Storage backend is unavailable: {0}")]
    Unavailable(String),
    #[error("Constraint violated: {0}")]
    Constraint(String)
}

impl StorageError {
    pub fn is_unavailable(&self) -> bool {
        match self {
            StorageError::Pool(_) | StorageError::Unavailable(_) => true,
            StorageError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ClosedConnection,
                _
            )) => true,
            _ => false
        }
    }
}

impl Debug for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}
