use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use diesel::{
    r2d2::ConnectionManager, Connection, ExpressionMethods, OptionalExtension, PgConnection,
    QueryDsl, RunQueryDsl, SelectableHelper,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use r2d2::Pool;

use crate::{
    configuration::DatabaseSettings,
    domain::BillLine,
    models::{
        NewOrder, NewOrderItem, NewProduct, Order, OrderChanges, OrderItem, OrderItemChanges,
        Product, ProductChanges,
    },
    schema::{order_items, orders, products},
    utils::DbPool,
};

use super::{Repository, Storage, StorageError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[derive(Clone)]
pub struct PgStorage{
    pool: DbPool
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        PgStorage{ pool }
    }

    #[tracing::instrument(
        "Building postgres connection pool",
        skip_all
    )]
    pub fn connect(settings: &DatabaseSettings) -> Result<Self, anyhow::Error> {
        let manager = ConnectionManager::<PgConnection>::new(settings.get_database_url());
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .connection_timeout(Duration::from_secs(settings.connection_timeout_secs))
            .build(manager)
            .context("Failed to build connection pool")?;

        Ok(PgStorage::new(pool))
    }

    #[tracing::instrument(
        "Running pending migrations",
        skip_all
    )]
    pub fn run_migrations(&self) -> Result<(), anyhow::Error> {
        let mut conn = self.pool.get().context("Failed to get connection from pool")?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

        Ok(())
    }
}

// Keeps the closure's own error apart from the ones raised by BEGIN / COMMIT
enum TransactionError<E>{
    Inner(E),
    Database(diesel::result::Error)
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(e: diesel::result::Error) -> Self {
        TransactionError::Database(e)
    }
}

impl Storage for PgStorage {
    type Conn = PgConnection;

    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>
    {
        let mut pooled = self.pool.get().map_err(StorageError::from)?;
        f(&mut pooled)
    }

    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>
    {
        let mut pooled = self.pool.get().map_err(StorageError::from)?;
        let conn: &mut PgConnection = &mut pooled;

        conn.transaction::<T, TransactionError<E>, _>(|conn| {
            f(conn).map_err(TransactionError::Inner)
        })
        .map_err(|e| match e {
            TransactionError::Inner(e) => e,
            TransactionError::Database(e) => E::from(StorageError::from(e))
        })
    }
}

impl Repository for PgConnection {
    fn insert_product(&mut self, new_product: &NewProduct) -> Result<Product, StorageError> {
        Ok(diesel::insert_into(products::table)
            .values(new_product)
            .returning(Product::as_returning())
            .get_result(self)?)
    }

    fn list_products(&mut self) -> Result<Vec<Product>, StorageError> {
        Ok(products::table
            .filter(products::deleted_at.is_null())
            .order(products::id.asc())
            .select(Product::as_select())
            .load(self)?)
    }

    fn find_product(&mut self, id: i32) -> Result<Option<Product>, StorageError> {
        Ok(products::table
            .find(id)
            .filter(products::deleted_at.is_null())
            .select(Product::as_select())
            .first(self)
            .optional()?)
    }

    fn update_product(&mut self, id: i32, changes: &ProductChanges) -> Result<Option<Product>, StorageError> {
        Ok(diesel::update(products::table.find(id).filter(products::deleted_at.is_null()))
            .set((changes, products::updated_at.eq(Some(Utc::now()))))
            .returning(Product::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn soft_delete_product(&mut self, id: i32) -> Result<Option<Product>, StorageError> {
        Ok(diesel::update(products::table.find(id).filter(products::deleted_at.is_null()))
            .set(products::deleted_at.eq(Some(Utc::now())))
            .returning(Product::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn active_product_ids(&mut self, ids: &[i32]) -> Result<Vec<i32>, StorageError> {
        Ok(products::table
            .filter(products::id.eq_any(ids))
            .filter(products::deleted_at.is_null())
            .select(products::id)
            .load(self)?)
    }

    fn insert_order(&mut self, new_order: &NewOrder) -> Result<Order, StorageError> {
        Ok(diesel::insert_into(orders::table)
            .values(new_order)
            .returning(Order::as_returning())
            .get_result(self)?)
    }

    fn list_orders(&mut self) -> Result<Vec<Order>, StorageError> {
        Ok(orders::table
            .filter(orders::deleted_at.is_null())
            .order(orders::id.asc())
            .select(Order::as_select())
            .load(self)?)
    }

    fn find_order(&mut self, id: i32) -> Result<Option<Order>, StorageError> {
        Ok(orders::table
            .find(id)
            .filter(orders::deleted_at.is_null())
            .select(Order::as_select())
            .first(self)
            .optional()?)
    }

    fn update_order(&mut self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, StorageError> {
        Ok(diesel::update(orders::table.find(id).filter(orders::deleted_at.is_null()))
            .set((changes, orders::updated_at.eq(Some(Utc::now()))))
            .returning(Order::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn soft_delete_order(&mut self, id: i32) -> Result<Option<Order>, StorageError> {
        Ok(diesel::update(orders::table.find(id).filter(orders::deleted_at.is_null()))
            .set(orders::deleted_at.eq(Some(Utc::now())))
            .returning(Order::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn insert_order_item(&mut self, new_item: &NewOrderItem) -> Result<OrderItem, StorageError> {
        Ok(diesel::insert_into(order_items::table)
            .values(new_item)
            .returning(OrderItem::as_returning())
            .get_result(self)?)
    }

    fn list_order_items(&mut self) -> Result<Vec<OrderItem>, StorageError> {
        Ok(order_items::table
            .filter(order_items::deleted_at.is_null())
            .order(order_items::id.asc())
            .select(OrderItem::as_select())
            .load(self)?)
    }

    fn find_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError> {
        Ok(order_items::table
            .find(id)
            .filter(order_items::deleted_at.is_null())
            .select(OrderItem::as_select())
            .first(self)
            .optional()?)
    }

    fn update_order_item(&mut self, id: i32, changes: &OrderItemChanges) -> Result<Option<OrderItem>, StorageError> {
        Ok(diesel::update(order_items::table.find(id).filter(order_items::deleted_at.is_null()))
            .set((changes, order_items::updated_at.eq(Some(Utc::now()))))
            .returning(OrderItem::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn soft_delete_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError> {
        Ok(diesel::update(order_items::table.find(id).filter(order_items::deleted_at.is_null()))
            .set(order_items::deleted_at.eq(Some(Utc::now())))
            .returning(OrderItem::as_returning())
            .get_result(self)
            .optional()?)
    }

    fn distinct_stations(&mut self, product_ids: &[i32]) -> Result<Vec<String>, StorageError> {
        Ok(products::table
            .filter(products::id.eq_any(product_ids))
            .select(products::station)
            .distinct()
            .load(self)?)
    }

    fn order_stations(&mut self, order_id: i32) -> Result<Vec<String>, StorageError> {
        Ok(order_items::table
            .inner_join(products::table)
            .filter(order_items::order_id.eq(order_id))
            .filter(order_items::deleted_at.is_null())
            .select(products::station)
            .distinct()
            .load(self)?)
    }

    fn bill_lines(&mut self, order_id: i32) -> Result<Vec<BillLine>, StorageError> {
        Ok(order_items::table
            .inner_join(products::table)
            .filter(order_items::order_id.eq(order_id))
            .filter(order_items::deleted_at.is_null())
            .order(order_items::id.asc())
            .select((
                products::name,
                products::variant,
                order_items::quantity,
                products::price
            ))
            .load::<BillLine>(self)?)
    }
}
