use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;

use crate::{
    domain::BillLine,
    models::{
        NewOrder, NewOrderItem, NewProduct, Order, OrderChanges, OrderItem, OrderItemChanges,
        Product, ProductChanges,
    },
};

use super::{Repository, Storage, StorageError};

// Failures tests can switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault{
    Unavailable,
    // nth (1-based) order item insert of a call
    OrderItemInsert(usize),
    StationLookup
}

#[derive(Default, Clone)]
struct Tables{
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    product_seq: i32,
    order_seq: i32,
    order_item_seq: i32
}

#[derive(Default)]
struct Shared{
    tables: Tables,
    faults: Vec<Fault>
}

// Calls work on a copy of the tables; transactions keep it only on Ok
#[derive(Clone, Default)]
pub struct MemoryStorage{
    shared: Arc<Mutex<Shared>>
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn inject(&self, fault: Fault) {
        self.guard().faults.push(fault);
    }

    pub fn clear_faults(&self) {
        self.guard().faults.clear();
    }

    // Live tables are only replaced after a closure returns
    fn guard(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shared>, StorageError> {
        let shared = self.guard();

        if shared.faults.contains(&Fault::Unavailable) {
            return Err(StorageError::Unavailable("connection refused".to_string()));
        }

        Ok(shared)
    }
}

impl Storage for MemoryStorage {
    type Conn = MemoryConnection;

    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>
    {
        let mut shared = self.lock()?;
        let mut conn = MemoryConnection::new(shared.tables.clone(), shared.faults.clone());

        let result = f(&mut conn);
        shared.tables = conn.tables;

        result
    }

    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Conn) -> Result<T, E>,
        E: From<StorageError>
    {
        let mut shared = self.lock()?;
        let mut conn = MemoryConnection::new(shared.tables.clone(), shared.faults.clone());

        let value = f(&mut conn)?;
        shared.tables = conn.tables;

        Ok(value)
    }
}

pub struct MemoryConnection{
    tables: Tables,
    faults: Vec<Fault>,
    item_inserts: usize
}

impl MemoryConnection {
    fn new(tables: Tables, faults: Vec<Fault>) -> Self {
        MemoryConnection{ tables, faults, item_inserts: 0 }
    }

    fn has_fault(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    fn require_product(&self, id: i32) -> Result<(), StorageError> {
        if self.tables.products.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::Constraint(format!("product {} does not exist", id)))
        }
    }
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn live<T: Clone>(row: Option<&T>, deleted: impl Fn(&T) -> bool) -> Option<T> {
    row.filter(|r| !deleted(r)).cloned()
}

fn push_unique(stations: &mut Vec<String>, station: &str) {
    if !stations.iter().any(|s| s == station) {
        stations.push(station.to_string());
    }
}

impl Repository for MemoryConnection {
    fn insert_product(&mut self, new_product: &NewProduct) -> Result<Product, StorageError> {
        let product = Product{
            id: next_id(&mut self.tables.product_seq),
            name: new_product.name.clone(),
            category: new_product.category.clone(),
            variant: new_product.variant.clone(),
            price: new_product.price.clone(),
            station: new_product.station.clone(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None
        };

        self.tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn list_products(&mut self) -> Result<Vec<Product>, StorageError> {
        Ok(self.tables.products
            .values()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn find_product(&mut self, id: i32) -> Result<Option<Product>, StorageError> {
        Ok(live(self.tables.products.get(&id), |p| p.deleted_at.is_some()))
    }

    fn update_product(&mut self, id: i32, changes: &ProductChanges) -> Result<Option<Product>, StorageError> {
        let Some(product) = self.tables.products.get_mut(&id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(None)
        };

        if let Some(name) = &changes.name { product.name = name.clone(); }
        if let Some(category) = &changes.category { product.category = category.clone(); }
        if let Some(variant) = &changes.variant { product.variant = Some(variant.clone()); }
        if let Some(price) = &changes.price { product.price = price.clone(); }
        if let Some(station) = &changes.station { product.station = station.clone(); }
        product.updated_at = Some(Utc::now());

        Ok(Some(product.clone()))
    }

    fn soft_delete_product(&mut self, id: i32) -> Result<Option<Product>, StorageError> {
        let Some(product) = self.tables.products.get_mut(&id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(None)
        };

        product.deleted_at = Some(Utc::now());
        Ok(Some(product.clone()))
    }

    fn active_product_ids(&mut self, ids: &[i32]) -> Result<Vec<i32>, StorageError> {
        Ok(ids.iter()
            .copied()
            .filter(|id| {
                self.tables.products
                    .get(id)
                    .is_some_and(|p| p.deleted_at.is_none())
            })
            .collect())
    }

    fn insert_order(&mut self, new_order: &NewOrder) -> Result<Order, StorageError> {
        let order = Order{
            id: next_id(&mut self.tables.order_seq),
            table_number: new_order.table_number,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None
        };

        self.tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn list_orders(&mut self) -> Result<Vec<Order>, StorageError> {
        Ok(self.tables.orders
            .values()
            .filter(|o| o.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn find_order(&mut self, id: i32) -> Result<Option<Order>, StorageError> {
        Ok(live(self.tables.orders.get(&id), |o| o.deleted_at.is_some()))
    }

    fn update_order(&mut self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, StorageError> {
        let Some(order) = self.tables.orders.get_mut(&id).filter(|o| o.deleted_at.is_none()) else {
            return Ok(None)
        };

        if let Some(table_number) = changes.table_number { order.table_number = table_number; }
        order.updated_at = Some(Utc::now());

        Ok(Some(order.clone()))
    }

    fn soft_delete_order(&mut self, id: i32) -> Result<Option<Order>, StorageError> {
        let Some(order) = self.tables.orders.get_mut(&id).filter(|o| o.deleted_at.is_none()) else {
            return Ok(None)
        };

        order.deleted_at = Some(Utc::now());
        Ok(Some(order.clone()))
    }

    fn insert_order_item(&mut self, new_item: &NewOrderItem) -> Result<OrderItem, StorageError> {
        self.item_inserts += 1;
        if self.has_fault(Fault::OrderItemInsert(self.item_inserts)) {
            return Err(StorageError::Constraint(format!("injected failure on order item insert {}", self.item_inserts)));
        }

        if !self.tables.orders.contains_key(&new_item.order_id) {
            return Err(StorageError::Constraint(format!("order {} does not exist", new_item.order_id)));
        }
        self.require_product(new_item.product_id)?;
        if new_item.quantity <= 0 {
            return Err(StorageError::Constraint("quantity must be positive".to_string()));
        }

        let item = OrderItem{
            id: next_id(&mut self.tables.order_item_seq),
            order_id: new_item.order_id,
            product_id: new_item.product_id,
            quantity: new_item.quantity,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None
        };

        self.tables.order_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn list_order_items(&mut self) -> Result<Vec<OrderItem>, StorageError> {
        Ok(self.tables.order_items
            .values()
            .filter(|i| i.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn find_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError> {
        Ok(live(self.tables.order_items.get(&id), |i| i.deleted_at.is_some()))
    }

    fn update_order_item(&mut self, id: i32, changes: &OrderItemChanges) -> Result<Option<OrderItem>, StorageError> {
        if let Some(product_id) = changes.product_id {
            self.require_product(product_id)?;
        }

        let Some(item) = self.tables.order_items.get_mut(&id).filter(|i| i.deleted_at.is_none()) else {
            return Ok(None)
        };

        if let Some(product_id) = changes.product_id { item.product_id = product_id; }
        if let Some(quantity) = changes.quantity { item.quantity = quantity; }
        item.updated_at = Some(Utc::now());

        Ok(Some(item.clone()))
    }

    fn soft_delete_order_item(&mut self, id: i32) -> Result<Option<OrderItem>, StorageError> {
        let Some(item) = self.tables.order_items.get_mut(&id).filter(|i| i.deleted_at.is_none()) else {
            return Ok(None)
        };

        item.deleted_at = Some(Utc::now());
        Ok(Some(item.clone()))
    }

    fn distinct_stations(&mut self, product_ids: &[i32]) -> Result<Vec<String>, StorageError> {
        if self.has_fault(Fault::StationLookup) {
            return Err(StorageError::Unavailable("station lookup timed out".to_string()));
        }

        let mut stations = Vec::new();
        for product in self.tables.products.values().filter(|p| product_ids.contains(&p.id)) {
            push_unique(&mut stations, &product.station);
        }

        Ok(stations)
    }

    fn order_stations(&mut self, order_id: i32) -> Result<Vec<String>, StorageError> {
        if self.has_fault(Fault::StationLookup) {
            return Err(StorageError::Unavailable("station lookup timed out".to_string()));
        }

        let mut stations = Vec::new();
        for item in self.tables.order_items.values() {
            if item.order_id != order_id || item.deleted_at.is_some() {
                continue;
            }
            if let Some(product) = self.tables.products.get(&item.product_id) {
                push_unique(&mut stations, &product.station);
            }
        }

        Ok(stations)
    }

    fn bill_lines(&mut self, order_id: i32) -> Result<Vec<BillLine>, StorageError> {
        Ok(self.tables.order_items
            .values()
            .filter(|item| item.order_id == order_id && item.deleted_at.is_none())
            .filter_map(|item| {
                self.tables.products.get(&item.product_id).map(|product| BillLine{
                    name: product.name.clone(),
                    variant: product.variant.clone(),
                    quantity: item.quantity,
                    price: product.price.clone()
                })
            })
            .collect())
    }
}
