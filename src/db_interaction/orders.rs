use std::{error::Error, fmt::Debug};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::{
    configuration::StationLookup,
    domain::OrderLine,
    models::{Changeset, NewOrder, NewOrderItem, Order, OrderChanges},
    storage::{Repository, Storage, StorageError},
    telemetry::spawn_blocking_with_tracing,
    utils::error_fmt_chain,
};

use super::RecordError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatedOrder{
    pub order_id: i32,
    pub printers: Vec<String>
}

// Error associated with creating an order together with its items
#[derive(Error)]
pub enum CreateOrderError{
    #[error("Products are missing or deleted: {0:?}")]
    UnknownProducts(Vec<i32>),
    #[error("Failed to create order")]
    Transaction(#[source] StorageError),
    #[error("Storage is unavailable")]
    Unavailable(#[source] StorageError),
    #[error("Order {order_id} was created but its printers could not be looked up")]
    PostCommitLookup{
        order_id: i32,
        #[source]
        source: StorageError
    },
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError)
}

impl From<StorageError> for CreateOrderError {
    fn from(e: StorageError) -> Self {
        if e.is_unavailable() {
            CreateOrderError::Unavailable(e)
        } else {
            CreateOrderError::Transaction(e)
        }
    }
}

impl Debug for CreateOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Creating order with items",
    skip(storage, items),
    fields(item_count = items.len())
)]
pub async fn create_order_with_items<S: Storage>(
    storage: &S,
    lookup: StationLookup,
    header: NewOrder,
    items: Vec<OrderLine>
) -> Result<CreatedOrder, CreateOrderError> {
    let storage = storage.clone();

    let created = spawn_blocking_with_tracing(move || {
        persist_order(&storage, lookup, header, &items)
    })
    .await??;

    Ok(created)
}

/// Inserts the order and its items as one transaction, then reports the
/// distinct stations of the ordered products.
///
/// With [`StationLookup::AfterCommit`] the lookup runs on a new connection
/// once the order is durable; if only that lookup fails the order exists and
/// the error is [`CreateOrderError::PostCommitLookup`].
pub fn persist_order<S: Storage>(
    storage: &S,
    lookup: StationLookup,
    header: NewOrder,
    items: &[OrderLine]
) -> Result<CreatedOrder, CreateOrderError> {
    let product_ids = distinct_product_ids(items);

    let (order_id, printers) = storage.transaction::<_, CreateOrderError, _>(|conn| {
        let active = conn.active_product_ids(&product_ids)?;
        let missing: Vec<i32> = product_ids
            .iter()
            .copied()
            .filter(|id| !active.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(CreateOrderError::UnknownProducts(missing));
        }

        let order = conn.insert_order(&header)?;

        for line in items {
            conn.insert_order_item(&NewOrderItem{
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity
            })?;
        }

        let printers = match lookup {
            StationLookup::InTransaction => Some(conn.distinct_stations(&product_ids)?),
            StationLookup::AfterCommit => None
        };

        Ok((order.id, printers))
    })?;

    let printers = match printers {
        Some(printers) => printers,
        None => storage
            .run::<_, StorageError, _>(|conn| conn.distinct_stations(&product_ids))
            .map_err(|source| CreateOrderError::PostCommitLookup{ order_id, source })?
    };

    tracing::info!(order_id, ?printers, "Created order");

    Ok(CreatedOrder{ order_id, printers })
}

fn distinct_product_ids(items: &[OrderLine]) -> Vec<i32> {
    let mut ids: Vec<i32> = items.iter().map(|line| line.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// Retry path for printers when the post-commit lookup failed
#[tracing::instrument(
    "Getting printers of order",
    skip(storage)
)]
pub async fn get_order_printers<S: Storage>(storage: &S, order_id: i32) -> Result<Vec<String>, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            if conn.find_order(order_id)?.is_none() {
                return Err(RecordError::NotFound{ entity: "order", id: order_id });
            }

            Ok(conn.order_stations(order_id)?)
        })
    })
    .await?
}

#[tracing::instrument(
    "Getting orders from db",
    skip_all
)]
pub async fn list_orders<S: Storage>(storage: &S) -> Result<Vec<Order>, RecordError> {
    let storage = storage.clone();
    let orders = spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| Ok(conn.list_orders()?))
    })
    .await??;

    Ok(orders)
}

#[tracing::instrument(
    "Getting order by id",
    skip(storage)
)]
pub async fn get_order<S: Storage>(storage: &S, id: i32) -> Result<Order, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.find_order(id)?
                .ok_or(RecordError::NotFound{ entity: "order", id })
        })
    })
    .await?
}

#[tracing::instrument(
    "Updating order",
    skip(storage)
)]
pub async fn update_order<S: Storage>(
    storage: &S,
    id: i32,
    changes: OrderChanges
) -> Result<Order, RecordError> {
    if changes.is_empty() {
        return Err(RecordError::EmptyChangeset);
    }
    changes.validate()?;

    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.update_order(id, &changes)?
                .ok_or(RecordError::NotFound{ entity: "order", id })
        })
    })
    .await?
}

// Function to soft delete order, its items are left untouched
#[tracing::instrument(
    "Soft deleting order",
    skip(storage)
)]
pub async fn delete_order<S: Storage>(storage: &S, id: i32) -> Result<Order, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.soft_delete_order(id)?
                .ok_or(RecordError::NotFound{ entity: "order", id })
        })
    })
    .await?
}
