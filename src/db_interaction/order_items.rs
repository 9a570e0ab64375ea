use validator::Validate;

use crate::{
    models::{Changeset, NewOrderItem, OrderItem, OrderItemChanges},
    storage::{Repository, Storage},
    telemetry::spawn_blocking_with_tracing,
};

use super::RecordError;

// Function to add a single item to an existing order
#[tracing::instrument(
    "Inserting order item into db",
    skip(storage)
)]
pub async fn create_order_item<S: Storage>(
    storage: &S,
    new_item: NewOrderItem
) -> Result<OrderItem, RecordError> {
    new_item.validate()?;

    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.transaction::<_, RecordError, _>(|conn| {
            if conn.find_order(new_item.order_id)?.is_none() {
                return Err(RecordError::NotFound{ entity: "order", id: new_item.order_id });
            }
            if conn.find_product(new_item.product_id)?.is_none() {
                return Err(RecordError::NotFound{ entity: "product", id: new_item.product_id });
            }

            Ok(conn.insert_order_item(&new_item)?)
        })
    })
    .await?
}

#[tracing::instrument(
    "Getting order items from db",
    skip_all
)]
pub async fn list_order_items<S: Storage>(storage: &S) -> Result<Vec<OrderItem>, RecordError> {
    let storage = storage.clone();
    let items = spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| Ok(conn.list_order_items()?))
    })
    .await??;

    Ok(items)
}

#[tracing::instrument(
    "Getting order item by id",
    skip(storage)
)]
pub async fn get_order_item<S: Storage>(storage: &S, id: i32) -> Result<OrderItem, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.find_order_item(id)?
                .ok_or(RecordError::NotFound{ entity: "order item", id })
        })
    })
    .await?
}

#[tracing::instrument(
    "Updating order item",
    skip(storage)
)]
pub async fn update_order_item<S: Storage>(
    storage: &S,
    id: i32,
    changes: OrderItemChanges
) -> Result<OrderItem, RecordError> {
    if changes.is_empty() {
        return Err(RecordError::EmptyChangeset);
    }
    changes.validate()?;

    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.transaction::<_, RecordError, _>(|conn| {
            if let Some(product_id) = changes.product_id {
                if conn.find_product(product_id)?.is_none() {
                    return Err(RecordError::NotFound{ entity: "product", id: product_id });
                }
            }

            conn.update_order_item(id, &changes)?
                .ok_or(RecordError::NotFound{ entity: "order item", id })
        })
    })
    .await?
}

#[tracing::instrument(
    "Soft deleting order item",
    skip(storage)
)]
pub async fn delete_order_item<S: Storage>(storage: &S, id: i32) -> Result<OrderItem, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.soft_delete_order_item(id)?
                .ok_or(RecordError::NotFound{ entity: "order item", id })
        })
    })
    .await?
}
