use validator::Validate;

use crate::{
    models::{Changeset, NewProduct, Product, ProductChanges},
    storage::{Repository, Storage},
    telemetry::spawn_blocking_with_tracing,
};

use super::RecordError;

#[tracing::instrument(
    "Inserting product into db",
    skip(storage)
)]
pub async fn create_product<S: Storage>(
    storage: &S,
    new_product: NewProduct
) -> Result<Product, RecordError> {
    new_product.validate()?;

    let storage = storage.clone();
    let product = spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| Ok(conn.insert_product(&new_product)?))
    })
    .await??;

    Ok(product)
}

#[tracing::instrument(
    "Getting products from db",
    skip_all
)]
pub async fn list_products<S: Storage>(storage: &S) -> Result<Vec<Product>, RecordError> {
    let storage = storage.clone();
    let products = spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| Ok(conn.list_products()?))
    })
    .await??;

    Ok(products)
}

#[tracing::instrument(
    "Getting product by id",
    skip(storage)
)]
pub async fn get_product<S: Storage>(storage: &S, id: i32) -> Result<Product, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.find_product(id)?
                .ok_or(RecordError::NotFound{ entity: "product", id })
        })
    })
    .await?
}

#[tracing::instrument(
    "Updating product",
    skip(storage)
)]
pub async fn update_product<S: Storage>(
    storage: &S,
    id: i32,
    changes: ProductChanges
) -> Result<Product, RecordError> {
    if changes.is_empty() {
        return Err(RecordError::EmptyChangeset);
    }
    changes.validate()?;

    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.update_product(id, &changes)?
                .ok_or(RecordError::NotFound{ entity: "product", id })
        })
    })
    .await?
}

// Soft delete: the row stays so existing order items keep their product
#[tracing::instrument(
    "Soft deleting product",
    skip(storage)
)]
pub async fn delete_product<S: Storage>(storage: &S, id: i32) -> Result<Product, RecordError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || {
        storage.run::<_, RecordError, _>(|conn| {
            conn.soft_delete_product(id)?
                .ok_or(RecordError::NotFound{ entity: "product", id })
        })
    })
    .await?
}
