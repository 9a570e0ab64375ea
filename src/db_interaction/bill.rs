use std::{error::Error, fmt::Debug};

use thiserror::Error;

use crate::{
    domain::Bill,
    storage::{Repository, Storage, StorageError},
    telemetry::spawn_blocking_with_tracing,
    utils::error_fmt_chain,
};

#[derive(Error)]
pub enum BillError{
    #[error("Order with id {0} not found")]
    NotFound(i32),
    #[error("Storage is unavailable")]
    Unavailable(#[source] StorageError),
    #[error("Failed to read bill")]
    Storage(#[source] StorageError),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError)
}

impl From<StorageError> for BillError {
    fn from(e: StorageError) -> Self {
        if e.is_unavailable() {
            BillError::Unavailable(e)
        } else {
            BillError::Storage(e)
        }
    }
}

impl Debug for BillError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Getting bill of order",
    skip(storage)
)]
pub async fn get_bill<S: Storage>(storage: &S, order_id: i32) -> Result<Bill, BillError> {
    let storage = storage.clone();
    spawn_blocking_with_tracing(move || assemble_bill(&storage, order_id)).await?
}

/// Reads the order header and its priced lines in one transaction.
pub fn assemble_bill<S: Storage>(storage: &S, order_id: i32) -> Result<Bill, BillError> {
    storage.transaction::<_, BillError, _>(|conn| {
        let order = conn.find_order(order_id)?
            .ok_or(BillError::NotFound(order_id))?;
        let lines = conn.bill_lines(order_id)?;

        Ok(Bill::assemble(&order, lines))
    })
}
