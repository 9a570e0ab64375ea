mod bill;
mod order_items;
mod orders;
mod products;

use std::{error::Error, fmt::Debug};

use thiserror::Error;

use crate::{storage::StorageError, utils::error_fmt_chain};

pub use bill::*;
pub use order_items::*;
pub use orders::*;
pub use products::*;

// Error shared by the single-row create / read / update / delete paths
#[derive(Error)]
pub enum RecordError{
    #[error("Invalid request body")]
    Validation(#[from] validator::ValidationErrors),
    #[error("No updatable fields were provided")]
    EmptyChangeset,
    #[error("{entity} with id {id} not found")]
    NotFound{ entity: &'static str, id: i32 },
    #[error("Rejected by the database: {0}")]
    ConstraintViolation(String),
    #[error("Storage is unavailable")]
    Unavailable(#[source] StorageError),
    #[error("Failed to run query")]
    Storage(#[source] StorageError),
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError)
}

impl From<StorageError> for RecordError {
    fn from(e: StorageError) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match e {
            e if e.is_unavailable() => RecordError::Unavailable(e),
            StorageError::Constraint(message) => RecordError::ConstraintViolation(message),
            StorageError::Query(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation | DatabaseErrorKind::CheckViolation,
                info
            )) => RecordError::ConstraintViolation(info.message().to_string()),
            e => RecordError::Storage(e)
        }
    }
}

impl Debug for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}
