use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use validator::Validate;

use crate::{
    configuration::OrderSettings,
    db_interaction::{create_order_with_items, CreateOrderError},
    domain::CreateOrderRequest,
    response::{send_message, send_response},
    storage::Storage,
    utils::error_fmt_chain,
};

#[derive(Error)]
pub enum PostOrderError{
    #[error("Invalid order")]
    InvalidOrder(#[from] validator::ValidationErrors),
    #[error(transparent)]
    CreateOrderError(#[from] CreateOrderError)
}

impl Debug for PostOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostOrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostOrderError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
            PostOrderError::CreateOrderError(e) => e.status_code()
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            PostOrderError::InvalidOrder(errors) => {
                send_message(StatusCode::BAD_REQUEST, format!("{}: {}", self, errors))
            },
            PostOrderError::CreateOrderError(e) => e.error_response()
        }
    }
}

#[tracing::instrument(
    "Posting order",
    skip(storage, settings)
)]
pub async fn post_order<S: Storage>(
    storage: web::Data<S>,
    settings: web::Data<OrderSettings>,
    json: web::Json<CreateOrderRequest>
) -> Result<HttpResponse, PostOrderError> {
    json.validate()?;
    let (header, items) = json.into_inner().into_parts();

    match create_order_with_items(storage.get_ref(), settings.station_lookup, header, items).await {
        Ok(created) => Ok(send_response(StatusCode::CREATED, "Success Add Order with Items", created)),
        Err(CreateOrderError::PostCommitLookup{ order_id, source }) => {
            tracing::warn!(order_id, error = ?source, "Order saved but printer lookup failed");
            Ok(send_response(
                StatusCode::ACCEPTED,
                "Order saved, printers could not be resolved",
                json!({ "order_id": order_id, "printers": null })
            ))
        },
        Err(e) => Err(e.into())
    }
}
