use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{create_order_item, RecordError},
    models::NewOrderItem,
    response::send_response,
    storage::Storage,
};

#[tracing::instrument(
    "Posting order item",
    skip(storage)
)]
pub async fn post_order_item<S: Storage>(
    storage: web::Data<S>,
    json: web::Json<NewOrderItem>
) -> Result<HttpResponse, RecordError> {
    let item = create_order_item(storage.get_ref(), json.into_inner()).await?;

    Ok(send_response(StatusCode::CREATED, "Successfully Add Order Item", item))
}
