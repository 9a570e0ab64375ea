use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{update_order_item, RecordError},
    models::OrderItemChanges,
    response::send_response,
    routes::IdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Updating order item",
    skip(storage)
)]
pub async fn put_order_item<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<IdQuery>,
    json: web::Json<OrderItemChanges>
) -> Result<HttpResponse, RecordError> {
    let item = update_order_item(storage.get_ref(), query.id, json.into_inner()).await?;

    Ok(send_response(StatusCode::OK, "Successfully Update Order Item", item))
}
