use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{delete_order_item, RecordError},
    response::send_response,
    routes::IdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Deleting order item by id",
    skip(storage)
)]
pub async fn delete_order_item_by_id<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<IdQuery>
) -> Result<HttpResponse, RecordError> {
    let item = delete_order_item(storage.get_ref(), query.id).await?;

    Ok(send_response(StatusCode::OK, "Successfully Delete Order Item", item))
}
