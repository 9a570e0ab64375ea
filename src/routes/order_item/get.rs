use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{get_order_item, list_order_items, RecordError},
    response::send_response,
    routes::OptionalIdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Getting order items",
    skip(storage)
)]
pub async fn get_order_items<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<OptionalIdQuery>
) -> Result<HttpResponse, RecordError> {
    match query.id {
        Some(id) => {
            let item = get_order_item(storage.get_ref(), id).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get Order Item", item))
        },
        None => {
            let items = list_order_items(storage.get_ref()).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get All Order Items", items))
        }
    }
}
