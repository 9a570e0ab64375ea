use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{update_order, RecordError},
    models::OrderChanges,
    response::send_response,
    routes::IdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Updating order",
    skip(storage)
)]
pub async fn put_order<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<IdQuery>,
    json: web::Json<OrderChanges>
) -> Result<HttpResponse, RecordError> {
    let order = update_order(storage.get_ref(), query.id, json.into_inner()).await?;

    Ok(send_response(StatusCode::OK, "Successfully Update Order", order))
}
