use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{delete_product, RecordError},
    response::send_response,
    routes::IdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Deleting product by id",
    skip(storage)
)]
pub async fn delete_product_by_id<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<IdQuery>
) -> Result<HttpResponse, RecordError> {
    let product = delete_product(storage.get_ref(), query.id).await?;

    Ok(send_response(StatusCode::OK, "Successfully Delete Product", product))
}
