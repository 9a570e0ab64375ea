use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{update_product, RecordError},
    models::ProductChanges,
    response::send_response,
    routes::IdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Updating product",
    skip(storage)
)]
pub async fn put_product<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<IdQuery>,
    json: web::Json<ProductChanges>
) -> Result<HttpResponse, RecordError> {
    let product = update_product(storage.get_ref(), query.id, json.into_inner()).await?;

    Ok(send_response(StatusCode::OK, "Successfully Update Product", product))
}
