use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{create_product, RecordError},
    models::NewProduct,
    response::send_response,
    storage::Storage,
};

#[tracing::instrument(
    "Posting product",
    skip(storage)
)]
pub async fn post_product<S: Storage>(
    storage: web::Data<S>,
    json: web::Json<NewProduct>
) -> Result<HttpResponse, RecordError> {
    let product = create_product(storage.get_ref(), json.into_inner()).await?;

    Ok(send_response(StatusCode::CREATED, "Successfully Add Product", product))
}
