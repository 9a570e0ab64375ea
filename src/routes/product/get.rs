use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{get_product, list_products, RecordError},
    response::send_response,
    routes::OptionalIdQuery,
    storage::Storage,
};

// GET /products lists active products, GET /products?id= fetches one
#[tracing::instrument(
    "Getting products",
    skip(storage)
)]
pub async fn get_products<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<OptionalIdQuery>
) -> Result<HttpResponse, RecordError> {
    match query.id {
        Some(id) => {
            let product = get_product(storage.get_ref(), id).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get Product", product))
        },
        None => {
            let products = list_products(storage.get_ref()).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get All Products", products))
        }
    }
}
