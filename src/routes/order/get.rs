use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    db_interaction::{get_bill, get_order, get_order_printers, list_orders, BillError, RecordError},
    response::send_response,
    routes::OptionalIdQuery,
    storage::Storage,
};

#[tracing::instrument(
    "Getting orders",
    skip(storage)
)]
pub async fn get_orders<S: Storage>(
    storage: web::Data<S>,
    query: web::Query<OptionalIdQuery>
) -> Result<HttpResponse, RecordError> {
    match query.id {
        Some(id) => {
            let order = get_order(storage.get_ref(), id).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get Order", order))
        },
        None => {
            let orders = list_orders(storage.get_ref()).await?;
            Ok(send_response(StatusCode::OK, "Successfully Get All Order", orders))
        }
    }
}

#[tracing::instrument(
    "Getting bill of order",
    skip(storage)
)]
pub async fn get_order_bill<S: Storage>(
    storage: web::Data<S>,
    path: web::Path<i32>
) -> Result<HttpResponse, BillError> {
    let bill = get_bill(storage.get_ref(), path.into_inner()).await?;

    Ok(send_response(StatusCode::OK, "Successfully Get Bill", bill))
}

#[tracing::instrument(
    "Getting printers of order",
    skip(storage)
)]
pub async fn get_printers<S: Storage>(
    storage: web::Data<S>,
    path: web::Path<i32>
) -> Result<HttpResponse, RecordError> {
    let printers = get_order_printers(storage.get_ref(), path.into_inner()).await?;

    Ok(send_response(StatusCode::OK, "Successfully Get Printers", printers))
}
