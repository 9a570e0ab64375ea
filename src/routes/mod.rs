mod error_response;
mod health_check;
mod order;
mod order_item;
mod product;

use actix_web::web;
use serde::Deserialize;

use crate::storage::Storage;

pub use error_response::bad_request_handler;
pub use health_check::*;
pub use order::*;
pub use order_item::*;
pub use product::*;

#[derive(Deserialize, Debug)]
pub struct IdQuery{
    pub id: i32
}

#[derive(Deserialize, Debug)]
pub struct OptionalIdQuery{
    pub id: Option<i32>
}

// Everything below /api/v1
pub fn api_v1<S: Storage>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(get_products::<S>))
            .route("", web::post().to(post_product::<S>))
            .route("", web::put().to(put_product::<S>))
            .route("", web::delete().to(delete_product_by_id::<S>))
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(get_orders::<S>))
            .route("", web::post().to(post_order::<S>))
            .route("", web::put().to(put_order::<S>))
            .route("", web::delete().to(delete_order_by_id::<S>))
            .route("/{id}/bill", web::get().to(get_order_bill::<S>))
            .route("/{id}/printers", web::get().to(get_printers::<S>))
    )
    .service(
        web::scope("/order-items")
            .route("", web::get().to(get_order_items::<S>))
            .route("", web::post().to(post_order_item::<S>))
            .route("", web::put().to(put_order_item::<S>))
            .route("", web::delete().to(delete_order_item_by_id::<S>))
    );
}
