use actix_web::{http::StatusCode, HttpResponse};

use crate::response::send_message;

#[tracing::instrument(
    "Checking if api is online"
)]
pub async fn health_check() -> HttpResponse{
    send_message(StatusCode::OK, "Working")
}
