use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};

/// Body of every json response: `{ status, message, data }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T>{
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse{
            status: status.as_u16(),
            message: message.into(),
            data
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

pub fn send_response<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> HttpResponse {
    ApiResponse::new(status, message, Some(data)).into_response()
}

pub fn send_message(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    ApiResponse::<()>::new(status, message, None).into_response()
}
