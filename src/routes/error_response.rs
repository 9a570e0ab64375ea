use actix_web::{
    error::InternalError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};

use crate::{
    db_interaction::{BillError, CreateOrderError, RecordError},
    response::send_message,
};

fn log_if_server_error(status: StatusCode, error: &impl std::fmt::Debug) {
    if status.is_server_error() {
        tracing::error!(error = ?error, "Request failed");
    }
}

impl ResponseError for RecordError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecordError::Validation(_)
            | RecordError::EmptyChangeset
            | RecordError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            RecordError::NotFound{ .. } => StatusCode::NOT_FOUND,
            RecordError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecordError::Storage(_) | RecordError::ThreadpoolError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let status = self.status_code();
        log_if_server_error(status, self);

        match self {
            RecordError::Validation(errors) => send_message(status, format!("{}: {}", self, errors)),
            _ => send_message(status, self.to_string())
        }
    }
}

impl ResponseError for BillError {
    fn status_code(&self) -> StatusCode {
        match self {
            BillError::NotFound(_) => StatusCode::NOT_FOUND,
            BillError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BillError::Storage(_) | BillError::ThreadpoolError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let status = self.status_code();
        log_if_server_error(status, self);
        send_message(status, self.to_string())
    }
}

impl ResponseError for CreateOrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            CreateOrderError::UnknownProducts(_) => StatusCode::BAD_REQUEST,
            CreateOrderError::PostCommitLookup{ .. } => StatusCode::ACCEPTED,
            CreateOrderError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CreateOrderError::Transaction(_) | CreateOrderError::ThreadpoolError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let status = self.status_code();
        log_if_server_error(status, self);
        send_message(status, self.to_string())
    }
}

// Malformed json, query strings and paths get the same envelope as every other error
pub fn bad_request_handler<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static
{
    let response = send_message(StatusCode::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, response).into()
}
