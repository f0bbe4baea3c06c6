use actix_web::http::StatusCode;
use actix_web::{
    HttpResponse,
    ResponseError,
};
use custom_error::custom_error;

use crate::domain::{
    MalformedInput,
    SendResult,
};
use crate::transport::TransportError;

custom_error! {
///! Error inside route handler
pub RouteError
    MethodNotAllowed = "Method not allowed",
    PayloadTooLarge = "Payload too large",
    UnreadableBody = "Invalid JSON body",
    InvalidBody{source:MalformedInput} = "{source}",
    DeliveryFailed{source:TransportError} = "{source}",
}

impl ResponseError for RouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            RouteError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RouteError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RouteError::UnreadableBody | RouteError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RouteError::DeliveryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(SendResult::failure(self.to_string()))
    }
}
