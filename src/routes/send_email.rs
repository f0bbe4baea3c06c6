use actix_web::http::Method;
use actix_web::{
    web,
    HttpRequest,
    HttpResponse,
};

use crate::dispatcher::NotificationDispatcher;
use crate::domain::SendRequest;
use crate::routes::RouteError;

/// Largest body read from a send request, matching the serverless platform
/// the storefront was deployed on.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// `OPTIONS` answers the CORS preflight, `POST` sends, anything else is 405.
///
/// Rules are checked in order and the first one that fails decides the
/// response: method, body size, JSON body, required fields, address format,
/// delivery. The body is only read once the method is known to be `POST`.
#[tracing::instrument(
    name = "handling send-email request",
    skip(request, payload, dispatcher),
    fields(method = %request.method())
)]
pub async fn send_email(
    request: HttpRequest,
    payload: web::Payload,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<HttpResponse, RouteError> {
    let method = request.method();
    if *method == Method::OPTIONS {
        return Ok(HttpResponse::Ok().finish());
    }
    if *method != Method::POST {
        return Err(RouteError::MethodNotAllowed);
    }

    let body = payload
        .to_bytes_limited(MAX_BODY_BYTES)
        .await
        .map_err(|_| RouteError::PayloadTooLarge)?
        .map_err(|e| {
            tracing::warn!("error reading request body: {}", e);
            RouteError::UnreadableBody
        })?;
    let send_request = SendRequest::parse(&body).map_err(|e| {
        tracing::warn!("rejected send request: {}", e);
        e
    })?;
    let result = dispatcher.dispatch(&send_request).await?;

    Ok(HttpResponse::Ok().json(result))
}
