use actix_web::{
  body::{BoxBody, EitherBody, MessageBody},
  dev::{ServiceRequest, ServiceResponse},
  http::header,
  middleware::ErrorHandlerResponse,
  HttpResponse,
};
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

use crate::types::error::ErrorBody;

/// Same as [`DefaultRootSpanBuilder`] but request spans are emitted
/// at debug level so that a busy listing endpoint does not flood
/// the logs.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
  fn on_request_start(request: &ServiceRequest) -> Span {
    tracing_actix_web::root_span!(level = tracing::Level::DEBUG, request)
  }

  fn on_request_end<B: MessageBody>(
    span: Span,
    outcome: &Result<ServiceResponse<B>, actix_web::Error>,
  ) {
    DefaultRootSpanBuilder::on_request_end(span, outcome);
  }
}

/// Rewrites error responses produced by actix-web itself (unknown
/// routes, unparsable bodies, ...) into the same `{ "error": ... }`
/// shape our own handlers use.
pub fn handle_actix_web_error<B: MessageBody + 'static>(
  res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
  let is_json = res
    .response()
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.starts_with("application/json"));

  if is_json {
    return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
  }

  let status = res.status();
  let message = res
    .response()
    .error()
    .map_or_else(
      || status.canonical_reason().unwrap_or("Unknown error").to_string(),
      ToString::to_string,
    );

  let (request, _) = res.into_parts();
  let response: HttpResponse<EitherBody<B, BoxBody>> = HttpResponse::build(status)
    .json(ErrorBody { error: message })
    .map_into_right_body();

  Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
    request, response,
  )))
}
