use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};

use super::Error;
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::FetchPostsFailed => StatusCode::INTERNAL_SERVER_ERROR,
      ErrorType::InvalidParameter(..) => StatusCode::BAD_REQUEST,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(report = ?self.report, trace = %self.trace, "{}", self.error_type);
    } else {
      tracing::debug!(report = ?self.report, "{}", self.error_type);
    }
    HttpResponse::build(status).json(self.error_type)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{database, types::error::Parameter};
  use actix_web::{body::MessageBody, ResponseError};
  use error_stack::Report;

  #[test]
  fn test_status_codes() {
    let cases = [
      (ErrorType::FetchPostsFailed, StatusCode::INTERNAL_SERVER_ERROR),
      (
        ErrorType::InvalidParameter(Parameter::Limit),
        StatusCode::BAD_REQUEST,
      ),
    ];

    for (error_type, expected) in cases {
      let error = Error::from_context(error_type, database::Error::UnhealthyPool);
      assert_eq!(expected, error.status_code());
    }
  }

  #[test]
  fn test_body_hides_report() {
    let error = Error::from_report(
      ErrorType::FetchPostsFailed,
      Report::new(database::Error::UnhealthyPool).attach_printable("secret details"),
    );

    assert!(error.report().contains::<database::Error>());
    let body = error.error_response().into_body().try_into_bytes().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(serde_json::json!({ "error": "Failed to fetch posts" }), value);
  }
}
