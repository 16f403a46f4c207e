use thiserror::Error;
use validator::ValidateError;

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidateError> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
    self.map_err(|error| {
      let mut messages = Vec::new();
      error.for_each_message(|field, message| messages.push(format!("{field}: {message}")));
      messages
        .into_iter()
        .fold(error_stack::Report::new(Wrapper), |report, message| {
          report.attach_printable(message)
        })
    })
  }
}
