#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;

pub use error::*;
pub mod extras;

/// Checks whether a value is acceptable before it is used
/// anywhere else (a submitted form, a loaded configuration).
pub trait Validate {
  fn validate(&self) -> Result<(), ValidateError>;
}

impl<T: Validate> Validate for Option<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    match self {
      Some(value) => value.validate(),
      None => Ok(()),
    }
  }
}
