use serde::{ser::SerializeMap, Deserialize, Serialize};
use std::fmt::Display;

/// Query parameters of the posts listing that are checked
/// before anything is read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
  Page,
  Limit,
}

impl Display for Parameter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Parameter::Page => f.write_str("page"),
      Parameter::Limit => f.write_str("limit"),
    }
  }
}

/// Every kind of error a client may receive from the API.
///
/// Serialized as `{ "error": "<message>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  FetchPostsFailed,
  InvalidParameter(Parameter),
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::FetchPostsFailed => f.write_str("Failed to fetch posts"),
      Error::InvalidParameter(param) => write!(f, "Invalid {param} parameter"),
    }
  }
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("error", &self.to_string())?;
    map.end()
  }
}

/// The body of any unsuccessful response as seen by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
  pub error: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_test::Token;

  #[track_caller]
  fn assert_message_only(value: Error, message: &'static str) {
    serde_test::assert_ser_tokens(
      &value,
      &[
        Token::Map { len: Some(1) },
        Token::Str("error"),
        Token::Str(message),
        Token::MapEnd,
      ],
    );
  }

  #[test]
  fn test_serialize_impl() {
    assert_message_only(Error::FetchPostsFailed, "Failed to fetch posts");
    assert_message_only(
      Error::InvalidParameter(Parameter::Page),
      "Invalid page parameter",
    );
    assert_message_only(
      Error::InvalidParameter(Parameter::Limit),
      "Invalid limit parameter",
    );
  }
}
