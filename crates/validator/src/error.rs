use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize};
use std::borrow::Cow;

pub struct MessageBuilder(Vec<Cow<'static, str>>);

impl MessageBuilder {
  #[must_use]
  pub const fn new() -> Self {
    Self(Vec::new())
  }

  pub fn insert(&mut self, message: impl Into<Cow<'static, str>>) {
    self.0.push(message.into());
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Messages(self.0)
  }
}

pub struct FieldBuilder(IndexMap<Cow<'static, str>, ValidateError>);

#[allow(clippy::new_without_default)]
impl FieldBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self(IndexMap::default())
  }

  pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: ValidateError) {
    if !value.is_empty() {
      self.0.insert(key.into(), value);
    }
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Fields(self.0)
  }
}

// ---------------------------------------------------- //

/// A tree of validation messages keyed by the field that failed.
#[derive(Clone, PartialEq, Eq)]
pub enum ValidateError {
  Fields(IndexMap<Cow<'static, str>, ValidateError>),
  Messages(Vec<Cow<'static, str>>),
}

impl std::fmt::Display for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("Invalid data occurred")
  }
}

impl std::error::Error for ValidateError {}

impl std::fmt::Debug for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidateError::Fields(n) => n.fmt(f),
      ValidateError::Messages(n) => f.debug_map().entry(&"_errors", &n).finish(),
    }
  }
}

impl ValidateError {
  #[must_use]
  pub fn field_builder() -> FieldBuilder {
    FieldBuilder::new()
  }

  #[must_use]
  pub fn msg_builder() -> MessageBuilder {
    MessageBuilder::new()
  }
}

impl ValidateError {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      ValidateError::Fields(n) => n.is_empty(),
      ValidateError::Messages(n) => n.is_empty(),
    }
  }

  /// Visits every message in the tree along with the dotted
  /// path of the field it belongs to.
  pub fn for_each_message(&self, mut visit: impl FnMut(&str, &str)) {
    fn walk<'a>(
      err: &'a ValidateError,
      path: &mut Vec<&'a str>,
      visit: &mut dyn FnMut(&str, &str),
    ) {
      match err {
        ValidateError::Fields(fields) => {
          for (field, inner) in fields {
            path.push(field);
            walk(inner, path, visit);
            path.pop();
          }
        },
        ValidateError::Messages(messages) => {
          let joined = path.join(".");
          for message in messages {
            visit(&joined, message);
          }
        },
      }
    }

    let mut path = Vec::new();
    walk(self, &mut path, &mut visit);
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl Serialize for ValidateError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    match self {
      ValidateError::Fields(n) => {
        let mut map = serializer.serialize_map(Some(n.len()))?;
        for (key, value) in n {
          map.serialize_entry(key, value)?;
        }
        map.end()
      },
      ValidateError::Messages(n) => {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("_errors", &n)?;
        map.end()
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::{extras, Validate};

  use super::*;
  use serde_test::Token;

  #[derive(Debug)]
  struct Draft {
    title: &'static str,
    content: &'static str,
  }

  impl Validate for Draft {
    fn validate(&self) -> Result<(), ValidateError> {
      let mut fields = ValidateError::field_builder();
      {
        let mut msg = ValidateError::msg_builder();
        extras::require_text(Some(self.title), "Title is required", &mut msg);
        if self.title.len() > 16 {
          msg.insert("Title is too long");
        }
        fields.insert("title", msg.build());
      }
      {
        let mut msg = ValidateError::msg_builder();
        extras::require_text(Some(self.content), "Content is required", &mut msg);
        fields.insert("content", msg.build());
      }
      fields.build().into_result()
    }
  }

  #[test]
  fn test_debug_fmt() {
    const EXPECTED_FMT_MSG: &str = r#"{"content": {"_errors": ["Content is required"]}}"#;

    let error = Draft { title: "Hello", content: "  " }.validate().unwrap_err();
    assert_eq!(EXPECTED_FMT_MSG, format!("{error:?}"));
  }

  #[test]
  fn test_serialize_impl() {
    let error = Draft { title: "", content: "" }.validate().unwrap_err();
    serde_test::assert_ser_tokens(
      &error,
      &[
        Token::Map { len: Some(2) },
        Token::Str("title"),
        Token::Map { len: Some(1) },
        Token::Str("_errors"),
        Token::Seq { len: Some(1) },
        Token::Str("Title is required"),
        Token::SeqEnd,
        Token::MapEnd,
        Token::Str("content"),
        Token::Map { len: Some(1) },
        Token::Str("_errors"),
        Token::Seq { len: Some(1) },
        Token::Str("Content is required"),
        Token::SeqEnd,
        Token::MapEnd,
        Token::MapEnd,
      ],
    );
  }

  #[test]
  fn test_for_each_message() {
    let error = Draft { title: "a title that is way too long", content: "" }
      .validate()
      .unwrap_err();

    let mut seen = Vec::new();
    error.for_each_message(|field, message| seen.push(format!("{field}: {message}")));
    assert_eq!(
      vec!["title: Title is too long".to_string(), "content: Content is required".to_string()],
      seen
    );
  }

  #[test]
  fn validate_error_is_empty() {
    assert!(MessageBuilder::new().build().is_empty());
    assert!(FieldBuilder::new().build().is_empty());
    assert!(Draft { title: "Hi", content: "There" }.validate().is_ok());

    let mut msg = MessageBuilder::new();
    msg.insert("Hello world!");
    assert!(!msg.build().is_empty());

    let mut msg = MessageBuilder::new();
    msg.insert("Hello world!");

    let mut err = FieldBuilder::new();
    err.insert("microbar", msg.build());
    assert!(!err.build().is_empty());

    let mut err = FieldBuilder::new();
    err.insert("empty", MessageBuilder::new().build());
    assert!(err.build().is_empty());
  }
}
