use serde::{Deserialize, Serialize};
use validator::{extras::require_text, Validate, ValidateError};

use crate::{schema::Post, types::error::Parameter, types::Pagination};

/// Query parameters of `GET /api/get-posts`.
///
/// Both fields are kept as raw strings so that a malformed value
/// can be reported per parameter instead of as a generic
/// deserialization failure.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListPostsQuery {
  pub page: Option<String>,
  pub limit: Option<String>,
}

impl ListPostsQuery {
  pub const DEFAULT_PAGE: u64 = 1;
  pub const DEFAULT_LIMIT: u32 = 5;
  pub const MAX_LIMIT: u32 = 100;

  /// Resolves the requested page and its size. `page` is checked
  /// first and `limit` is clamped only after it is known to be
  /// a positive integer.
  pub fn resolve(&self) -> Result<(u64, u32), Parameter> {
    let page = parse_positive(self.page.as_deref(), Self::DEFAULT_PAGE)
      .ok_or(Parameter::Page)?;

    let limit = parse_positive(self.limit.as_deref(), u64::from(Self::DEFAULT_LIMIT))
      .ok_or(Parameter::Limit)?
      .min(u64::from(Self::MAX_LIMIT));

    Ok((page, u32::try_from(limit).unwrap_or(Self::MAX_LIMIT)))
  }
}

fn parse_positive(value: Option<&str>, default: u64) -> Option<u64> {
  let Some(value) = value else {
    return Some(default);
  };
  match parse_leading_int(value)? {
    (false, n) if n >= 1 => Some(n),
    _ => None,
  }
}

/// Reads the integer at the start of `value` as a lenient form parser
/// does. Leading whitespace and a sign are accepted, anything after
/// the digits is ignored and values beyond `u64::MAX` saturate.
///
/// Returns whether the number is negative along with its magnitude,
/// or `None` when no digit follows the sign.
fn parse_leading_int(value: &str) -> Option<(bool, u64)> {
  let value = value.trim_start();
  let (negative, digits) = match value.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, value.strip_prefix('+').unwrap_or(value)),
  };

  let end = digits
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(digits.len());
  if end == 0 {
    return None;
  }

  let magnitude = digits[..end].bytes().fold(0u64, |acc, digit| {
    acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
  });
  Some((negative, magnitude))
}

/// A single page of posts served by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostsPage {
  pub posts: Vec<Post>,
  pub pagination: Pagination,
}

/// Form data submitted to create a post.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreatePostForm {
  pub title: Option<String>,
  pub content: Option<String>,
}

impl CreatePostForm {
  pub const REQUIRED_MESSAGE: &'static str = "Title and content are required.";

  #[must_use]
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title: Some(title.into()),
      content: Some(content.into()),
    }
  }
}

impl Validate for CreatePostForm {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    {
      let mut msg = ValidateError::msg_builder();
      require_text(self.title.as_deref(), "Title is required", &mut msg);
      fields.insert("title", msg.build());
    }
    {
      let mut msg = ValidateError::msg_builder();
      require_text(self.content.as_deref(), "Content is required", &mut msg);
      fields.insert("content", msg.build());
    }
    fields.build().into_result()
  }
}

/// Outcome of a create request. A logical failure such as a
/// missing field is still a successful HTTP exchange, it is
/// reported through `success` and `message` instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreatePostResponse {
  pub success: bool,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post: Option<Post>,
}

impl CreatePostResponse {
  pub const CREATED_MESSAGE: &'static str = "Post created successfully!";
  pub const FAILED_MESSAGE: &'static str = "Failed to create post.";

  #[must_use]
  pub fn created(post: Post) -> Self {
    Self {
      success: true,
      message: Self::CREATED_MESSAGE.into(),
      post: Some(post),
    }
  }

  #[must_use]
  pub fn rejected(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: message.into(),
      post: None,
    }
  }
}
