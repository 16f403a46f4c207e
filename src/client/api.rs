use async_trait::async_trait;
use error_stack::Result;
use thiserror::Error;

use crate::types::form::posts::{CreatePostForm, CreatePostResponse, PostsPage};

/// Remote operations the [`PostsManager`] depends on.
///
/// [`PostsManager`]: super::PostsManager
#[async_trait]
pub trait PostsApi: Send + Sync {
  /// Fetches a single page of posts, newest first.
  async fn fetch_page(&self, page: u64, limit: u32) -> Result<PostsPage, ApiError>;

  async fn create_post(&self, form: &CreatePostForm) -> Result<CreatePostResponse, ApiError>;
}

#[async_trait]
impl<T: PostsApi + ?Sized> PostsApi for std::sync::Arc<T> {
  async fn fetch_page(&self, page: u64, limit: u32) -> Result<PostsPage, ApiError> {
    (**self).fetch_page(page, limit).await
  }

  async fn create_post(&self, form: &CreatePostForm) -> Result<CreatePostResponse, ApiError> {
    (**self).create_post(form).await
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
  /// The server refused the request and said why.
  #[error("{0}")]
  Rejected(String),
  #[error("could not reach the posts service")]
  Transport,
  #[error("received an unexpected response from the posts service")]
  UnexpectedResponse,
}

impl ApiError {
  pub const FETCH_FAILED_MESSAGE: &'static str = "Failed to fetch posts";

  /// Message suitable to be shown after a failed read.
  #[must_use]
  pub fn fetch_message(&self) -> String {
    match self {
      Self::Rejected(message) => message.clone(),
      Self::Transport | Self::UnexpectedResponse => Self::FETCH_FAILED_MESSAGE.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fetch_messages() {
    assert_eq!(
      "Invalid page parameter",
      ApiError::Rejected("Invalid page parameter".into()).fetch_message()
    );
    assert_eq!("Failed to fetch posts", ApiError::Transport.fetch_message());
    assert_eq!("Failed to fetch posts", ApiError::UnexpectedResponse.fetch_message());
  }
}
