use thiserror::Error;
use validator::ValidateError;

/// Failures surfaced by the [`PostsManager`](super::PostsManager).
/// The message of each one is meant to be shown as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
  #[error("{0}")]
  LoadFailed(String),
  #[error("{0}")]
  CreateFailed(String),
  /// The draft is missing a title or a content. Nothing was sent.
  #[error("Title and content are required.")]
  InvalidForm(ValidateError),
}
