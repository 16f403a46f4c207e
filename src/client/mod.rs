//! Client side of the posts board.
//!
//! [`PostsManager`] keeps the pages a client has seen so far, loads
//! further pages on demand and applies new posts optimistically
//! before the server confirms them.

mod api;
mod cache;
mod error;
mod http;
mod manager;

#[cfg(test)]
mod fake;

pub use api::{ApiError, PostsApi};
pub use cache::{CachedPage, CachedPost, PageCache, PostState};
pub use error::ManagerError;
pub use http::HttpPostsApi;
pub use manager::{
  Fetch, Notification, NotificationKind, PostsData, PostsManager, PostsView,
};
