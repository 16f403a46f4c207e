use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{PostStore, Result};
use crate::{
  schema::{NewPost, Post},
  types::id::PostId,
};

/// [`PostStore`] that keeps every post in memory. Used when no
/// database is configured and throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
  inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
  // newest first
  posts: Vec<Post>,
  last_id: u64,
}

impl MemoryPostStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a post with an explicit creation time.
  pub fn insert_at(
    &self,
    title: impl Into<String>,
    content: Option<String>,
    created_at: DateTime<Utc>,
  ) -> Post {
    let mut inner = self.lock();
    inner.last_id += 1;

    let post = Post {
      id: PostId::new(inner.last_id),
      title: title.into(),
      content,
      created_at,
    };

    let position = inner
      .posts
      .partition_point(|other| (other.created_at, other.id) > (post.created_at, post.id));

    inner.posts.insert(position, post.clone());
    post
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.lock().posts.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[async_trait]
impl PostStore for MemoryPostStore {
  #[tracing::instrument(skip_all, name = "memory.posts.insert")]
  async fn insert_post(&self, post: NewPost<'_>) -> Result<Post> {
    Ok(self.insert_at(post.title, post.content.map(String::from), Utc::now()))
  }

  #[tracing::instrument(skip_all, name = "memory.posts.count")]
  async fn count_posts(&self) -> Result<u64> {
    Ok(self.lock().posts.len() as u64)
  }

  #[tracing::instrument(skip(self), name = "memory.posts.list")]
  async fn list_recent_posts(&self, skip: u64, take: u64) -> Result<Vec<Post>> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let take = usize::try_from(take).unwrap_or(usize::MAX);

    let inner = self.lock();
    Ok(inner.posts.iter().skip(skip).take(take).cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[tokio::test]
  async fn lists_newest_first() {
    let store = MemoryPostStore::new();
    let base = Utc::now();

    store.insert_at("middle", None, base);
    store.insert_at("oldest", None, base - Duration::minutes(5));
    store.insert_at("newest", Some("hi".into()), base + Duration::minutes(5));

    let titles = store
      .list_recent_posts(0, 10)
      .await
      .unwrap()
      .into_iter()
      .map(|post| post.title)
      .collect::<Vec<_>>();

    assert_eq!(vec!["newest", "middle", "oldest"], titles);
    assert_eq!(3, store.count_posts().await.unwrap());
  }

  #[tokio::test]
  async fn ties_are_broken_by_id() {
    let store = MemoryPostStore::new();
    let now = Utc::now();
    let first = store.insert_at("first", None, now);
    let second = store.insert_at("second", None, now);

    let posts = store.list_recent_posts(0, 2).await.unwrap();
    assert_eq!(vec![second.id, first.id], posts.iter().map(|p| p.id).collect::<Vec<_>>());
  }

  #[tokio::test]
  async fn skip_and_take() {
    let store = MemoryPostStore::new();
    let base = Utc::now();
    for i in 0..7 {
      store.insert_at(format!("post {i}"), None, base + Duration::seconds(i));
    }

    let posts = store.list_recent_posts(5, 5).await.unwrap();
    assert_eq!(2, posts.len());
    assert_eq!("post 1", posts[0].title);
    assert!(store.list_recent_posts(7, 5).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn insert_assigns_ids() {
    let store = MemoryPostStore::new();
    let a = store
      .insert_post(NewPost { title: "a", content: Some("x") })
      .await
      .unwrap();
    let b = store
      .insert_post(NewPost { title: "b", content: None })
      .await
      .unwrap();

    assert_eq!(1, a.id.get());
    assert_eq!(2, b.id.get());
    assert_eq!(Some("x".to_string()), a.content);
  }
}
