use async_trait::async_trait;
use chrono::{Duration, Utc};
use error_stack::Report;
use std::sync::Arc;

use crate::{
  config,
  database::{self, MemoryPostStore, PostStore},
  schema::{NewPost, Post},
  App,
};

/// Creates an [`App`] backed by an in-memory store holding `count`
/// posts titled `post 1` up to `post {count}`, the last one being
/// the newest.
pub fn build_test_app(count: usize) -> (App, Arc<MemoryPostStore>) {
  let store = Arc::new(MemoryPostStore::new());
  let base = Utc::now() - Duration::days(1);
  for i in 1..=count {
    let offset = Duration::seconds(i64::try_from(i).unwrap());
    store.insert_at(format!("post {i}"), Some(format!("content {i}")), base + offset);
  }

  (app_with_store(store.clone()), store)
}

pub fn app_with_store(store: Arc<dyn PostStore>) -> App {
  App::with_store(config::Server::default(), store)
}

/// A store whose database is always unreachable.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl PostStore for FailingStore {
  async fn insert_post(&self, _post: NewPost<'_>) -> database::Result<Post> {
    Err(Report::new(database::Error::UnhealthyPool))
  }

  async fn count_posts(&self) -> database::Result<u64> {
    Err(Report::new(database::Error::UnhealthyPool))
  }

  async fn list_recent_posts(&self, _skip: u64, _take: u64) -> database::Result<Vec<Post>> {
    Err(Report::new(database::Error::UnhealthyPool))
  }
}
