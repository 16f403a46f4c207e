use async_trait::async_trait;
use chrono::{Duration, Utc};
use error_stack::{Report, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::{ApiError, PostsApi};
use crate::{
  database::{MemoryPostStore, PostStore},
  schema::NewPost,
  types::{
    form::posts::{CreatePostForm, CreatePostResponse, PostsPage},
    Pagination,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
  Succeed,
  /// Stores the post but leaves it out of the answer.
  SucceedSilently,
  Reject,
  Unreachable,
}

/// [`PostsApi`] answering like the real server would from an
/// in-memory store. Requests can be held until a test lets them go.
#[derive(Debug)]
pub struct FakeApi {
  pub store: MemoryPostStore,
  pub fail_fetch: AtomicBool,
  pub fetch_count: AtomicUsize,
  create_mode: Mutex<CreateMode>,
  held_page: Mutex<Option<(u64, Arc<Semaphore>)>>,
  held_create: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeApi {
  pub fn with_posts(count: usize) -> Arc<Self> {
    let store = MemoryPostStore::new();
    let base = Utc::now() - Duration::days(1);
    for i in 1..=count {
      let offset = Duration::seconds(i64::try_from(i).unwrap());
      store.insert_at(format!("post {i}"), None, base + offset);
    }

    Arc::new(Self {
      store,
      fail_fetch: AtomicBool::new(false),
      fetch_count: AtomicUsize::new(0),
      create_mode: Mutex::new(CreateMode::Succeed),
      held_page: Mutex::new(None),
      held_create: Mutex::new(None),
    })
  }

  pub fn set_create_mode(&self, mode: CreateMode) {
    *self.create_mode.lock().unwrap() = mode;
  }

  pub fn set_fail_fetch(&self, fail: bool) {
    self.fail_fetch.store(fail, Ordering::SeqCst);
  }

  pub fn fetches(&self) -> usize {
    self.fetch_count.load(Ordering::SeqCst)
  }

  /// Holds every fetch of `page` until a permit is added to the
  /// returned semaphore.
  pub fn hold_page(&self, page: u64) -> Arc<Semaphore> {
    let gate = Arc::new(Semaphore::new(0));
    *self.held_page.lock().unwrap() = Some((page, gate.clone()));
    gate
  }

  pub fn hold_create(&self) -> Arc<Semaphore> {
    let gate = Arc::new(Semaphore::new(0));
    *self.held_create.lock().unwrap() = Some(gate.clone());
    gate
  }

  async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
      gate.acquire().await.unwrap().forget();
    }
  }
}

#[async_trait]
impl PostsApi for FakeApi {
  async fn fetch_page(&self, page: u64, limit: u32) -> Result<PostsPage, ApiError> {
    self.fetch_count.fetch_add(1, Ordering::SeqCst);

    let gate = self
      .held_page
      .lock()
      .unwrap()
      .as_ref()
      .filter(|(held, _)| *held == page)
      .map(|(_, gate)| gate.clone());
    Self::pass(gate).await;

    if self.fail_fetch.load(Ordering::SeqCst) {
      return Err(Report::new(ApiError::Transport));
    }

    let skip = (page - 1) * u64::from(limit);
    let posts = self.store.list_recent_posts(skip, u64::from(limit)).await.unwrap();
    let total = self.store.count_posts().await.unwrap();
    Ok(PostsPage {
      pagination: Pagination::compute(page, limit, posts.len(), total),
      posts,
    })
  }

  async fn create_post(&self, form: &CreatePostForm) -> Result<CreatePostResponse, ApiError> {
    let gate = self.held_create.lock().unwrap().clone();
    Self::pass(gate).await;

    let mode = *self.create_mode.lock().unwrap();
    match mode {
      CreateMode::Succeed | CreateMode::SucceedSilently => {
        let post = self
          .store
          .insert_post(NewPost {
            title: form.title.as_deref().unwrap(),
            content: form.content.as_deref(),
          })
          .await
          .unwrap();
        let mut response = CreatePostResponse::created(post);
        if mode == CreateMode::SucceedSilently {
          response.post = None;
        }
        Ok(response)
      },
      CreateMode::Reject => Ok(CreatePostResponse::rejected(
        CreatePostResponse::FAILED_MESSAGE,
      )),
      CreateMode::Unreachable => Err(Report::new(ApiError::Transport)),
    }
  }
}
