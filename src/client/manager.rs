use chrono::Utc;
use std::num::NonZeroU64;
use std::sync::{Mutex, MutexGuard, PoisonError};
use validator::Validate;

use super::{ApiError, CachedPost, ManagerError, PageCache, PostsApi};
use crate::{
  schema::Post,
  types::{
    form::posts::{CreatePostForm, CreatePostResponse},
    id::PostId,
  },
};

/// Outcome of a read that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
  /// The fetched pages are now in the cache.
  Applied,
  /// Nothing was requested. Either there is no next page or
  /// another load is still in flight.
  Skipped,
  /// The response arrived after a newer operation took over the
  /// cache and was thrown away.
  Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
  Success,
  Error,
}

/// A short message to be shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub kind: NotificationKind,
  pub message: String,
}

/// What should be rendered for the posts list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsView {
  Loading,
  Failed(String),
  Ready(PostsData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsData {
  pub posts: Vec<CachedPost>,
  pub has_next_page: bool,
  pub is_fetching_next_page: bool,
  pub is_creating: bool,
}

impl PostsData {
  /// There are no posts to show at all.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.posts.is_empty()
  }
}

#[derive(Debug, Default)]
struct State {
  cache: Option<PageCache>,
  // bumped whenever outstanding reads must be discarded
  epoch: u64,
  loading: bool,
  fetching_next: bool,
  creating: usize,
  error: Option<ManagerError>,
  notifications: Vec<Notification>,
  draft: CreatePostForm,
  last_placeholder: u64,
}

impl State {
  /// Discards every outstanding read.
  fn supersede_reads(&mut self) -> u64 {
    self.epoch += 1;
    self.loading = false;
    self.fetching_next = false;
    self.epoch
  }

  fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
    self.notifications.push(Notification {
      kind,
      message: message.into(),
    });
  }

  /// Client timestamp in milliseconds, bumped so that two posts
  /// created in the same millisecond are still told apart.
  fn next_placeholder(&mut self) -> PostId {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let id = now.max(self.last_placeholder.saturating_add(1));
    self.last_placeholder = id;
    PostId::from_nonzero(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
  }
}

/// Paginated view over the posts of a server, owned by one session.
///
/// Every method takes `&self` so that a create may be in flight
/// while the next page is being loaded. The internal lock is never
/// held across an await point.
#[derive(Debug)]
pub struct PostsManager<A> {
  api: A,
  state: Mutex<State>,
}

impl<A: PostsApi> PostsManager<A> {
  pub const PAGE_LIMIT: u32 = 5;

  #[must_use]
  pub fn new(api: A) -> Self {
    Self {
      api,
      state: Mutex::new(State::default()),
    }
  }

  #[must_use]
  pub fn api(&self) -> &A {
    &self.api
  }

  /// Loads the first page, replacing anything that was cached.
  ///
  /// A failure is kept until this is called again.
  #[tracing::instrument(skip_all, name = "posts.load")]
  pub async fn load(&self) -> Result<Fetch, ManagerError> {
    let epoch = {
      let mut state = self.lock();
      state.loading = true;
      state.epoch
    };

    let result = self.api.fetch_page(1, Self::PAGE_LIMIT).await;

    let mut state = self.lock();
    if state.epoch != epoch {
      return Ok(Fetch::Superseded);
    }
    state.loading = false;

    match result {
      Ok(page) => {
        let mut cache = PageCache::new();
        cache.push(1, page);
        state.cache = Some(cache);
        state.error = None;
        Ok(Fetch::Applied)
      },
      Err(report) => {
        tracing::warn!(?report, "could not load the first page of posts");
        let error = ManagerError::LoadFailed(report.current_context().fetch_message());
        state.error = Some(error.clone());
        Err(error)
      },
    }
  }

  /// Appends the page following the last cached one.
  ///
  /// Skipped when there is no next page or a load is in flight. A
  /// failure leaves every cached post in place.
  #[tracing::instrument(skip_all, name = "posts.load_next_page")]
  pub async fn load_next_page(&self) -> Result<Fetch, ManagerError> {
    let (epoch, param) = {
      let mut state = self.lock();
      if state.fetching_next || state.loading {
        return Ok(Fetch::Skipped);
      }
      let Some(param) = state.cache.as_ref().and_then(PageCache::next_page) else {
        return Ok(Fetch::Skipped);
      };
      state.fetching_next = true;
      (state.epoch, param)
    };

    let result = self.api.fetch_page(param, Self::PAGE_LIMIT).await;

    let mut state = self.lock();
    if state.epoch != epoch {
      tracing::debug!(page = param, "discarding superseded page");
      return Ok(Fetch::Superseded);
    }
    state.fetching_next = false;

    match result {
      Ok(page) => {
        if let Some(cache) = state.cache.as_mut() {
          cache.push(param, page);
        }
        state.error = None;
        Ok(Fetch::Applied)
      },
      Err(report) => {
        tracing::warn!(?report, page = param, "could not load next page of posts");
        let error = ManagerError::LoadFailed(report.current_context().fetch_message());
        state.error = Some(error.clone());
        Err(error)
      },
    }
  }

  /// Creates a post, showing it at the top of the list right away.
  ///
  /// The cached pages are re-fetched once the server answered,
  /// whatever the answer was. If the server could not be reached
  /// the list is first put back the way it was.
  ///
  /// The stored draft is cleared on success if it still holds the
  /// submitted values. The created post is returned when the server
  /// sent it back.
  #[tracing::instrument(skip_all, name = "posts.create")]
  pub async fn create_post(
    &self,
    form: &CreatePostForm,
  ) -> Result<Option<Post>, ManagerError> {
    form.validate().map_err(ManagerError::InvalidForm)?;

    let snapshot = {
      let mut state = self.lock();
      state.supersede_reads();

      let snapshot = state.cache.clone();
      let pending = Post {
        id: state.next_placeholder(),
        title: form.title.as_deref().unwrap_or_default().trim().to_string(),
        content: form.content.as_deref().map(|v| v.trim().to_string()),
        created_at: Utc::now(),
      };
      state
        .cache
        .get_or_insert_with(PageCache::new)
        .insert_pending(pending);

      state.creating += 1;
      snapshot
    };

    let result = self.api.create_post(form).await;
    let outcome = self.settle_create(form, result, snapshot);

    if let Err(error) = self.reconcile().await {
      tracing::warn!(%error, "could not refresh posts after creating one");
    }
    outcome
  }

  /// Submits the current draft. See [`PostsManager::create_post`].
  pub async fn submit_draft(&self) -> Result<Option<Post>, ManagerError> {
    let draft = self.draft();
    self.create_post(&draft).await
  }

  fn settle_create(
    &self,
    form: &CreatePostForm,
    result: error_stack::Result<CreatePostResponse, ApiError>,
    snapshot: Option<PageCache>,
  ) -> Result<Option<Post>, ManagerError> {
    let mut state = self.lock();
    state.creating = state.creating.saturating_sub(1);

    let response = match result {
      Ok(response) => response,
      Err(report) => {
        tracing::warn!(?report, "could not create post, restoring previous posts");
        state.cache = snapshot;
        state.notify(NotificationKind::Error, CreatePostResponse::FAILED_MESSAGE);
        return Err(ManagerError::CreateFailed(
          CreatePostResponse::FAILED_MESSAGE.into(),
        ));
      },
    };

    if response.success {
      state.notify(NotificationKind::Success, response.message);
      if state.draft == *form {
        state.draft = CreatePostForm::default();
      }
      Ok(response.post)
    } else {
      state.notify(NotificationKind::Error, response.message.clone());
      Err(ManagerError::CreateFailed(response.message))
    }
  }

  /// Re-fetches as many pages as are cached (at least one) starting
  /// from the first, then replaces the cache with them. Pending
  /// posts are dropped in the process.
  #[tracing::instrument(skip_all, name = "posts.reconcile")]
  pub async fn reconcile(&self) -> Result<Fetch, ManagerError> {
    let (epoch, wanted) = {
      let mut state = self.lock();
      let wanted = state.cache.as_ref().map_or(1, |cache| cache.len().max(1));
      let epoch = state.supersede_reads();
      state.loading = true;
      (epoch, wanted)
    };

    let mut cache = PageCache::new();
    let mut param = Some(1);
    while let Some(page) = param {
      if cache.len() >= wanted {
        break;
      }

      match self.api.fetch_page(page, Self::PAGE_LIMIT).await {
        Ok(fetched) => {
          param = fetched
            .pagination
            .has_next_page
            .then_some(fetched.pagination.next_page)
            .flatten();
          cache.push(page, fetched);
        },
        Err(report) => {
          tracing::warn!(?report, page, "could not refresh posts");
          let mut state = self.lock();
          if state.epoch != epoch {
            return Ok(Fetch::Superseded);
          }

          let error = ManagerError::LoadFailed(report.current_context().fetch_message());
          state.loading = false;
          state.error = Some(error.clone());
          return Err(error);
        },
      }

      if self.lock().epoch != epoch {
        return Ok(Fetch::Superseded);
      }
    }

    let mut state = self.lock();
    if state.epoch != epoch {
      return Ok(Fetch::Superseded);
    }
    state.cache = Some(cache);
    state.loading = false;
    state.error = None;
    Ok(Fetch::Applied)
  }
}

impl<A> PostsManager<A> {
  /// Posts to render, or why there are none.
  #[must_use]
  pub fn view(&self) -> PostsView {
    let state = self.lock();
    match (&state.cache, &state.error) {
      (Some(cache), _) => PostsView::Ready(PostsData {
        posts: cache.posts().into_iter().cloned().collect(),
        has_next_page: cache.has_next_page(),
        is_fetching_next_page: state.fetching_next,
        is_creating: state.creating > 0,
      }),
      (None, Some(error)) if !state.loading => PostsView::Failed(error.to_string()),
      (None, _) => PostsView::Loading,
    }
  }

  /// Flattened posts without duplicates, in cache order.
  #[must_use]
  pub fn posts(&self) -> Vec<CachedPost> {
    let state = self.lock();
    state
      .cache
      .as_ref()
      .map(|cache| cache.posts().into_iter().cloned().collect())
      .unwrap_or_default()
  }

  #[must_use]
  pub fn cache(&self) -> Option<PageCache> {
    self.lock().cache.clone()
  }

  /// The error of the last failed read, cleared by the next
  /// successful one.
  #[must_use]
  pub fn last_error(&self) -> Option<ManagerError> {
    self.lock().error.clone()
  }

  #[must_use]
  pub fn is_fetching_next_page(&self) -> bool {
    self.lock().fetching_next
  }

  #[must_use]
  pub fn is_creating(&self) -> bool {
    self.lock().creating > 0
  }

  /// Drains the notifications queued so far.
  #[must_use]
  pub fn take_notifications(&self) -> Vec<Notification> {
    std::mem::take(&mut self.lock().notifications)
  }

  #[must_use]
  pub fn draft(&self) -> CreatePostForm {
    self.lock().draft.clone()
  }

  pub fn set_draft(&self, draft: CreatePostForm) {
    self.lock().draft = draft;
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
