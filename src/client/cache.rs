use std::collections::HashSet;

use crate::{
  schema::Post,
  types::{form::posts::PostsPage, id::PostId, Pagination},
};

/// Whether a cached post has been stored by the server or only
/// exists on this client until the next re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostState {
  Confirmed,
  Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPost {
  pub post: Post,
  pub state: PostState,
}

impl CachedPost {
  #[must_use]
  pub fn is_pending(&self) -> bool {
    self.state == PostState::Pending
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
  pub posts: Vec<CachedPost>,
  pub pagination: Pagination,
}

impl From<PostsPage> for CachedPage {
  fn from(value: PostsPage) -> Self {
    Self {
      posts: value
        .posts
        .into_iter()
        .map(|post| CachedPost {
          post,
          state: PostState::Confirmed,
        })
        .collect(),
      pagination: value.pagination,
    }
  }
}

/// Pages of posts in the order they were fetched.
///
/// `pages()[i]` was always fetched with `page_params()[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCache {
  pages: Vec<CachedPage>,
  page_params: Vec<u64>,
}

impl PageCache {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, param: u64, page: impl Into<CachedPage>) {
    self.pages.push(page.into());
    self.page_params.push(param);
  }

  #[must_use]
  pub fn pages(&self) -> &[CachedPage] {
    &self.pages
  }

  #[must_use]
  pub fn page_params(&self) -> &[u64] {
    &self.page_params
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.pages.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  /// Page that follows the last cached one, if the server said
  /// there is any.
  #[must_use]
  pub fn next_page(&self) -> Option<u64> {
    let last = self.pages.last()?;
    if last.pagination.has_next_page {
      last.pagination.next_page
    } else {
      None
    }
  }

  #[must_use]
  pub fn has_next_page(&self) -> bool {
    self.next_page().is_some()
  }

  /// Puts a post that the server has not confirmed yet at the head
  /// of the first page. An empty cache gets a first page of its own
  /// holding only that post.
  pub fn insert_pending(&mut self, post: Post) {
    let pending = CachedPost {
      post,
      state: PostState::Pending,
    };

    if let Some(first) = self.pages.first_mut() {
      first.posts.insert(0, pending);
    } else {
      self.push(
        1,
        CachedPage {
          posts: vec![pending],
          pagination: Pagination::single(),
        },
      );
    }
  }

  /// Every cached post in cache order. A post appearing in more than
  /// one page (the server got new posts between two fetches) is only
  /// listed the first time it is seen.
  #[must_use]
  pub fn posts(&self) -> Vec<&CachedPost> {
    let mut seen = HashSet::<(PostState, PostId)>::new();
    self
      .pages
      .iter()
      .flat_map(|page| page.posts.iter())
      .filter(|cached| seen.insert((cached.state, cached.post.id)))
      .collect()
  }
}
