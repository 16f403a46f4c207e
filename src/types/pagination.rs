use serde::{Deserialize, Serialize};

/// Pagination metadata attached to every page of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub current_page: u64,
  pub total_pages: u64,
  pub total_count: u64,
  pub has_next_page: bool,
  pub has_previous_page: bool,
  pub next_page: Option<u64>,
  pub previous_page: Option<u64>,
}

impl Pagination {
  /// Computes the metadata of `page` (starting from 1) when `returned`
  /// records were taken with the given `limit` out of `total_count`.
  #[must_use]
  pub fn compute(page: u64, limit: u32, returned: usize, total_count: u64) -> Self {
    debug_assert!(page >= 1 && limit >= 1);

    let skipped = (page - 1).saturating_mul(u64::from(limit));
    let returned = u64::try_from(returned).unwrap_or(u64::MAX);

    let has_next_page = skipped.saturating_add(returned) < total_count;
    let has_previous_page = page > 1;

    Self {
      current_page: page,
      total_pages: total_count.div_ceil(u64::from(limit)),
      total_count,
      has_next_page,
      has_previous_page,
      next_page: has_next_page.then(|| page.saturating_add(1)),
      previous_page: has_previous_page.then(|| page - 1),
    }
  }

  /// Metadata for a page that only holds posts the client made up
  /// before the server had a chance to answer.
  #[must_use]
  pub const fn single() -> Self {
    Self {
      current_page: 1,
      total_pages: 1,
      total_count: 1,
      has_next_page: false,
      has_previous_page: false,
      next_page: None,
      previous_page: None,
    }
  }
}
