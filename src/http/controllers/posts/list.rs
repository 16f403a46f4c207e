use actix_web::{web, HttpResponse};
use thiserror::Error;

use crate::{
  http::Error,
  types::{
    form::posts::{ListPostsQuery, PostsPage},
    Error as ErrorType, Pagination,
  },
  App,
};

#[derive(Debug, Error)]
#[error("Rejected posts listing query")]
struct InvalidQuery;

/// `GET /api/get-posts`: a single page of posts, newest first.
#[tracing::instrument(skip(app), name = "http.posts.list")]
pub async fn list(
  app: web::Data<App>,
  query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, Error> {
  let (page, limit) = query
    .resolve()
    .map_err(|param| Error::from_context(ErrorType::InvalidParameter(param), InvalidQuery))?;

  let skip = (page - 1).saturating_mul(u64::from(limit));
  let (posts, total_count) = futures::try_join!(
    app.store.list_recent_posts(skip, u64::from(limit)),
    app.store.count_posts(),
  )
  .map_err(|report| Error::from_report(ErrorType::FetchPostsFailed, report))?;

  let pagination = Pagination::compute(page, limit, posts.len(), total_count);
  tracing::debug!(
    page,
    limit,
    returned = posts.len(),
    total_count,
    "listed posts"
  );

  Ok(HttpResponse::Ok().json(PostsPage { posts, pagination }))
}
