use async_trait::async_trait;
use error_stack::{Report, Result, ResultExt};
use url::Url;

use super::{ApiError, PostsApi};
use crate::types::{
  error::ErrorBody,
  form::posts::{CreatePostForm, CreatePostResponse, PostsPage},
};

/// [`PostsApi`] talking to a postboard server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPostsApi {
  client: reqwest::Client,
  base: Url,
}

impl HttpPostsApi {
  const LIST_PATH: &'static str = "/api/get-posts";
  const CREATE_PATH: &'static str = "/api/create-post";

  #[must_use]
  pub fn new(base: Url) -> Self {
    Self::with_client(reqwest::Client::new(), base)
  }

  /// Uses an existing client, for instance one that was built
  /// with a request timeout.
  #[must_use]
  pub fn with_client(client: reqwest::Client, base: Url) -> Self {
    Self { client, base }
  }

  #[must_use]
  pub fn base(&self) -> &Url {
    &self.base
  }

  fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
    self
      .base
      .join(path)
      .change_context(ApiError::UnexpectedResponse)
      .attach_printable_lazy(|| format!("invalid base url {}", self.base))
  }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
  #[tracing::instrument(skip(self), name = "client.posts.fetch")]
  async fn fetch_page(&self, page: u64, limit: u32) -> Result<PostsPage, ApiError> {
    let response = self
      .client
      .get(self.endpoint(Self::LIST_PATH)?)
      .query(&[("page", page), ("limit", u64::from(limit))])
      .send()
      .await
      .change_context(ApiError::Transport)?;

    let status = response.status();
    if status.is_success() {
      return response
        .json::<PostsPage>()
        .await
        .change_context(ApiError::UnexpectedResponse);
    }

    // the body says why whenever the server produced the error
    let report = match response.json::<ErrorBody>().await {
      Ok(body) => Report::new(ApiError::Rejected(body.error)),
      Err(error) => Report::new(error).change_context(ApiError::UnexpectedResponse),
    };
    Err(report.attach_printable(format!("server responded with {status}")))
  }

  #[tracing::instrument(skip_all, name = "client.posts.create")]
  async fn create_post(&self, form: &CreatePostForm) -> Result<CreatePostResponse, ApiError> {
    let response = self
      .client
      .post(self.endpoint(Self::CREATE_PATH)?)
      .form(form)
      .send()
      .await
      .change_context(ApiError::Transport)?;

    let status = response.status();
    if !status.is_success() {
      return Err(
        Report::new(ApiError::UnexpectedResponse)
          .attach_printable(format!("server responded with {status}")),
      );
    }

    response
      .json::<CreatePostResponse>()
      .await
      .change_context(ApiError::UnexpectedResponse)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn endpoints_ignore_base_path() {
    let api = HttpPostsApi::new(Url::parse("http://localhost:3000/app/").unwrap());
    assert_eq!(
      "http://localhost:3000/api/get-posts",
      api.endpoint(HttpPostsApi::LIST_PATH).unwrap().as_str()
    );
    assert_eq!(
      "http://localhost:3000/api/create-post",
      api.endpoint(HttpPostsApi::CREATE_PATH).unwrap().as_str()
    );
  }

  #[tokio::test]
  async fn unreachable_server_is_a_transport_error() {
    // nothing listens on the discard port
    let api = HttpPostsApi::new(Url::parse("http://127.0.0.1:9").unwrap());
    let error = api.fetch_page(1, 5).await.unwrap_err();
    assert_eq!(&ApiError::Transport, error.current_context());
  }
}
