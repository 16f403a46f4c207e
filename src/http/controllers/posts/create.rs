use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::{
  schema::NewPost,
  types::form::posts::{CreatePostForm, CreatePostResponse},
  App,
};

/// `POST /api/create-post`
///
/// Always answers with `200 OK`. Whether the post was created is
/// reported in the body.
#[tracing::instrument(skip_all, name = "http.posts.create")]
pub async fn create(app: web::Data<App>, form: web::Form<CreatePostForm>) -> HttpResponse {
  let form = form.into_inner();
  if let Err(error) = form.validate() {
    tracing::debug!(%error, "rejected post form");
    return HttpResponse::Ok().json(CreatePostResponse::rejected(
      CreatePostForm::REQUIRED_MESSAGE,
    ));
  }

  // validated above, both are filled
  let title = form.title.as_deref().unwrap_or_default().trim();
  let content = form.content.as_deref().map(str::trim);

  let result = app.store.insert_post(NewPost { title, content }).await;
  match result {
    Ok(post) => {
      tracing::info!(id = %post.id, "created post");
      HttpResponse::Ok().json(CreatePostResponse::created(post))
    },
    Err(report) => {
      tracing::error!(?report, "failed to create post");
      HttpResponse::Ok().json(CreatePostResponse::rejected(
        CreatePostResponse::FAILED_MESSAGE,
      ))
    },
  }
}

#[cfg(test)]
mod tests {
  use crate::test_utils::{self, FailingStore};
  use crate::types::form::posts::CreatePostResponse;
  use actix_web::{http::StatusCode, test};
  use std::sync::Arc;

  async fn submit(app: crate::App, body: &str) -> (StatusCode, CreatePostResponse) {
    let service = test::init_service(crate::server::build(app)).await;
    let request = test::TestRequest::post()
      .uri("/api/create-post")
      .insert_header(("content-type", "application/x-www-form-urlencoded"))
      .set_payload(body.to_string())
      .to_request();

    let response = test::call_service(&service, request).await;
    let status = response.status();
    (status, test::read_body_json(response).await)
  }

  #[actix_web::test]
  async fn creates_post() {
    let (app, store) = test_utils::build_test_app(2);
    let (status, body) = submit(app.clone(), "title=Hello&content=World").await;

    assert_eq!(StatusCode::OK, status);
    assert!(body.success);
    assert_eq!("Post created successfully!", body.message);

    let post = body.post.unwrap();
    assert_eq!("Hello", post.title);
    assert_eq!(Some("World".to_string()), post.content);
    assert_eq!(3, store.len());

    let newest = app.store.list_recent_posts(0, 1).await.unwrap();
    assert_eq!(post.id, newest[0].id);
  }

  #[actix_web::test]
  async fn rejects_blank_fields() {
    for body in ["", "title=Hello", "content=World", "title=%20&content=World"] {
      let (app, store) = test_utils::build_test_app(0);
      let (status, response) = submit(app, body).await;

      assert_eq!(StatusCode::OK, status, "{body:?}");
      assert!(!response.success, "{body:?}");
      assert_eq!("Title and content are required.", response.message);
      assert!(response.post.is_none());
      assert!(store.is_empty());
    }
  }

  #[actix_web::test]
  async fn store_failure_is_reported() {
    let app = test_utils::app_with_store(Arc::new(FailingStore));
    let (status, body) = submit(app, "title=Hello&content=World").await;

    assert_eq!(StatusCode::OK, status);
    assert!(!body.success);
    assert_eq!("Failed to create post.", body.message);
  }
}
