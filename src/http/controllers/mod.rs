use actix_web::web;

pub mod posts;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/get-posts", web::get().to(posts::list))
      .route("/create-post", web::post().to(posts::create)),
  );
}
