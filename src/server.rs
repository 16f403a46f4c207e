use actix_web::{
  body::MessageBody,
  dev::{ServiceFactory, ServiceRequest, ServiceResponse},
  middleware::ErrorHandlers,
  web, HttpServer,
};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::{
  http::{
    controllers,
    util::{handle_actix_web_error, QuieterRootSpanBuilder},
  },
  App,
};

#[derive(Debug, Error)]
#[error("Failed to run HTTP server")]
pub struct ServerError;

/// Builds the actix-web application serving every endpoint.
pub fn build(
  app: App,
) -> actix_web::App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  actix_web::App::new()
    .app_data(web::Data::new(app))
    .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
    .wrap(ErrorHandlers::new().default_handler(handle_actix_web_error))
    .configure(controllers::configure)
}

#[tracing::instrument(skip_all, name = "server.run")]
pub async fn run(app: App) -> Result<(), ServerError> {
  let addr = (app.config.ip, app.config.port);
  let workers = app.config.workers.get();

  let server = HttpServer::new(move || build(app.clone()))
    .workers(workers)
    .bind(addr)
    .change_context(ServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", addr.0, addr.1))?;

  tracing::info!("listening at http://{}:{}", addr.0, addr.1);
  server.run().await.change_context(ServerError)
}
