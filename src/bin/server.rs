use postboard::{config, logging, server};
use std::process;

#[tokio::main]
async fn main() {
  let config = match config::Server::load() {
    Ok(config) => config,
    Err(error) => {
      eprintln!("{error:?}");
      process::exit(1);
    },
  };

  if let Err(error) = logging::init(&config.logging) {
    eprintln!("{error:?}");
    process::exit(1);
  }

  let app = match postboard::App::new(config).await {
    Ok(app) => app,
    Err(error) => {
      tracing::error!(?error, "could not start postboard");
      process::exit(1);
    },
  };

  if let Err(error) = server::run(app).await {
    tracing::error!(?error, "server stopped unexpectedly");
    process::exit(1);
  }
}
