#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod app;
pub mod client;
pub mod config;
pub mod database;
pub mod http;
pub mod logging;
pub mod schema;
pub mod server;
pub mod types;
pub mod util;

pub use app::App;

#[cfg(test)]
mod test_utils;
