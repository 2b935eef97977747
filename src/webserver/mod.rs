//! REST facade over the plugin
//!
//! Mounted under `/plugins/tickerdesk`:
//! - `GET /quote/:symbol`, `GET /search/:query` - raw upstream JSON
//! - `GET /health` - liveness and cache statistics
//! - `GET /tools`, `POST /tools/:name` - tool listing and invocation

mod server;

pub mod routes;
pub mod state;
pub mod utils;

// Public API for starting/stopping the webserver
pub use server::{build_app, shutdown, start_server};
