//! HTTP API: sale ingestion and health reporting

mod handlers;
mod routes;

pub use handlers::*;
pub use routes::*;
