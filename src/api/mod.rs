//! HTTP API

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use extract::ApiJson;
pub use handlers::{AppState, SearchDefaults};
pub use routes::build_router;
