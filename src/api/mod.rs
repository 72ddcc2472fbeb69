//! HTTP API module: routes, handlers and the OpenAPI document.

pub mod docs;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
