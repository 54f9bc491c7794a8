//! Deadline server: HTTP surface and CLI around the extraction runtime.

pub mod cli;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
