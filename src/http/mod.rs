//! # HTTP surface
//!
//! axum router exposing the sales reports, views, stored procedures and the
//! customer/order mutations, plus the static front-end mount.

pub mod config;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use extract::{JsonBody, PathParam};
pub use routes::AppState;
pub use server::{build_router, serve};
