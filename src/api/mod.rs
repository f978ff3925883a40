//! HTTP API for the MedScribe front-end.
//!
//! Exposes export, assessment, template, prescription, automation and
//! dashboard logic as JSON endpoints under `/api/`. `api_router()` returns a
//! `Router` that can be mounted on any axum server; `server` runs it.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, start_server_on, ApiServer, ApiSession};
pub use types::ApiContext;
