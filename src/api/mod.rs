//! HTTP API layer: handlers, middleware, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
mod doc;

pub use routes::create_router;
