//! Data Transfer Objects for API requests and responses.

mod action;
mod error;
mod health;

pub use action::{ActionResponse, IndexNowRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
