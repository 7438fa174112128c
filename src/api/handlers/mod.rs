//! HTTP request handlers, one module per resource.

pub mod health;
pub mod indexnow;
pub mod notify;
