//! Transactional email: provider abstraction, backends and submission dispatch.

mod log_provider;
mod provider;
mod resend_provider;
mod templates;

pub mod dispatch_service;

pub use dispatch_service::{
    DispatchConfig, DispatchError, DispatchReport, DispatchService, SendStep,
};
pub use log_provider::LogProvider;
pub use provider::{EmailMessage, EmailProvider, ProviderError, SendReceipt};
pub use resend_provider::ResendProvider;
