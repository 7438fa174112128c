//! Turns a submission into the emails it routes to.
//!
//! Contact: internal notification, then a confirmation to the submitter.
//! Analysis: one email to the submitter with the internal inboxes copied.
//! Sends are sequential and the first failure aborts the rest.

use super::provider::{EmailMessage, EmailProvider, ProviderError, SendReceipt};
use super::templates;
use crate::config::{ConfigError, EmailConfig};
use crate::models::{
    AnalysisSubmission, ContactSubmission, InvalidSubmission, Submission, SubmissionKind,
    SubmissionRequest,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const CONTACT_SUBJECT_PREFIX: &str = "Contact Form: ";
pub const CONFIRMATION_SUBJECT: &str = "We received your message";
pub const ANALYSIS_SUBJECT: &str = "Your AI Visibility Analysis Has Started";

/// Addresses injected at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub from: String,
    pub internal_recipients: Vec<String>,
}

impl From<&EmailConfig> for DispatchConfig {
    fn from(config: &EmailConfig) -> Self {
        Self {
            from: config.from.clone(),
            internal_recipients: config.internal_recipients.clone(),
        }
    }
}

/// Individual sends a submission can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStep {
    ContactInternal,
    ContactConfirmation,
    AnalysisStarted,
}

impl SendStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStep::ContactInternal => "contact_internal",
            SendStep::ContactConfirmation => "contact_confirmation",
            SendStep::AnalysisStarted => "analysis_started",
        }
    }
}

impl fmt::Display for SendStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every send of the submission was accepted by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub kind: SubmissionKind,
    pub receipts: Vec<SendReceipt>,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected before any provider call
    #[error("Invalid submission: {field} {reason}")]
    Validation { field: String, reason: String },

    /// The send at `step` failed; later steps were not attempted
    #[error("Failed to send {step} email: {source}")]
    Provider {
        step: SendStep,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to render {step} email: {message}")]
    Template { step: SendStep, message: String },
}

impl From<InvalidSubmission> for DispatchError {
    fn from(err: InvalidSubmission) -> Self {
        DispatchError::Validation {
            field: err.field,
            reason: err.reason,
        }
    }
}

#[derive(Clone)]
pub struct DispatchService {
    provider: Arc<dyn EmailProvider>,
    config: Arc<DispatchConfig>,
}

impl DispatchService {
    /// Fails fast on a blank sender or an empty internal recipient list.
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        config: DispatchConfig,
    ) -> Result<Self, ConfigError> {
        if config.from.trim().is_empty() {
            return Err(ConfigError::validation("email.from", "Sender address cannot be empty"));
        }
        if config.internal_recipients.is_empty() {
            return Err(ConfigError::validation(
                "email.internal_recipients",
                "At least one internal recipient is required",
            ));
        }
        if config.internal_recipients.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::validation(
                "email.internal_recipients",
                "Internal recipients cannot be blank",
            ));
        }

        Ok(Self {
            provider,
            config: Arc::new(config),
        })
    }

    pub fn provider(&self) -> &Arc<dyn EmailProvider> {
        &self.provider
    }

    /// Validate the request and perform its sends in order.
    pub async fn dispatch(
        &self,
        request: SubmissionRequest,
    ) -> Result<DispatchReport, DispatchError> {
        let submission = Submission::try_from(request).inspect_err(|e| {
            tracing::info!(field = %e.field, reason = %e.reason, "Submission rejected");
        })?;
        let kind = submission.kind();

        let receipts = match &submission {
            Submission::Contact(contact) => self.dispatch_contact(contact).await?,
            Submission::Analysis(analysis) => vec![self.dispatch_analysis(analysis).await?],
        };

        tracing::info!(kind = %kind, sends = receipts.len(), "Submission dispatched");
        Ok(DispatchReport { kind, receipts })
    }

    async fn dispatch_contact(
        &self,
        contact: &ContactSubmission,
    ) -> Result<Vec<SendReceipt>, DispatchError> {
        let internal = self.send_internal(contact).await?;

        // The internal notification is already out; the caller only sees a failure
        let confirmation = self.send_confirmation(contact).await.inspect_err(|e| {
            tracing::warn!(
                internal_message_id = ?internal.message_id,
                error = %e,
                "Contact confirmation failed after internal notification was accepted"
            );
        })?;

        Ok(vec![internal, confirmation])
    }

    async fn send_internal(
        &self,
        contact: &ContactSubmission,
    ) -> Result<SendReceipt, DispatchError> {
        let step = SendStep::ContactInternal;
        let html = templates::contact_internal(contact).map_err(|e| render_error(step, e))?;

        let message = EmailMessage {
            from: self.config.from.clone(),
            to: self.config.internal_recipients.clone(),
            reply_to: Some(contact.email.clone()),
            subject: format!("{}{}", CONTACT_SUBJECT_PREFIX, contact.subject),
            html,
        };
        self.send(SubmissionKind::Contact, step, &message).await
    }

    async fn send_confirmation(
        &self,
        contact: &ContactSubmission,
    ) -> Result<SendReceipt, DispatchError> {
        let step = SendStep::ContactConfirmation;
        let html = templates::contact_confirmation(contact).map_err(|e| render_error(step, e))?;

        let message = EmailMessage {
            from: self.config.from.clone(),
            to: vec![contact.email.clone()],
            reply_to: None,
            subject: CONFIRMATION_SUBJECT.to_string(),
            html,
        };
        self.send(SubmissionKind::Contact, step, &message).await
    }

    async fn dispatch_analysis(
        &self,
        analysis: &AnalysisSubmission,
    ) -> Result<SendReceipt, DispatchError> {
        let step = SendStep::AnalysisStarted;
        let html = templates::analysis_started(analysis).map_err(|e| render_error(step, e))?;

        let mut to = Vec::with_capacity(1 + self.config.internal_recipients.len());
        to.push(analysis.email.clone());
        to.extend(self.config.internal_recipients.iter().cloned());

        let message = EmailMessage {
            from: self.config.from.clone(),
            to,
            reply_to: None,
            subject: ANALYSIS_SUBJECT.to_string(),
            html,
        };
        self.send(SubmissionKind::Analysis, step, &message).await
    }

    async fn send(
        &self,
        kind: SubmissionKind,
        step: SendStep,
        message: &EmailMessage,
    ) -> Result<SendReceipt, DispatchError> {
        let provider = self.provider.name();

        match self.provider.send(message).await {
            Ok(receipt) => {
                tracing::info!(
                    kind = %kind,
                    step = %step,
                    provider,
                    message_id = ?receipt.message_id,
                    duration_ms = receipt.duration_ms,
                    "Email accepted"
                );
                Ok(receipt)
            }
            Err(source) => {
                tracing::error!(kind = %kind, step = %step, provider, error = %source, "Email send failed");
                Err(DispatchError::Provider { step, source })
            }
        }
    }
}

fn render_error(step: SendStep, err: askama::Error) -> DispatchError {
    DispatchError::Template {
        step,
        message: err.to_string(),
    }
}
