//! HTML bodies for outbound emails (askama, auto-escaped).

use askama::Template;

use crate::models::{AnalysisSubmission, ContactSubmission};

#[derive(Template)]
#[template(path = "emails/contact_internal.html")]
struct ContactInternalTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "emails/contact_confirmation.html")]
struct ContactConfirmationTemplate<'a> {
    name: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "emails/analysis_started.html")]
struct AnalysisStartedTemplate<'a> {
    email: &'a str,
    url: &'a str,
}

pub fn contact_internal(contact: &ContactSubmission) -> askama::Result<String> {
    ContactInternalTemplate {
        name: &contact.name,
        email: &contact.email,
        subject: &contact.subject,
        message: &contact.message,
    }
    .render()
}

pub fn contact_confirmation(contact: &ContactSubmission) -> askama::Result<String> {
    ContactConfirmationTemplate {
        name: &contact.name,
        subject: &contact.subject,
        message: &contact.message,
    }
    .render()
}

pub fn analysis_started(analysis: &AnalysisSubmission) -> askama::Result<String> {
    AnalysisStartedTemplate {
        email: &analysis.email,
        url: &analysis.url,
    }
    .render()
}
