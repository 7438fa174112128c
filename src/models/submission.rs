//! Inbound form submissions.
//!
//! The wire body is loose (`SubmissionRequest`); dispatch only ever sees the
//! validated [`Submission`] union.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// Raw submission body as posted by the website
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRequest {
    /// `"contact"` for the contact form; absent or `"analysis"` for an analysis request
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SubmissionRequest {
    pub fn contact(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(SubmissionKind::Contact.as_str().to_string()),
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
            url: None,
        }
    }

    pub fn analysis(email: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Contact,
    Analysis,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Contact => "contact",
            SubmissionKind::Analysis => "analysis",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactSubmission {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub subject: String,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AnalysisSubmission {
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub url: String,
}

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Contact(ContactSubmission),
    Analysis(AnalysisSubmission),
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Submission::Contact(_) => SubmissionKind::Contact,
            Submission::Analysis(_) => SubmissionKind::Analysis,
        }
    }

    /// Submitter address, used as recipient or reply-to
    pub fn email(&self) -> &str {
        match self {
            Submission::Contact(c) => &c.email,
            Submission::Analysis(a) => &a.email,
        }
    }
}

/// Why a request could not become a [`Submission`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct InvalidSubmission {
    pub field: String,
    pub reason: String,
}

impl InvalidSubmission {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(field, "is required")
    }
}

impl From<ValidationErrors> for InvalidSubmission {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    InvalidSubmission::new(field.to_string(), reason)
                })
            })
            .unwrap_or_else(|| InvalidSubmission::new("body", "is invalid"))
    }
}

impl TryFrom<SubmissionRequest> for Submission {
    type Error = InvalidSubmission;

    fn try_from(request: SubmissionRequest) -> Result<Self, Self::Error> {
        let kind = match request.kind.as_deref() {
            None | Some("analysis") => SubmissionKind::Analysis,
            Some("contact") => SubmissionKind::Contact,
            Some(other) => {
                return Err(InvalidSubmission::new(
                    "kind",
                    format!("must be \"contact\" or \"analysis\", got \"{}\"", other),
                ));
            }
        };

        match kind {
            SubmissionKind::Contact => {
                let contact = ContactSubmission {
                    name: request.name.ok_or_else(|| InvalidSubmission::missing("name"))?,
                    email: request.email.ok_or_else(|| InvalidSubmission::missing("email"))?,
                    subject: request
                        .subject
                        .ok_or_else(|| InvalidSubmission::missing("subject"))?,
                    message: request
                        .message
                        .ok_or_else(|| InvalidSubmission::missing("message"))?,
                };
                contact.validate()?;
                Ok(Submission::Contact(contact))
            }
            SubmissionKind::Analysis => {
                let analysis = AnalysisSubmission {
                    email: request.email.ok_or_else(|| InvalidSubmission::missing("email"))?,
                    url: request.url.ok_or_else(|| InvalidSubmission::missing("url"))?,
                };
                analysis.validate()?;
                Ok(Submission::Analysis(analysis))
            }
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contact_request_parses() {
        let request = SubmissionRequest::contact("Ada", "ada@example.com", "Billing", "Hi");
        let submission = Submission::try_from(request).unwrap();

        assert_eq!(submission.kind(), SubmissionKind::Contact);
        assert_eq!(submission.email(), "ada@example.com");
    }

    #[test]
    fn test_missing_kind_means_analysis() {
        let request = SubmissionRequest::analysis("bob@example.com", "https://example.com");
        let submission = Submission::try_from(request).unwrap();

        assert_eq!(
            submission,
            Submission::Analysis(AnalysisSubmission {
                email: "bob@example.com".to_string(),
                url: "https://example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_type_alias_accepted() {
        let request: SubmissionRequest = serde_json::from_str(
            r#"{"type":"contact","name":"Ada","email":"a@x.io","subject":"S","message":"M"}"#,
        )
        .unwrap();
        assert_eq!(request.kind.as_deref(), Some("contact"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let request = SubmissionRequest {
            kind: Some("newsletter".to_string()),
            ..SubmissionRequest::analysis("a@x.io", "https://x.io")
        };
        let err = Submission::try_from(request).unwrap_err();
        assert_eq!(err.field, "kind");
    }

    #[test]
    fn test_missing_field_reported() {
        let mut request = SubmissionRequest::contact("Ada", "a@x.io", "S", "M");
        request.subject = None;

        let err = Submission::try_from(request).unwrap_err();
        assert_eq!(err, InvalidSubmission::missing("subject"));
        assert_eq!(err.to_string(), "subject is required");
    }

    #[test]
    fn test_contact_fields_ignored_for_analysis() {
        let mut request = SubmissionRequest::analysis("a@x.io", "https://x.io");
        request.name = Some(String::new());
        assert!(Submission::try_from(request).is_ok());
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let request = SubmissionRequest::analysis(" a@x.io ", "https://x.io");
        let submission = Submission::try_from(request).unwrap();
        assert_eq!(submission.email(), " a@x.io ");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let request: SubmissionRequest =
            serde_json::from_str(r#"{"email":"a@x.io","url":"https://x.io","utm":"ad"}"#).unwrap();
        assert!(Submission::try_from(request).is_ok());
    }

    fn non_blank() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9@.:/ ]{0,8}[a-zA-Z0-9][a-zA-Z0-9@.:/ ]{0,8}"
    }

    fn blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,4}"
    }

    proptest! {
        #[test]
        fn prop_non_blank_contact_is_valid(
            name in non_blank(),
            email in non_blank(),
            subject in non_blank(),
            message in non_blank(),
        ) {
            let request = SubmissionRequest::contact(&name, &email, &subject, &message);
            let submission = Submission::try_from(request).unwrap();
            prop_assert_eq!(
                submission,
                Submission::Contact(ContactSubmission { name, email, subject, message })
            );
        }

        #[test]
        fn prop_blank_field_names_the_field(
            field in 0usize..4,
            value in blank(),
        ) {
            let mut request = SubmissionRequest::contact("Ada", "a@x.io", "Billing", "Hello");
            let name = match field {
                0 => { request.name = Some(value); "name" }
                1 => { request.email = Some(value); "email" }
                2 => { request.subject = Some(value); "subject" }
                _ => { request.message = Some(value); "message" }
            };

            let err = Submission::try_from(request).unwrap_err();
            prop_assert_eq!(err.field, name);
        }

        #[test]
        fn prop_blank_analysis_rejected(email in blank(), url in non_blank()) {
            let request = SubmissionRequest::analysis(email, url);
            let err = Submission::try_from(request).unwrap_err();
            prop_assert_eq!(err.field, "email");
        }
    }
}
