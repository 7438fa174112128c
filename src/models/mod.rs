mod submission;

pub use submission::{
    AnalysisSubmission, ContactSubmission, InvalidSubmission, Submission, SubmissionKind,
    SubmissionRequest,
};
