use crate::{SubmissionId, ValidatedUrl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the validated URL to the summarization service.
    SendSummaryRequest {
        submission_id: SubmissionId,
        url: ValidatedUrl,
    },
}
