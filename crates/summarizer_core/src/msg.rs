#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted the form; carries the raw text of the URL field.
    SubmitRequested(String),
    /// The summarization request for a submission resolved.
    SubmissionFinished {
        submission_id: crate::SubmissionId,
        outcome: Result<crate::ArticleSummary, crate::SubmissionError>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
