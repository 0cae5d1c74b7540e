use crate::ArticleSummary;

pub const SUBMIT_LABEL: &str = "Summarize";
pub const SUBMIT_LABEL_PENDING: &str = "Loading...";
pub const EMPTY_PLACEHOLDER: &str = "Please insert the valid URL first!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTag {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Everything the presentation layer needs to draw the form and its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionView {
    pub input: String,
    pub status: StatusTag,
    /// True while a request is in flight; input and submit should be disabled.
    pub in_progress: bool,
    pub pending_url: Option<String>,
    pub field_error: Option<String>,
    pub result: Option<ArticleSummary>,
    pub error_message: Option<String>,
    pub submit_label: &'static str,
    pub placeholder: Option<&'static str>,
}
