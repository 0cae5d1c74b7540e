use crate::view_model::{
    StatusTag, SubmissionView, EMPTY_PLACEHOLDER, SUBMIT_LABEL, SUBMIT_LABEL_PENDING,
};
use crate::{validate_url, SubmissionError, SubmitError, ValidatedUrl, ValidationError};

pub type SubmissionId = u64;

/// Extracted article text and its generated summary, as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub content: String,
    pub summary: String,
}

/// Lifecycle of the (single) summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending {
        submission_id: SubmissionId,
        url: ValidatedUrl,
    },
    Succeeded(ArticleSummary),
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending { .. })
    }

    pub fn pending_id(&self) -> Option<SubmissionId> {
        match self {
            SubmissionState::Pending { submission_id, .. } => Some(*submission_id),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ArticleSummary> {
        match self {
            SubmissionState::Succeeded(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            SubmissionState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn tag(&self) -> StatusTag {
        match self {
            SubmissionState::Idle => StatusTag::Idle,
            SubmissionState::Pending { .. } => StatusTag::Pending,
            SubmissionState::Succeeded(_) => StatusTag::Succeeded,
            SubmissionState::Failed(_) => StatusTag::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    field_error: Option<ValidationError>,
    submission: SubmissionState,
    last_submission_id: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn field_error(&self) -> Option<&ValidationError> {
        self.field_error.as_ref()
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn view(&self) -> SubmissionView {
        let in_progress = self.submission.is_pending();
        let pending_url = match &self.submission {
            SubmissionState::Pending { url, .. } => Some(url.as_str().to_string()),
            _ => None,
        };
        let result = self.submission.result().cloned();
        let placeholder = if result.is_none() && !in_progress {
            Some(EMPTY_PLACEHOLDER)
        } else {
            None
        };

        SubmissionView {
            input: self.input.clone(),
            status: self.submission.tag(),
            in_progress,
            pending_url,
            field_error: self.field_error.as_ref().map(ToString::to_string),
            error_message: self.submission.error().map(ToString::to_string),
            result,
            submit_label: if in_progress {
                SUBMIT_LABEL_PENDING
            } else {
                SUBMIT_LABEL
            },
            placeholder,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input == text {
            return;
        }
        self.input = text;
        // Once an error is shown, keep it in sync with what the user is typing.
        if self.field_error.is_some() {
            self.field_error = validate_url(&self.input).err();
        }
        self.dirty = true;
    }

    /// Validate `raw` and, if accepted, move to `Pending` under a fresh id.
    ///
    /// A rejection leaves `submission` untouched.
    pub(crate) fn begin_submission(
        &mut self,
        raw: String,
    ) -> Result<(SubmissionId, ValidatedUrl), SubmitError> {
        if self.submission.is_pending() {
            return Err(SubmitError::Busy);
        }

        if self.input != raw {
            self.input = raw;
            self.dirty = true;
        }

        let url = match validate_url(&self.input) {
            Ok(url) => url,
            Err(err) => {
                self.field_error = Some(err.clone());
                self.dirty = true;
                return Err(err.into());
            }
        };

        self.field_error = None;
        self.last_submission_id += 1;
        let submission_id = self.last_submission_id;
        self.submission = SubmissionState::Pending {
            submission_id,
            url: url.clone(),
        };
        self.dirty = true;
        Ok((submission_id, url))
    }

    /// Apply the outcome of a request. Outcomes for anything other than the
    /// pending submission are dropped; returns whether the state changed.
    pub(crate) fn apply_outcome(
        &mut self,
        submission_id: SubmissionId,
        outcome: Result<ArticleSummary, SubmissionError>,
    ) -> bool {
        if self.submission.pending_id() != Some(submission_id) {
            return false;
        }
        self.submission = match outcome {
            Ok(summary) => SubmissionState::Succeeded(summary),
            Err(err) => SubmissionState::Failed(err),
        };
        self.dirty = true;
        true
    }
}
