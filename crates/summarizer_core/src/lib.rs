//! Summarizer core: pure submission state machine, URL validation and view-model helpers.
mod effect;
mod error;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use error::{SubmissionError, SubmitError};
pub use msg::Msg;
pub use state::{AppState, ArticleSummary, SubmissionId, SubmissionState};
pub use update::{submit, update};
pub use validate::{validate_url, ValidatedUrl, ValidationError, MAX_URL_LEN};
pub use view_model::{
    StatusTag, SubmissionView, EMPTY_PLACEHOLDER, SUBMIT_LABEL, SUBMIT_LABEL_PENDING,
};
