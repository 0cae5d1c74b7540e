//! Summarizer engine: HTTP client for the summarization service and effect execution.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, ReqwestSummaryClient, SummaryClient, EXTRACT_PATH};
pub use engine::{EngineError, EngineHandle};
pub use types::{EngineEvent, FailureKind, RequestError, SubmissionId, SummaryPayload};
