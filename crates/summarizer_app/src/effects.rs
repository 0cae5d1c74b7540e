use std::time::Duration;

use summarizer_core::{ArticleSummary, Effect, Msg, SubmissionError};
use summarizer_engine::{EngineEvent, EngineHandle, FailureKind, RequestError, SummaryPayload};
use summarizer_logging::app_info;

/// Executes core effects on the engine and turns engine events back into messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendSummaryRequest { submission_id, url } => {
                    app_info!(
                        "SendSummaryRequest submission_id={} url_len={} url={}",
                        submission_id,
                        url.as_str().len(),
                        url
                    );
                    self.engine.submit(submission_id, url.into_string());
                }
            }
        }
    }

    pub(crate) fn try_next(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }

    pub(crate) fn next_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }

    pub(crate) fn engine_stopped(&self) -> bool {
        self.engine.is_stopped()
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmissionCompleted {
            submission_id,
            result,
        } => Msg::SubmissionFinished {
            submission_id,
            outcome: result.map(map_payload).map_err(map_failure),
        },
    }
}

fn map_payload(payload: SummaryPayload) -> ArticleSummary {
    ArticleSummary {
        content: payload.content,
        summary: payload.summary,
    }
}

pub(crate) fn map_failure(err: RequestError) -> SubmissionError {
    match err.kind {
        FailureKind::HttpStatus(status) => SubmissionError::HttpStatus { status },
        FailureKind::MalformedBody | FailureKind::TooLarge { .. } => {
            SubmissionError::MalformedBody {
                message: err.to_string(),
            }
        }
        FailureKind::InvalidEndpoint | FailureKind::Timeout | FailureKind::Network => {
            SubmissionError::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_error(kind: FailureKind, message: &str) -> RequestError {
        RequestError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn status_failures_keep_the_code() {
        assert_eq!(
            map_failure(request_error(FailureKind::HttpStatus(502), "502 Bad Gateway")),
            SubmissionError::HttpStatus { status: 502 }
        );
    }

    #[test]
    fn timeouts_and_network_errors_are_transport() {
        for kind in [
            FailureKind::Timeout,
            FailureKind::Network,
            FailureKind::InvalidEndpoint,
        ] {
            assert!(matches!(
                map_failure(request_error(kind, "boom")),
                SubmissionError::Transport { .. }
            ));
        }
    }

    #[test]
    fn oversize_and_unparseable_bodies_are_malformed() {
        let err = map_failure(request_error(
            FailureKind::TooLarge {
                max_bytes: 10,
                actual: Some(11),
            },
            "response too large",
        ));
        assert!(matches!(err, SubmissionError::MalformedBody { .. }));

        let err = map_failure(request_error(FailureKind::MalformedBody, "expected value"));
        assert_eq!(
            err,
            SubmissionError::MalformedBody {
                message: "malformed response body: expected value".to_string()
            }
        );
    }
}
