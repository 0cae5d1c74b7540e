use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use summarizer_app::SubmissionController;
use summarizer_core::{
    ArticleSummary, StatusTag, SubmissionError, SubmissionState, SubmitError, ValidationError,
};
use summarizer_engine::{EngineHandle, FailureKind, RequestError, SummaryClient, SummaryPayload};
use tokio::sync::Semaphore;

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(summarizer_logging::initialize_for_tests);
}

type Reply = Result<SummaryPayload, RequestError>;

/// Answers from a script, one reply per request, once the gate lets it through.
struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<String>>,
    gate: Arc<Semaphore>,
}

impl ScriptedClient {
    fn open(replies: Vec<Reply>) -> Arc<Self> {
        Self::gated(replies, Semaphore::MAX_PERMITS)
    }

    fn gated(replies: Vec<Reply>, permits: usize) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: Arc::new(Semaphore::new(permits)),
        })
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SummaryClient for ScriptedClient {
    async fn summarize(&self, url: &str) -> Result<SummaryPayload, RequestError> {
        self.requests.lock().unwrap().push(url.to_string());
        let permit = self.gate.acquire().await.expect("gate open");
        permit.forget();
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted reply")
    }
}

fn payload(content: &str, summary: &str) -> Reply {
    Ok(SummaryPayload {
        content: content.to_string(),
        summary: summary.to_string(),
    })
}

fn failure(kind: FailureKind) -> Reply {
    Err(RequestError {
        kind,
        message: "scripted".to_string(),
    })
}

fn controller_with(client: Arc<ScriptedClient>) -> SubmissionController {
    SubmissionController::with_engine(EngineHandle::with_client(client).expect("engine"))
}

#[test]
fn valid_submit_is_pending_before_the_response_arrives() {
    init_logging();
    let client = ScriptedClient::gated(vec![payload("A", "B")], 0);
    let mut controller = controller_with(client.clone());

    let id = controller.submit("https://example.com/a").expect("accepted");
    assert_eq!(id, 1);
    assert!(controller.submission().is_pending());
    let view = controller.view();
    assert!(view.in_progress);
    assert_eq!(view.submit_label, "Loading...");

    // Nothing can have resolved while the gate is closed.
    assert_eq!(controller.pump(), 0);
    assert!(controller.submission().is_pending());

    client.gate.add_permits(1);
    assert!(controller.wait_until_settled(WAIT));
    assert_eq!(
        controller.submission(),
        &SubmissionState::Succeeded(ArticleSummary {
            content: "A".to_string(),
            summary: "B".to_string(),
        })
    );
    assert!(controller.completed_at().is_some());
    assert_eq!(client.requests(), vec!["https://example.com/a".to_string()]);
}

#[test]
fn invalid_input_never_reaches_the_network() {
    init_logging();
    let client = ScriptedClient::open(Vec::new());
    let mut controller = controller_with(client.clone());

    let err = controller.submit("not a url").unwrap_err();
    assert_eq!(err, SubmitError::Invalid(ValidationError::Syntax));
    assert_eq!(controller.submission(), &SubmissionState::Idle);
    assert_eq!(
        controller.view().field_error.as_deref(),
        Some("must be a valid URL")
    );

    let err = controller.submit("http://example.com/a").unwrap_err();
    assert_eq!(err, SubmitError::Invalid(ValidationError::SchemePolicy));
    assert_eq!(err.to_string(), "must start with https://");

    assert!(controller.wait_until_settled(Duration::from_millis(50)));
    assert!(client.requests().is_empty());
}

#[test]
fn submit_while_pending_is_busy() {
    init_logging();
    let client = ScriptedClient::gated(vec![payload("A", "B")], 0);
    let mut controller = controller_with(client.clone());

    controller.submit("https://example.com/a").expect("accepted");
    assert_eq!(
        controller.submit("https://example.com/b"),
        Err(SubmitError::Busy)
    );

    client.gate.add_permits(1);
    assert!(controller.wait_until_settled(WAIT));
    assert_eq!(client.requests(), vec!["https://example.com/a".to_string()]);
}

#[test]
fn server_error_replaces_previous_result() {
    init_logging();
    let client = ScriptedClient::open(vec![
        payload("A", "B"),
        failure(FailureKind::HttpStatus(500)),
    ]);
    let mut controller = controller_with(client);

    controller.submit("https://example.com/a").expect("accepted");
    assert!(controller.wait_until_settled(WAIT));
    assert_eq!(controller.view().status, StatusTag::Succeeded);

    controller.submit("https://example.com/b").expect("accepted");
    assert!(controller.view().result.is_none());
    assert!(controller.wait_until_settled(WAIT));

    assert_eq!(
        controller.submission(),
        &SubmissionState::Failed(SubmissionError::HttpStatus { status: 500 })
    );
    assert!(controller.view().result.is_none());
}

#[test]
fn repeated_submission_reflects_only_the_latest_response() {
    init_logging();
    let client = ScriptedClient::open(vec![
        failure(FailureKind::Network),
        payload("second", "second"),
    ]);
    let mut controller = controller_with(client.clone());

    for _ in 0..2 {
        controller.submit("https://example.com/a").expect("accepted");
        assert!(controller.wait_until_settled(WAIT));
    }

    assert_eq!(
        controller.view().result,
        Some(ArticleSummary {
            content: "second".to_string(),
            summary: "second".to_string(),
        })
    );
    assert!(controller.view().error_message.is_none());
    assert_eq!(client.requests().len(), 2);
}

#[test]
fn malformed_and_transport_failures_end_failed() {
    init_logging();
    let client = ScriptedClient::open(vec![
        failure(FailureKind::MalformedBody),
        failure(FailureKind::Timeout),
    ]);
    let mut controller = controller_with(client);

    controller.submit("https://example.com/a").expect("accepted");
    assert!(controller.wait_until_settled(WAIT));
    assert!(matches!(
        controller.submission(),
        SubmissionState::Failed(SubmissionError::MalformedBody { .. })
    ));

    controller.submit("https://example.com/a").expect("accepted");
    assert!(controller.wait_until_settled(WAIT));
    assert!(matches!(
        controller.submission(),
        SubmissionState::Failed(SubmissionError::Transport { .. })
    ));
    assert!(!controller.view().in_progress);
}

#[test]
fn subscribers_see_each_visible_change() {
    init_logging();
    let client = ScriptedClient::open(vec![payload("A", "B")]);
    let mut controller = controller_with(client);
    let updates = controller.subscribe();

    controller.submit("https://example.com/a").expect("accepted");
    assert!(controller.wait_until_settled(WAIT));

    let statuses: Vec<_> = updates.try_iter().map(|view| view.status).collect();
    assert_eq!(statuses, vec![StatusTag::Pending, StatusTag::Succeeded]);
}

#[test]
fn dropped_subscribers_are_pruned() {
    init_logging();
    let client = ScriptedClient::open(Vec::new());
    let mut controller = controller_with(client);
    drop(controller.subscribe());
    let live = controller.subscribe();

    controller.input_changed("https://example.com");
    assert_eq!(
        live.try_recv().map(|view| view.input).ok().as_deref(),
        Some("https://example.com")
    );
}

#[test]
fn wait_times_out_while_request_is_held() {
    init_logging();
    let client = ScriptedClient::gated(vec![payload("A", "B")], 0);
    let mut controller = controller_with(client.clone());

    controller.submit("https://example.com/a").expect("accepted");
    assert!(!controller.wait_until_settled(Duration::from_millis(30)));
    assert!(controller.submission().is_pending());

    client.gate.add_permits(1);
    assert!(controller.wait_until_settled(WAIT));
}

/// Panics on the first request, then answers normally.
#[derive(Default)]
struct FlakyClient {
    calls: Mutex<usize>,
}

#[async_trait::async_trait]
impl SummaryClient for FlakyClient {
    async fn summarize(&self, url: &str) -> Result<SummaryPayload, RequestError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if call == 1 {
            panic!("client failed on {url}");
        }
        payload("A", url)
    }
}

#[test]
fn panicking_client_settles_as_failed_and_allows_resubmit() {
    init_logging();
    let engine = EngineHandle::with_client(Arc::new(FlakyClient::default())).expect("engine");
    let mut controller = SubmissionController::with_engine(engine);

    controller.submit("https://example.com/a").expect("accepted");
    assert!(controller.wait_until_settled(WAIT));
    assert_eq!(
        controller.submission(),
        &SubmissionState::Failed(SubmissionError::Transport {
            message: "network error: request task failed".to_string(),
        })
    );
    assert_eq!(controller.view().status, StatusTag::Failed);

    assert_eq!(controller.submit("https://example.com/b"), Ok(2));
    assert!(controller.wait_until_settled(WAIT));
    assert_eq!(
        controller.submission().result().map(|s| s.summary.as_str()),
        Some("https://example.com/b")
    );
}
