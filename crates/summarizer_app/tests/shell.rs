use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use summarizer_app::{run_batch, run_interactive, SubmissionController};
use summarizer_engine::{EngineHandle, FailureKind, RequestError, SummaryClient, SummaryPayload};

const WAIT: Duration = Duration::from_secs(5);

/// Summarizes any URL except those containing "broken", which fail with a 500.
#[derive(Default)]
struct FakeService {
    requests: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl SummaryClient for FakeService {
    async fn summarize(&self, url: &str) -> Result<SummaryPayload, RequestError> {
        self.requests.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return Err(RequestError {
                kind: FailureKind::HttpStatus(500),
                message: "500 Internal Server Error".to_string(),
            });
        }
        Ok(SummaryPayload {
            content: format!("Article at {url}"),
            summary: "Three key points.".to_string(),
        })
    }
}

fn controller() -> (SubmissionController, Arc<FakeService>) {
    let service = Arc::new(FakeService::default());
    let engine = EngineHandle::with_client(service.clone()).expect("engine");
    (SubmissionController::with_engine(engine), service)
}

#[test]
fn interactive_session_renders_each_submission() {
    summarizer_logging::initialize_for_tests();
    let (mut controller, service) = controller();
    let input = Cursor::new("not a url\nhttps://example.com/a\n:q\nhttps://example.com/never\n");
    let mut output = Vec::new();

    run_interactive(&mut controller, input, &mut output, WAIT).expect("session");
    let text = String::from_utf8(output).expect("utf8");

    assert!(text.starts_with("Read Faster with Text Summarization\n"));
    assert!(text.contains("  ! must be a valid URL"));
    assert!(text.contains("Loading..."));
    assert!(text.contains("Content\n=======\nArticle at https://example.com/a"));
    assert!(text.contains("Summary\n=======\nThree key points."));
    assert_eq!(
        service.requests.lock().unwrap().as_slice(),
        ["https://example.com/a".to_string()]
    );
}

#[test]
fn batch_succeeds_when_every_url_summarizes() {
    summarizer_logging::initialize_for_tests();
    let (mut controller, _service) = controller();
    let urls = vec![
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
    ];
    let mut output = Vec::new();

    run_batch(&mut controller, &urls, &mut output, WAIT).expect("batch");
    let text = String::from_utf8(output).expect("utf8");
    assert!(text.contains("Article at https://example.com/a"));
    assert!(text.contains("Article at https://example.com/b"));
}

#[test]
fn batch_reports_rejections_and_failures() {
    summarizer_logging::initialize_for_tests();
    let (mut controller, service) = controller();
    let urls = vec![
        "http://example.com/plain".to_string(),
        "https://example.com/broken".to_string(),
        "https://example.com/fine".to_string(),
    ];
    let mut output = Vec::new();

    let err = run_batch(&mut controller, &urls, &mut output, WAIT).unwrap_err();
    assert_eq!(err.to_string(), "2 of 3 submissions failed");

    let text = String::from_utf8(output).expect("utf8");
    assert!(text.contains("http://example.com/plain: must start with https://"));
    assert!(text.contains("Error: failed to send request: server responded with status 500"));
    assert_eq!(service.requests.lock().unwrap().len(), 2);
}
