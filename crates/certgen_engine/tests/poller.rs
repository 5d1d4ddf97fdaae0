use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use certgen_engine::{
    CertificateService, EngineEvent, EventSink, FailureKind, GenerateForm, ReqwestService,
    Scheduler, ServiceError, ServiceSettings, StatusPoller,
};
use tokio::runtime::Handle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn statuses(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::StatusUpdated(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Answers status calls from a script; fails once the script runs out.
struct ScriptedService {
    replies: Mutex<Vec<Result<String, FailureKind>>>,
}

impl ScriptedService {
    fn new(mut replies: Vec<Result<String, FailureKind>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
        }
    }
}

#[async_trait]
impl CertificateService for ScriptedService {
    async fn status(&self) -> Result<String, ServiceError> {
        let next = self.replies.lock().unwrap().pop();
        match next {
            Some(Ok(message)) => Ok(message),
            Some(Err(kind)) => Err(ServiceError {
                kind,
                message: "scripted".to_string(),
            }),
            None => Err(ServiceError {
                kind: FailureKind::Network,
                message: "script exhausted".to_string(),
            }),
        }
    }

    async fn generate(&self, _form: GenerateForm) -> Result<Bytes, ServiceError> {
        unreachable!("poller never generates")
    }

    async fn delete_files(&self) -> Result<(), ServiceError> {
        unreachable!("poller never deletes")
    }
}

/// Never answers within a test; tracks how many status calls are pending.
#[derive(Default)]
struct HangingService {
    pending: AtomicUsize,
    peak: AtomicUsize,
}

struct Pending<'a>(&'a AtomicUsize);

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CertificateService for HangingService {
    async fn status(&self) -> Result<String, ServiceError> {
        let now = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _pending = Pending(&self.pending);
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }

    async fn generate(&self, _form: GenerateForm) -> Result<Bytes, ServiceError> {
        unreachable!("poller never generates")
    }

    async fn delete_files(&self) -> Result<(), ServiceError> {
        unreachable!("poller never deletes")
    }
}

#[tokio::test]
async fn poll_once_forwards_message() {
    let service = ScriptedService::new(vec![Ok("Generating PDF file...".to_string())]);
    let sink = TestSink::default();
    let failing = AtomicBool::new(false);

    StatusPoller::poll_once(&service, &sink, &failing, Duration::from_secs(1)).await;

    assert_eq!(sink.statuses(), vec!["Generating PDF file...".to_string()]);
}

#[tokio::test]
async fn poll_once_swallows_errors() {
    let service = ScriptedService::new(vec![Err(FailureKind::HttpStatus(500))]);
    let sink = TestSink::default();
    let failing = AtomicBool::new(false);

    StatusPoller::poll_once(&service, &sink, &failing, Duration::from_secs(1)).await;

    assert!(sink.statuses().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_ticks_do_not_stop_polling() {
    let service = Arc::new(ScriptedService::new(vec![
        Err(FailureKind::Network),
        Err(FailureKind::MalformedBody),
        Ok("Completed".to_string()),
    ]));
    let sink = Arc::new(TestSink::default());
    let scheduler = Scheduler::new(Handle::current());

    let task = StatusPoller::start(
        &scheduler,
        service,
        Duration::from_secs(1),
        sink.clone(),
    );
    tokio::time::sleep(Duration::from_millis(3500)).await;
    task.cancel();

    assert_eq!(sink.statuses(), vec!["Completed".to_string()]);
}

#[tokio::test]
async fn status_from_service_shows_within_one_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"{"message":"Processing row 12"}"#,
                "application/json",
            ),
        )
        .mount(&server)
        .await;

    let service = Arc::new(
        ReqwestService::new(ServiceSettings {
            base_url: server.uri(),
            ..ServiceSettings::default()
        })
        .expect("service"),
    );
    let sink = Arc::new(TestSink::default());
    let scheduler = Scheduler::new(Handle::current());

    let _task = StatusPoller::start(
        &scheduler,
        service,
        Duration::from_millis(100),
        sink.clone(),
    );
    tokio::time::sleep(Duration::from_millis(350)).await;
    scheduler.cancel_all();

    let statuses = sink.statuses();
    assert!(statuses.len() >= 2, "got {statuses:?}");
    assert!(statuses.iter().all(|m| m == "Processing row 12"));
}

#[tokio::test(start_paused = true)]
async fn slow_status_calls_do_not_pile_up() {
    let service = Arc::new(HangingService::default());
    let sink = Arc::new(TestSink::default());
    let scheduler = Scheduler::new(Handle::current());

    let _task = StatusPoller::start(
        &scheduler,
        service.clone(),
        Duration::from_millis(100),
        sink.clone(),
    );
    tokio::time::sleep(Duration::from_millis(1550)).await;

    assert!(service.peak.load(Ordering::SeqCst) <= 2);
    assert!(service.pending.load(Ordering::SeqCst) <= 2);
    assert!(sink.statuses().is_empty());
    scheduler.cancel_all();
}

#[tokio::test(start_paused = true)]
async fn poll_once_gives_up_after_timeout() {
    let service = HangingService::default();
    let sink = TestSink::default();
    let failing = AtomicBool::new(false);

    StatusPoller::poll_once(&service, &sink, &failing, Duration::from_millis(100)).await;

    assert_eq!(service.pending.load(Ordering::SeqCst), 0);
    assert!(failing.load(Ordering::SeqCst));
    assert!(sink.statuses().is_empty());
}
