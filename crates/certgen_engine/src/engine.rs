use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use certgen_logging::{certgen_debug, certgen_info};
use thiserror::Error;

use crate::{
    run_submission, CertificateService, ChannelEventSink, EngineEvent, EventSink,
    ReqwestService, ResultDownloader, Scheduler, ServiceError, ServiceSettings, StatusPoller,
    SubmissionId, SubmissionRequest, DEFAULT_OUTPUT_FILENAME,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub service: ServiceSettings,
    pub download_dir: PathBuf,
    pub output_filename: String,
    pub poll_interval: Duration,
    pub dialog_delay: Duration,
}

impl EngineSettings {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            download_dir,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            poll_interval: Duration::from_millis(1000),
            dialog_delay: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ServiceError),
}

enum EngineCommand {
    Submit {
        submission_id: SubmissionId,
        request: SubmissionRequest,
    },
    ScheduleSuccessDialog {
        submission_id: SubmissionId,
    },
    Shutdown,
}

/// Owns the background runtime thread. The status poller starts with the
/// handle and stops when it is shut down or dropped, together with any
/// pending dialog timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let service = ReqwestService::new(settings.service.clone())?;
        Self::with_service(settings, Arc::new(service))
    }

    pub fn with_service(
        settings: EngineSettings,
        service: Arc<dyn CertificateService>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();

        let worker = thread::Builder::new()
            .name("certgen-engine".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run_worker(runtime, settings, service, cmd_rx, event_tx);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(EngineError::Runtime(err)),
            Err(_) => {
                return Err(EngineError::Runtime(io::Error::other(
                    "engine thread exited during startup",
                )))
            }
        }

        Ok(Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn submit(&self, submission_id: SubmissionId, request: SubmissionRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            submission_id,
            request,
        });
    }

    pub fn schedule_success_dialog(&self, submission_id: SubmissionId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleSuccessDialog { submission_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// False once the worker thread is gone; no further events will arrive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Cancels the poller and pending timers and waits for the worker thread.
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.cmd_tx.send(EngineCommand::Shutdown);
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    runtime: tokio::runtime::Runtime,
    settings: EngineSettings,
    service: Arc<dyn CertificateService>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let scheduler = Scheduler::new(runtime.handle().clone());
    let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
    let downloader = ResultDownloader::new(settings.download_dir.clone());
    let _poller = StatusPoller::start(
        &scheduler,
        service.clone(),
        settings.poll_interval,
        sink.clone(),
    );

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Submit {
                submission_id,
                request,
            } => {
                let service = service.clone();
                let sink = sink.clone();
                let downloader = downloader.clone();
                let filename = settings.output_filename.clone();
                runtime.spawn(async move {
                    let result =
                        run_submission(service.as_ref(), &downloader, &filename, request).await;
                    sink.emit(EngineEvent::SubmissionCompleted {
                        submission_id,
                        result: result.map_err(|err| err.kind),
                    });
                });
            }
            EngineCommand::ScheduleSuccessDialog { submission_id } => {
                certgen_debug!(
                    "Success dialog for submission {} due in {:?}",
                    submission_id,
                    settings.dialog_delay
                );
                let sink = sink.clone();
                scheduler.once(settings.dialog_delay, async move {
                    sink.emit(EngineEvent::SuccessDialogDue { submission_id });
                });
            }
            EngineCommand::Shutdown => break,
        }
    }

    scheduler.cancel_all();
    certgen_info!("Status poller stopped");
    runtime.shutdown_timeout(Duration::from_secs(1));
}
