//! Certgen engine: HTTP service, timers and effect execution.
mod download;
mod engine;
mod poller;
mod schedule;
mod service;
mod sink;
mod submit;
mod types;

pub use download::{ensure_output_dir, ResultDownloader, PersistError, DEFAULT_OUTPUT_FILENAME};
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use poller::StatusPoller;
pub use schedule::{ScheduledTask, Scheduler};
pub use service::{CertificateService, ReqwestService, ServiceSettings, DEFAULT_SERVICE_URL};
pub use sink::{ChannelEventSink, EventSink};
pub use submit::{load_generate_form, run_submission};
pub use types::{
    EngineEvent, FailureKind, FilePart, GenerateForm, ServiceError, SubmissionId,
    SubmissionOutcome, SubmissionRequest,
};
