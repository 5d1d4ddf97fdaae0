use std::path::{Path, PathBuf};
use std::time::Duration;

use certgen_core::{Effect, FormInputs, Msg, SelectedFile, SubmissionResult};
use certgen_engine::{EngineEvent, EngineHandle, FailureKind, SubmissionRequest};
use certgen_logging::{certgen_info, certgen_warn};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    last_outcome: Option<Result<PathBuf, FailureKind>>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            last_outcome: None,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission_id,
                    inputs,
                } => {
                    certgen_info!("Submit submission_id={}", submission_id);
                    self.engine.submit(submission_id, to_request(inputs));
                }
                Effect::ScheduleSuccessDialog { submission_id } => {
                    self.engine.schedule_success_dialog(submission_id);
                }
            }
        }
    }

    /// Everything the engine has reported so far, without blocking.
    pub fn drain(&mut self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(self.map_event(event));
        }
        msgs
    }

    /// Blocks up to `timeout` for one engine event.
    pub fn wait(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(self.map_event(event))
    }

    /// Where the most recent submission saved its document, or why it failed.
    pub fn last_outcome(&self) -> Option<Result<&Path, &FailureKind>> {
        self.last_outcome
            .as_ref()
            .map(|outcome| outcome.as_ref().map(PathBuf::as_path))
    }

    pub fn engine_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    fn map_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::StatusUpdated(message) => Msg::StatusReceived(message),
            EngineEvent::SubmissionCompleted {
                submission_id,
                result,
            } => {
                let result = match result {
                    Ok(outcome) => {
                        certgen_info!(
                            "Submission {} saved {} bytes to {}",
                            submission_id,
                            outcome.bytes_written,
                            outcome.saved_to.display()
                        );
                        self.last_outcome = Some(Ok(outcome.saved_to));
                        SubmissionResult::Downloaded
                    }
                    Err(failure_kind) => {
                        certgen_warn!("Submission {} failed: {}", submission_id, failure_kind);
                        self.last_outcome = Some(Err(failure_kind));
                        SubmissionResult::Failed
                    }
                };
                Msg::SubmissionSettled {
                    submission_id,
                    result,
                }
            }
            EngineEvent::SuccessDialogDue { submission_id } => {
                Msg::SuccessDialogDue { submission_id }
            }
        }
    }
}

fn to_request(inputs: FormInputs) -> SubmissionRequest {
    SubmissionRequest {
        ms6_file: inputs.ms6_file.as_ref().map(selected_path),
        bms_file: inputs.bms_file.as_ref().map(selected_path),
        year: inputs.year,
        course_name: inputs.course_name,
        semester: inputs.semester,
    }
}

fn selected_path(file: &SelectedFile) -> PathBuf {
    file.path().to_path_buf()
}
