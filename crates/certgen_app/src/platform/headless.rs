//! One-shot submission without the terminal form.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use certgen_core::{FileField, Msg, SelectedFile, SubmissionState, TextField, DIALOG_BODY};
use certgen_logging::{certgen_error, certgen_info};

use crate::platform::app::Controller;

const WAIT_STEP: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default)]
pub struct SubmitInputs {
    pub ms6: Option<PathBuf>,
    pub bms: Option<PathBuf>,
    pub year: String,
    pub course_name: String,
    pub semester: String,
}

impl SubmitInputs {
    fn into_msgs(self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        for (field, path) in [(FileField::Ms6, self.ms6), (FileField::Bms, self.bms)] {
            if let Some(path) = path {
                msgs.push(Msg::FileSelected {
                    field,
                    file: SelectedFile::new(path),
                });
            }
        }
        for (field, value) in [
            (TextField::Year, self.year),
            (TextField::CourseName, self.course_name),
            (TextField::Semester, self.semester),
        ] {
            msgs.push(Msg::TextChanged { field, value });
        }
        msgs.push(Msg::SubmitClicked);
        msgs
    }
}

/// Fills the form, submits it and waits for the success dialog.
///
/// Returns `Ok(false)` when the submission failed and the form came back.
pub fn run(mut controller: Controller, inputs: SubmitInputs) -> Result<bool> {
    for msg in inputs.into_msgs() {
        controller.dispatch(msg);
    }
    let succeeded = wait_for_result(&mut controller);
    controller.shutdown();
    Ok(succeeded)
}

fn wait_for_result(controller: &mut Controller) -> bool {
    let mut last_status = String::new();
    loop {
        controller.wait_and_pump(WAIT_STEP);
        let view = controller.view();

        if view.status_message != last_status {
            certgen_info!("Status: {}", view.status_message);
            last_status = view.status_message.clone();
        }

        if view.dialog.is_some() {
            println!("{DIALOG_BODY}");
            if let Some(Ok(path)) = controller.last_outcome() {
                println!("{}", path.display());
            }
            return true;
        }

        if view.submission == SubmissionState::Idle {
            if let Some(Err(kind)) = controller.last_outcome() {
                certgen_error!("Certificate generation failed: {}", kind);
                return false;
            }
        }

        if !controller.engine_running() {
            certgen_error!("Engine stopped before the submission finished");
            return false;
        }
    }
}
