use crate::{FormInputs, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the generate, download, cleanup sequence with a snapshot of the form.
    Submit {
        submission_id: SubmissionId,
        inputs: FormInputs,
    },
    /// Arm the one-shot timer that reveals the success dialog.
    ScheduleSuccessDialog { submission_id: SubmissionId },
}
