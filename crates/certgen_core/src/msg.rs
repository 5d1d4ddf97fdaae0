#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file for one of the upload fields.
    FileSelected {
        field: crate::FileField,
        file: crate::SelectedFile,
    },
    /// User edited one of the text inputs; carries the full new value.
    TextChanged {
        field: crate::TextField,
        value: String,
    },
    /// User pressed Generate.
    SubmitClicked,
    /// Engine finished the submission sequence.
    SubmissionSettled {
        submission_id: crate::SubmissionId,
        result: crate::SubmissionResult,
    },
    /// Status poller received a message from the service.
    StatusReceived(String),
    /// The post-download delay elapsed.
    SuccessDialogDue { submission_id: crate::SubmissionId },
    /// User dismissed the success dialog.
    CloseDialogClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
