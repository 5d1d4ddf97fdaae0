//! Certgen core: pure form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, FileField, FormInputs, SelectedFile, SubmissionId, SubmissionResult,
    SubmissionState, TextField,
};
pub use update::update;
pub use view_model::{AppViewModel, DialogView, DIALOG_BODY, DIALOG_TITLE, FORM_TITLE};
