use crate::{AppState, Effect, Msg, SubmissionResult, SubmissionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected { field, file } => {
            state.select_file(field, file);
            Vec::new()
        }
        Msg::TextChanged { field, value } => {
            state.set_text(field, value);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // The form, and with it the Generate button, is hidden while Loading.
            if state.submission() == SubmissionState::Loading {
                return (state, Vec::new());
            }
            let submission_id = state.begin_submission();
            vec![Effect::Submit {
                submission_id,
                inputs: state.inputs().clone(),
            }]
        }
        Msg::SubmissionSettled {
            submission_id,
            result,
        } => {
            if state.in_flight() != Some(submission_id) {
                return (state, Vec::new());
            }
            state.settle_submission();
            match result {
                SubmissionResult::Downloaded => {
                    vec![Effect::ScheduleSuccessDialog { submission_id }]
                }
                SubmissionResult::Failed => Vec::new(),
            }
        }
        Msg::StatusReceived(message) => {
            state.set_status_message(message);
            Vec::new()
        }
        // A timer armed by an earlier submission still reveals the dialog.
        Msg::SuccessDialogDue { .. } => {
            state.set_dialog_visible(true);
            Vec::new()
        }
        Msg::CloseDialogClicked => {
            state.set_dialog_visible(false);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
