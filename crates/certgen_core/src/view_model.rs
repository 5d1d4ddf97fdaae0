use crate::SubmissionState;

pub const FORM_TITLE: &str = "Certificate Generator";
pub const DIALOG_TITLE: &str = "Success";
pub const DIALOG_BODY: &str = "Certificate generated (check in the downloads folder of the device)";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub submission: SubmissionState,
    pub title_visible: bool,
    pub ms6_file: Option<String>,
    pub bms_file: Option<String>,
    pub year: String,
    pub course_name: String,
    pub semester: String,
    pub status_message: String,
    pub dialog: Option<DialogView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: &'static str,
    pub body: &'static str,
}

impl DialogView {
    pub(crate) fn success() -> Self {
        Self {
            title: DIALOG_TITLE,
            body: DIALOG_BODY,
        }
    }
}
