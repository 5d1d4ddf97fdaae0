use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, DialogView};

pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileField {
    Ms6,
    Bms,
}

impl FileField {
    /// Multipart part name expected by the generation endpoint.
    pub fn form_name(self) -> &'static str {
        match self {
            FileField::Ms6 => "ms6File",
            FileField::Bms => "bmsFile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Year,
    CourseName,
    Semester,
}

impl TextField {
    /// Multipart part name expected by the generation endpoint.
    pub fn form_name(self) -> &'static str {
        match self {
            TextField::Year => "year",
            TextField::CourseName => "courseName",
            TextField::Semester => "semester",
        }
    }
}

/// Handle to a file chosen by the user. Contents are read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in the form and sent as the multipart filename.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInputs {
    pub ms6_file: Option<SelectedFile>,
    pub bms_file: Option<SelectedFile>,
    pub year: String,
    pub course_name: String,
    pub semester: String,
}

impl FormInputs {
    pub fn file(&self, field: FileField) -> Option<&SelectedFile> {
        match field {
            FileField::Ms6 => self.ms6_file.as_ref(),
            FileField::Bms => self.bms_file.as_ref(),
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Year => &self.year,
            TextField::CourseName => &self.course_name,
            TextField::Semester => &self.semester,
        }
    }

    fn file_slot(&mut self, field: FileField) -> &mut Option<SelectedFile> {
        match field {
            FileField::Ms6 => &mut self.ms6_file,
            FileField::Bms => &mut self.bms_file,
        }
    }

    fn text_slot(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Year => &mut self.year,
            TextField::CourseName => &mut self.course_name,
            TextField::Semester => &mut self.semester,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Generated document was saved and the backend cleaned up.
    Downloaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    inputs: FormInputs,
    submission: SubmissionState,
    in_flight: Option<SubmissionId>,
    next_submission_id: SubmissionId,
    status_message: String,
    dialog_visible: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            submission: self.submission,
            title_visible: self.submission == SubmissionState::Idle,
            ms6_file: self.inputs.ms6_file.as_ref().map(SelectedFile::display_name),
            bms_file: self.inputs.bms_file.as_ref().map(SelectedFile::display_name),
            year: self.inputs.year.clone(),
            course_name: self.inputs.course_name.clone(),
            semester: self.inputs.semester.clone(),
            status_message: self.status_message.clone(),
            dialog: self.dialog_visible.then(DialogView::success),
            dirty: self.dirty,
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog_visible
    }

    /// Returns whether anything visible changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_file(&mut self, field: FileField, file: SelectedFile) {
        *self.inputs.file_slot(field) = Some(file);
        self.mark_dirty();
    }

    pub(crate) fn set_text(&mut self, field: TextField, value: String) {
        let slot = self.inputs.text_slot(field);
        if *slot != value {
            *slot = value;
            self.mark_dirty();
        }
    }

    /// Moves Idle to Loading and allocates an id for the new submission.
    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        self.next_submission_id += 1;
        let submission_id = self.next_submission_id;
        self.submission = SubmissionState::Loading;
        self.in_flight = Some(submission_id);
        self.mark_dirty();
        submission_id
    }

    pub(crate) fn settle_submission(&mut self) {
        self.submission = SubmissionState::Idle;
        self.in_flight = None;
        self.mark_dirty();
    }

    pub(crate) fn set_status_message(&mut self, message: String) {
        if self.status_message != message {
            self.status_message = message;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_dialog_visible(&mut self, visible: bool) {
        if self.dialog_visible != visible {
            self.dialog_visible = visible;
            self.mark_dirty();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
