use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type SubmissionId = u64;

/// What the user entered, with file selections still as paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionRequest {
    pub ms6_file: Option<PathBuf>,
    pub bms_file: Option<PathBuf>,
    pub year: String,
    pub course_name: String,
    pub semester: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Stand-in for a file input with nothing selected: no name, no content.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Multipart payload for the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateForm {
    pub ms6_file: FilePart,
    pub bms_file: FilePart,
    pub year: String,
    pub course_name: String,
    pub semester: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub saved_to: PathBuf,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StatusUpdated(String),
    SubmissionCompleted {
        submission_id: SubmissionId,
        result: Result<SubmissionOutcome, FailureKind>,
    },
    SuccessDialogDue {
        submission_id: SubmissionId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedBody,
    FileUnreadable,
    Persist,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::FileUnreadable => write!(f, "selected file unreadable"),
            FailureKind::Persist => write!(f, "could not save download"),
        }
    }
}
