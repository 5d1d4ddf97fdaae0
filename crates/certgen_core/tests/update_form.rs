use std::sync::Once;

use certgen_core::{update, AppState, FileField, Msg, SelectedFile, SubmissionState, TextField};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(certgen_logging::initialize_for_tests);
}

fn select(state: AppState, field: FileField, path: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::FileSelected {
            field,
            file: SelectedFile::new(path),
        },
    );
    assert!(effects.is_empty());
    state
}

fn type_text(state: AppState, field: TextField, value: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::TextChanged {
            field,
            value: value.to_string(),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn selecting_one_file_leaves_the_other_untouched() {
    init_logging();
    let state = select(AppState::new(), FileField::Bms, "/data/B.xlsx");
    let state = select(state, FileField::Ms6, "/data/A.xlsx");

    assert_eq!(
        state.inputs().file(FileField::Bms),
        Some(&SelectedFile::new("/data/B.xlsx"))
    );
    assert_eq!(
        state.inputs().file(FileField::Ms6),
        Some(&SelectedFile::new("/data/A.xlsx"))
    );

    let view = state.view();
    assert_eq!(view.ms6_file.as_deref(), Some("A.xlsx"));
    assert_eq!(view.bms_file.as_deref(), Some("B.xlsx"));
}

#[test]
fn reselecting_a_file_overwrites_previous_choice() {
    init_logging();
    let state = select(AppState::new(), FileField::Ms6, "first.xlsx");
    let mut state = select(state, FileField::Ms6, "second.csv");

    assert_eq!(state.view().ms6_file.as_deref(), Some("second.csv"));
    assert_eq!(state.inputs().bms_file, None);
    assert!(state.consume_dirty());
}

#[test]
fn typing_into_one_field_leaves_the_others_untouched() {
    init_logging();
    let state = type_text(AppState::new(), TextField::Year, "Jan 2024");
    let state = type_text(state, TextField::CourseName, "Data Structures");
    let state = type_text(state, TextField::Semester, "3");
    let state = type_text(state, TextField::CourseName, "Data Struct");

    let view = state.view();
    assert_eq!(view.year, "Jan 2024");
    assert_eq!(view.course_name, "Data Struct");
    assert_eq!(view.semester, "3");
}

#[test]
fn text_is_stored_raw_including_empty_and_whitespace() {
    init_logging();
    let state = type_text(AppState::new(), TextField::Semester, "  <b>iv</b> ");
    assert_eq!(state.inputs().text(TextField::Semester), "  <b>iv</b> ");

    let state = type_text(state, TextField::Semester, "");
    assert_eq!(state.inputs().text(TextField::Semester), "");
}

#[test]
fn unchanged_text_does_not_mark_dirty() {
    init_logging();
    let mut state = type_text(AppState::new(), TextField::Year, "2024");
    assert!(state.consume_dirty());

    let mut state = type_text(state, TextField::Year, "2024");
    assert!(!state.consume_dirty());
}

#[test]
fn form_starts_empty_and_idle() {
    init_logging();
    let view = AppState::new().view();

    assert_eq!(view.submission, SubmissionState::Idle);
    assert!(view.title_visible);
    assert_eq!(view.ms6_file, None);
    assert_eq!(view.bms_file, None);
    assert_eq!(view.year, "");
    assert_eq!(view.status_message, "");
    assert_eq!(view.dialog, None);
}
