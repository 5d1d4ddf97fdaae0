use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use certgen_core::{AppViewModel, FileField, Msg, SelectedFile, SubmissionState, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    File(FileField),
    Text(TextField),
    Generate,
}

pub const CONTROLS: [Control; 6] = [
    Control::File(FileField::Ms6),
    Control::File(FileField::Bms),
    Control::Text(TextField::Year),
    Control::Text(TextField::CourseName),
    Control::Text(TextField::Semester),
    Control::Generate,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Dispatch(Vec<Msg>),
    Redraw,
    Quit,
    Ignore,
}

/// Terminal stand-in for the file pickers: the path typed so far and the
/// path last handed to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PathInput {
    buffer: String,
    committed: Option<String>,
}

impl PathInput {
    /// Returns the selection message if the buffer holds a new path.
    fn commit(&mut self, field: FileField) -> Option<Msg> {
        if self.buffer.is_empty() || self.committed.as_deref() == Some(self.buffer.as_str()) {
            return None;
        }
        self.committed = Some(self.buffer.clone());
        Some(Msg::FileSelected {
            field,
            file: SelectedFile::new(self.buffer.clone()),
        })
    }
}

/// Focus and in-progress path edits. Text field values live in the core
/// state and are read back from the view model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormCursor {
    focus: usize,
    ms6: PathInput,
    bms: PathInput,
}

impl FormCursor {
    pub fn focus(&self) -> Control {
        CONTROLS[self.focus]
    }

    pub fn path_buffer(&self, field: FileField) -> &str {
        &self.path_input(field).buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent, view: &AppViewModel) -> UiAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return UiAction::Quit;
        }

        if view.dialog.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => UiAction::Dispatch(vec![Msg::CloseDialogClicked]),
                _ => UiAction::Ignore,
            };
        }

        // The form is not shown while a submission is loading.
        if view.submission == SubmissionState::Loading {
            return UiAction::Ignore;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(CONTROLS.len() - 1),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Backspace => self.on_backspace(view),
            KeyCode::Char(ch) if !ctrl => self.on_char(ch, view),
            _ => UiAction::Ignore,
        }
    }

    fn move_focus(&mut self, step: usize) -> UiAction {
        let leaving = self.focus();
        self.focus = (self.focus + step) % CONTROLS.len();
        match leaving {
            Control::File(field) => match self.path_input_mut(field).commit(field) {
                Some(msg) => UiAction::Dispatch(vec![msg]),
                None => UiAction::Redraw,
            },
            _ => UiAction::Redraw,
        }
    }

    fn on_enter(&mut self) -> UiAction {
        match self.focus() {
            Control::File(field) => match self.path_input_mut(field).commit(field) {
                Some(msg) => UiAction::Dispatch(vec![msg]),
                None => UiAction::Ignore,
            },
            Control::Text(_) => self.move_focus(1),
            // Paths were committed when focus left them.
            Control::Generate => UiAction::Dispatch(vec![Msg::SubmitClicked]),
        }
    }

    fn on_char(&mut self, ch: char, view: &AppViewModel) -> UiAction {
        match self.focus() {
            Control::File(field) => {
                self.path_input_mut(field).buffer.push(ch);
                UiAction::Redraw
            }
            Control::Text(field) => {
                let mut value = text_value(view, field).to_string();
                value.push(ch);
                UiAction::Dispatch(vec![Msg::TextChanged { field, value }])
            }
            Control::Generate => UiAction::Ignore,
        }
    }

    fn on_backspace(&mut self, view: &AppViewModel) -> UiAction {
        match self.focus() {
            Control::File(field) => {
                if self.path_input_mut(field).buffer.pop().is_some() {
                    UiAction::Redraw
                } else {
                    UiAction::Ignore
                }
            }
            Control::Text(field) => {
                let mut value = text_value(view, field).to_string();
                if value.pop().is_none() {
                    return UiAction::Ignore;
                }
                UiAction::Dispatch(vec![Msg::TextChanged { field, value }])
            }
            Control::Generate => UiAction::Ignore,
        }
    }

    fn path_input(&self, field: FileField) -> &PathInput {
        match field {
            FileField::Ms6 => &self.ms6,
            FileField::Bms => &self.bms,
        }
    }

    fn path_input_mut(&mut self, field: FileField) -> &mut PathInput {
        match field {
            FileField::Ms6 => &mut self.ms6,
            FileField::Bms => &mut self.bms,
        }
    }
}

pub fn text_value(view: &AppViewModel, field: TextField) -> &str {
    match field {
        TextField::Year => &view.year,
        TextField::CourseName => &view.course_name,
        TextField::Semester => &view.semester,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certgen_core::{update, AppState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(cursor: &mut FormCursor, state: AppState, text: &str) -> AppState {
        text.chars().fold(state, |state, ch| {
            match cursor.handle_key(key(KeyCode::Char(ch)), &state.view()) {
                UiAction::Dispatch(msgs) => msgs
                    .into_iter()
                    .fold(state, |state, msg| update(state, msg).0),
                _ => state,
            }
        })
    }

    #[test]
    fn tab_cycles_through_all_controls() {
        let mut cursor = FormCursor::default();
        let view = AppViewModel::default();
        let mut seen = vec![cursor.focus()];
        for _ in 0..CONTROLS.len() {
            cursor.handle_key(key(KeyCode::Tab), &view);
            seen.push(cursor.focus());
        }
        assert_eq!(&seen[..6], &CONTROLS[..]);
        assert_eq!(seen[6], Control::File(FileField::Ms6));

        cursor.handle_key(key(KeyCode::BackTab), &view);
        assert_eq!(cursor.focus(), Control::Generate);
    }

    #[test]
    fn typing_in_text_field_dispatches_full_value() {
        let mut cursor = FormCursor::default();
        let view = AppViewModel::default();
        cursor.handle_key(key(KeyCode::Tab), &view);
        cursor.handle_key(key(KeyCode::Tab), &view);
        assert_eq!(cursor.focus(), Control::Text(TextField::Year));

        let state = type_str(&mut cursor, AppState::new(), "Jan 2024");
        assert_eq!(state.view().year, "Jan 2024");

        let action = cursor.handle_key(key(KeyCode::Backspace), &state.view());
        assert_eq!(
            action,
            UiAction::Dispatch(vec![Msg::TextChanged {
                field: TextField::Year,
                value: "Jan 202".to_string(),
            }])
        );
    }

    #[test]
    fn path_is_committed_on_enter_once() {
        let mut cursor = FormCursor::default();
        let state = type_str(&mut cursor, AppState::new(), "A.xlsx");
        assert_eq!(cursor.path_buffer(FileField::Ms6), "A.xlsx");
        assert_eq!(state.view().ms6_file, None);

        let action = cursor.handle_key(key(KeyCode::Enter), &state.view());
        assert_eq!(
            action,
            UiAction::Dispatch(vec![Msg::FileSelected {
                field: FileField::Ms6,
                file: SelectedFile::new("A.xlsx"),
            }])
        );
        assert_eq!(
            cursor.handle_key(key(KeyCode::Enter), &state.view()),
            UiAction::Ignore
        );
    }

    #[test]
    fn leaving_a_path_field_commits_it() {
        let mut cursor = FormCursor::default();
        let state = type_str(&mut cursor, AppState::new(), "A.xlsx");

        let action = cursor.handle_key(key(KeyCode::Tab), &state.view());
        assert!(matches!(
            action,
            UiAction::Dispatch(ref msgs) if msgs.len() == 1
        ));
        assert_eq!(cursor.focus(), Control::File(FileField::Bms));
    }

    #[test]
    fn path_committed_on_leave_is_not_sent_again() {
        let mut cursor = FormCursor::default();
        let view = AppViewModel::default();
        cursor.handle_key(key(KeyCode::Tab), &view);
        let state = type_str(&mut cursor, AppState::new(), "B.xlsx");

        // Up from Bms wraps: Ms6, Generate, Semester, CourseName.
        let first = cursor.handle_key(key(KeyCode::Up), &view);
        assert!(matches!(first, UiAction::Dispatch(_)));
        for _ in 0..3 {
            assert_eq!(cursor.handle_key(key(KeyCode::Up), &view), UiAction::Redraw);
        }
        cursor.handle_key(key(KeyCode::Down), &view);
        cursor.handle_key(key(KeyCode::Down), &view);
        assert_eq!(cursor.focus(), Control::Generate);

        let action = cursor.handle_key(key(KeyCode::Enter), &state.view());
        assert_eq!(action, UiAction::Dispatch(vec![Msg::SubmitClicked]));
    }

    #[test]
    fn generate_with_empty_form_submits() {
        let mut cursor = FormCursor::default();
        let view = AppViewModel::default();
        cursor.handle_key(key(KeyCode::BackTab), &view);

        assert_eq!(
            cursor.handle_key(key(KeyCode::Enter), &view),
            UiAction::Dispatch(vec![Msg::SubmitClicked])
        );
    }

    #[test]
    fn dialog_captures_keys() {
        let mut cursor = FormCursor::default();
        let (state, _) = update(AppState::new(), Msg::SuccessDialogDue { submission_id: 1 });
        let view = state.view();

        assert_eq!(cursor.handle_key(key(KeyCode::Char('x')), &view), UiAction::Ignore);
        assert_eq!(
            cursor.handle_key(key(KeyCode::Esc), &view),
            UiAction::Dispatch(vec![Msg::CloseDialogClicked])
        );
    }

    #[test]
    fn loading_ignores_form_keys_but_allows_quit() {
        let mut cursor = FormCursor::default();
        let (state, _) = update(AppState::new(), Msg::SubmitClicked);
        let view = state.view();

        assert_eq!(cursor.handle_key(key(KeyCode::Enter), &view), UiAction::Ignore);
        assert_eq!(
            cursor.handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &view
            ),
            UiAction::Quit
        );
    }
}
