use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use certgen_core::{AppViewModel, DialogView, FileField, SubmissionState, TextField, FORM_TITLE};

use super::form::{text_value, Control, FormCursor, CONTROLS};

const ACCENT: Color = Color::Rgb(0x63, 0x2b, 0x26);
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const FORM_WIDTH: u16 = 72;
const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 7;

pub fn draw(frame: &mut Frame, view: &AppViewModel, cursor: &FormCursor, tick: u64) {
    let area = centered_rect(FORM_WIDTH, 20, frame.area());
    let [title_area, body_area, hint_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(area);

    if view.title_visible {
        frame.render_widget(
            Paragraph::new(FORM_TITLE)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            title_area,
        );
    }

    match view.submission {
        SubmissionState::Loading => draw_loading(frame, view, tick, body_area),
        SubmissionState::Idle => draw_form(frame, view, cursor, body_area),
    }

    frame.render_widget(
        Paragraph::new(hint_text(view))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );

    if let Some(dialog) = &view.dialog {
        draw_dialog(frame, dialog);
    }
}

fn draw_loading(frame: &mut Frame, view: &AppViewModel, tick: u64, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            spinner_frame(tick),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(view.status_message.as_str()),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_form(frame: &mut Frame, view: &AppViewModel, cursor: &FormCursor, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = CONTROLS
        .iter()
        .flat_map(|control| {
            let focused = cursor.focus() == *control;
            let style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            match control {
                Control::Generate => vec![
                    Line::from(""),
                    Line::from(Span::styled(" [ Generate Certificates ] ", style))
                        .alignment(Alignment::Center),
                ],
                _ => vec![
                    Line::from(Span::styled(
                        control_label(*control),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!(" {}", control_value(view, cursor, *control, focused)),
                        style,
                    )),
                ],
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_dialog(frame: &mut Frame, dialog: &DialogView) {
    let area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", dialog.title))
        .border_style(Style::default().fg(ACCENT));
    let lines = vec![
        Line::from(dialog.body),
        Line::from(""),
        Line::from(Span::styled(
            " [ Close ] ",
            Style::default().add_modifier(Modifier::REVERSED),
        ))
        .alignment(Alignment::Right),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

pub fn control_label(control: Control) -> &'static str {
    match control {
        Control::File(FileField::Ms6) => "Upload MS6 Excel File",
        Control::File(FileField::Bms) => "Upload BMS Excel File",
        Control::Text(TextField::Year) => "Enter Month and Year",
        Control::Text(TextField::CourseName) => "Enter Course Name",
        Control::Text(TextField::Semester) => "Enter Semester Number",
        Control::Generate => "Generate Certificates",
    }
}

/// What a control shows: the typed path while editing, otherwise the
/// selected file name or the text value.
pub fn control_value(
    view: &AppViewModel,
    cursor: &FormCursor,
    control: Control,
    focused: bool,
) -> String {
    let caret = if focused { "_" } else { "" };
    match control {
        Control::File(field) => {
            let buffer = cursor.path_buffer(field);
            let selected = match field {
                FileField::Ms6 => view.ms6_file.as_deref(),
                FileField::Bms => view.bms_file.as_deref(),
            };
            match (focused, selected) {
                (false, Some(name)) => name.to_string(),
                (false, None) if buffer.is_empty() => "No file chosen".to_string(),
                _ => format!("{buffer}{caret}"),
            }
        }
        Control::Text(field) => format!("{}{caret}", text_value(view, field)),
        Control::Generate => String::new(),
    }
}

pub fn hint_text(view: &AppViewModel) -> &'static str {
    if view.dialog.is_some() {
        "Enter/Esc close · Ctrl-Q quit"
    } else if view.submission == SubmissionState::Loading {
        "Generating… · Ctrl-Q quit"
    } else {
        "Tab/↑↓ move · Enter select path / submit · Ctrl-Q quit"
    }
}

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
