pub mod form;
pub mod render;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use certgen_core::{Msg, SubmissionState};
use certgen_logging::certgen_info;

use crate::platform::app::Controller;
use form::{FormCursor, UiAction};

const TICK: Duration = Duration::from_millis(75);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the form until the user quits, then unmounts the controller.
pub fn run(mut controller: Controller) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut controller);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.shutdown();
    certgen_info!("Form closed");
    result
}

fn event_loop(terminal: &mut Term, controller: &mut Controller) -> Result<()> {
    let mut cursor = FormCursor::default();
    let mut tick: u64 = 0;
    let mut last_tick = Instant::now();
    let mut redraw = true;

    loop {
        controller.pump();
        let view = controller.view();
        if controller.consume_dirty() {
            redraw = true;
        }
        if redraw || view.submission == SubmissionState::Loading {
            terminal.draw(|frame| render::draw(frame, &view, &cursor, tick))?;
            redraw = false;
        }

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match cursor.handle_key(key, &view) {
                        UiAction::Dispatch(msgs) => {
                            for msg in msgs {
                                controller.dispatch(msg);
                            }
                            redraw = true;
                        }
                        UiAction::Redraw => redraw = true,
                        UiAction::Quit => return Ok(()),
                        UiAction::Ignore => {}
                    }
                }
                Event::Resize(_, _) => redraw = true,
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK {
            controller.dispatch(Msg::Tick);
            tick = tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    }
}
