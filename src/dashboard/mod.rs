pub mod input;
pub mod layout;
pub mod render;

use crate::colors::ColorState;
use crate::config::DashboardConfig;
use crate::feed::{FeedError, FeedLoader};
use crate::help::{render_help_overlay, HELP_TEXT};
use crate::quake::Observation;
use crate::state::{Action, DashboardState};
use crate::terminal::Terminal;
use chrono::Local;
use crossterm::event::{Event, KeyEventKind};
use input::{event_command, Command};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, info};

const PRINT_SIZE: (u16, u16) = (120, 40);

/// Fold a finished load into the state
fn on_loaded(state: DashboardState, result: Result<Vec<Observation>, FeedError>) -> DashboardState {
    match result {
        Ok(obs) => state.apply(Action::Loaded(obs)),
        Err(e) => state.apply(Action::LoadFailed(e.to_string())),
    }
}

/// Interactive session: fetch in the background, redraw every tick
pub fn run(config: DashboardConfig) -> io::Result<()> {
    let mut term = Terminal::new()?;
    let mut colors = ColorState::new(config.color_scheme);
    let mut state = DashboardState::new(config.x_axis, config.y_axis);
    let mut show_help = false;

    let mut loader = FeedLoader::new(config.source.clone());
    let source = loader.source().describe();
    loader.request();

    let tick = Duration::from_secs_f32(config.time_step);
    let (width, height) = term.size();
    let mut layout = layout::DashboardLayout::compute(width, height);

    loop {
        if let Some(result) = loader.poll() {
            state = on_loaded(state, result);
        }

        if let Some(event) = term.next_event(tick)? {
            match event {
                Event::Resize(w, h) => {
                    term.resize(w, h);
                    term.clear_screen()?;
                }
                _ if color_key(&mut colors, &event) => {}
                _ => match event_command(&event, &state, &layout) {
                    Some(Command::Quit) => break,
                    Some(cmd) => handle(cmd, &mut state, &mut loader, &mut show_help),
                    None => {}
                },
            }
        }

        term.clear();
        let label = if loader.is_pending() {
            format!("{} · loading", source)
        } else {
            source.clone()
        };
        layout = render::render(&mut term, &state, &colors, &label, &Local);
        if show_help {
            let (w, h) = term.size();
            render_help_overlay(&mut term, w, h, HELP_TEXT);
        }
        term.present()?;
    }

    info!("dashboard closed");
    Ok(())
}

/// Scheme keys go to the color state; releases are ignored like everywhere else
fn color_key(colors: &mut ColorState, event: &Event) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => colors.handle_key(key.code),
        _ => false,
    }
}

fn handle(cmd: Command, state: &mut DashboardState, loader: &mut FeedLoader, show_help: &mut bool) {
    match cmd {
        Command::Apply(action) => {
            debug!(?action, "apply");
            *state = state.clone().apply(action);
        }
        Command::Reload => {
            if loader.request() {
                info!("manual reload requested");
            }
        }
        Command::ToggleHelp => *show_help = !*show_help,
        Command::Quit => {}
    }
}

/// One blocking load, one frame to stdout, no raw mode
pub fn print(config: DashboardConfig) -> io::Result<()> {
    let state = DashboardState::new(config.x_axis, config.y_axis);
    let state = on_loaded(state, config.source.load());

    let tty = io::stdout().is_terminal();
    let (w, h) = if tty {
        crossterm::terminal::size().unwrap_or(PRINT_SIZE)
    } else {
        PRINT_SIZE
    };
    let mut term = Terminal::headless(w, h.max(PRINT_SIZE.1 / 2));
    let colors = ColorState::new(config.color_scheme);
    render::render(&mut term, &state, &colors, &config.source.describe(), &Local);

    let frame = if tty { term.to_ansi() } else { term.to_plain() };
    io::stdout().write_all(frame.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quake::{sample, Field};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn color_keys_apply_on_press_only() {
        let mut colors = ColorState::new(7);
        let press = KeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT);
        let mut release = press;
        release.kind = KeyEventKind::Release;

        assert!(!color_key(&mut colors, &Event::Key(release)));
        assert_eq!(colors.scheme, 7);
        assert!(color_key(&mut colors, &Event::Key(press)));
        assert_eq!(colors.scheme, 1);
        assert!(!color_key(&mut colors, &Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))));
    }

    #[test]
    fn load_results_drive_state() {
        let s = DashboardState::new(Field::Magnitude, Field::Depth);
        let s = on_loaded(s, Ok(vec![sample("a", "a", Some(1.0), None)]));
        assert_eq!(s.observations().len(), 1);
        let s = on_loaded(s, Err(FeedError::Status { status: 503 }));
        assert_eq!(s.observations().len(), 1);
        assert_eq!(s.banner.as_deref(), Some("feed returned HTTP 503"));
    }

    #[test]
    fn handled_commands_update_state() {
        let mut state = DashboardState::new(Field::Magnitude, Field::Depth);
        let mut loader = FeedLoader::new(crate::feed::FeedSource::File("/nonexistent".into()));
        let mut help = false;
        let layout = layout::DashboardLayout::compute(120, 40);

        for code in [KeyCode::Char('3'), KeyCode::Char('x'), KeyCode::Char('?')] {
            let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
            if let Some(cmd) = event_command(&event, &state, &layout) {
                handle(cmd, &mut state, &mut loader, &mut help);
            }
        }
        assert_eq!(state.selected_bucket, Some(2));
        assert_eq!(state.x_axis, Field::Depth);
        assert!(help);
    }
}
