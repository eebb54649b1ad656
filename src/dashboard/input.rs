//! Mapping terminal events onto dashboard commands

use crate::dashboard::layout::{BarHit, DashboardLayout};
use crate::state::{Action, DashboardState};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

const PAGE: isize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Apply(Action),
    Reload,
    ToggleHelp,
    Quit,
}

pub fn key_command(key: KeyEvent, state: &DashboardState) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let cmd = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('?') => Command::ToggleHelp,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reload,
        KeyCode::Char(c @ '1'..='6') => {
            Command::Apply(Action::SelectBucket(c as usize - '1' as usize))
        }
        KeyCode::Char('0') | KeyCode::Char('c') => Command::Apply(Action::ClearBucket),
        KeyCode::Char('x') => Command::Apply(Action::SetXAxis(state.x_axis.next())),
        KeyCode::Char('X') => Command::Apply(Action::SetXAxis(state.x_axis.prev())),
        KeyCode::Char('y') => Command::Apply(Action::SetYAxis(state.y_axis.next())),
        KeyCode::Char('Y') => Command::Apply(Action::SetYAxis(state.y_axis.prev())),
        KeyCode::Down | KeyCode::Char('j') => Command::Apply(Action::ScrollTable(1)),
        KeyCode::Up | KeyCode::Char('k') => Command::Apply(Action::ScrollTable(-1)),
        KeyCode::PageDown => Command::Apply(Action::ScrollTable(PAGE)),
        KeyCode::PageUp => Command::Apply(Action::ScrollTable(-PAGE)),
        KeyCode::Home => Command::Apply(Action::ScrollTableToTop),
        KeyCode::End => Command::Apply(Action::ScrollTableToBottom),
        _ => return None,
    };
    Some(cmd)
}

pub fn event_command(event: &Event, state: &DashboardState, layout: &DashboardLayout) -> Option<Command> {
    match event {
        Event::Key(key) => key_command(*key, state),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match layout.bars.hit_test(mouse.column, mouse.row)? {
                    BarHit::Bucket(i) => Some(Command::Apply(Action::SelectBucket(i))),
                    BarHit::Empty => Some(Command::Apply(Action::ClearBucket)),
                }
            }
            MouseEventKind::Moved => {
                let hover = layout
                    .scatter_plot
                    .filter(|plot| plot.contains(mouse.column, mouse.row))
                    .map(|plot| (mouse.column - plot.x, mouse.row - plot.y));
                // only report leaving the plot once
                (hover.is_some() || state.hover.is_some()).then_some(Command::Apply(Action::HoverScatter(hover)))
            }
            MouseEventKind::ScrollDown if layout.table.contains(mouse.column, mouse.row) => {
                Some(Command::Apply(Action::ScrollTable(3)))
            }
            MouseEventKind::ScrollUp if layout.table.contains(mouse.column, mouse.row) => {
                Some(Command::Apply(Action::ScrollTable(-3)))
            }
            _ => None,
        },
        _ => None,
    }
}
