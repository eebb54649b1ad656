use crate::terminal::Terminal;
use crossterm::style::Color;

pub const HELP_TEXT: &str = "\
EARTHQUAKE DASHBOARD
─────────────────────────
Click bar   Filter by magnitude
Click gap   Clear filter
1-6         Select bucket
c / 0       Clear filter
Hover dot   Show place and values
x / X       Next/prev X axis
y / Y       Next/prev Y axis
↑↓ PgUp/Dn  Scroll table
Home/End    Table top/bottom
r           Reload feed
───────────────────────
 GLOBAL CONTROLS
 !-()   Color scheme
 q/Esc  Quit
 ?      Close help
───────────────────────";

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, width: u16, height: u16, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2; // 1 row padding top/bottom

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    let border_color = Color::White;
    let text_color = Color::Grey;

    // ┌─────┐
    term.set(start_x as i32, start_y as i32, '┌', Some(border_color), false);
    for x in 1..box_width - 1 {
        term.set((start_x + x) as i32, start_y as i32, '─', Some(border_color), false);
    }
    term.set((start_x + box_width - 1) as i32, start_y as i32, '┐', Some(border_color), false);

    for (i, line) in lines.iter().enumerate() {
        let y = start_y + 1 + i;
        term.set(start_x as i32, y as i32, '│', Some(border_color), false);

        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        for (j, ch) in padded.chars().enumerate() {
            term.set((start_x + 1 + j) as i32, y as i32, ch, Some(text_color), false);
        }

        term.set((start_x + box_width - 1) as i32, y as i32, '│', Some(border_color), false);
    }

    // └─────┘
    let bottom_y = start_y + box_height - 1;
    term.set(start_x as i32, bottom_y as i32, '└', Some(border_color), false);
    for x in 1..box_width - 1 {
        term.set((start_x + x) as i32, bottom_y as i32, '─', Some(border_color), false);
    }
    term.set((start_x + box_width - 1) as i32, bottom_y as i32, '┘', Some(border_color), false);
}
