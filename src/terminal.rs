use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    interactive: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Take over the screen: raw mode, alternate screen, mouse capture
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, EnableMouseCapture)?;

        Ok(Self {
            width,
            height,
            buffer: blank(width, height),
            interactive: true,
        })
    }

    /// Off-screen buffer of a fixed size (print mode, tests)
    pub fn headless(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: blank(width, height),
            interactive: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = blank(width, height);
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Text of one buffer row, trailing blanks trimmed
    pub fn row_text(&self, y: u16) -> String {
        self.buffer
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Push the whole buffer to the screen
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();
        queue!(out, MoveTo(0, 0))?;

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }

                if let Some(color) = cell.fg {
                    queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?;
                } else {
                    queue!(out, Print(cell.ch))?;
                }

                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Next input event, waiting at most `timeout`
    pub fn next_event(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if poll(timeout)? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    /// Buffer as plain text, one line per row
    pub fn to_plain(&self) -> String {
        (0..self.height).map(|y| self.row_text(y) + "\n").collect()
    }

    /// Buffer as ANSI-colored text (for print mode)
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in &self.buffer {
            let line_end = row.iter().rposition(|c| c.ch != ' ').map_or(0, |i| i + 1);
            for cell in &row[..line_end] {
                if cell.ch == ' ' {
                    out.push(' ');
                    continue;
                }

                if cell.bold {
                    out.push_str("\x1b[1m");
                }
                if let Some(code) = cell.fg.and_then(ansi_code) {
                    out.push_str(&code);
                }
                out.push(cell.ch);
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        out
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.interactive {
            let _ = execute!(stdout(), DisableMouseCapture, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

fn blank(width: u16, height: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); width as usize]; height as usize]
}

fn ansi_code(color: Color) -> Option<String> {
    let code = match color {
        Color::Rgb { r, g, b } => return Some(format!("\x1b[38;2;{};{};{}m", r, g, b)),
        Color::AnsiValue(v) => return Some(format!("\x1b[38;5;{}m", v)),
        // Standard colors (0-7)
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        // Bright colors (8-15)
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        _ => return None,
    };
    Some(format!("\x1b[{}m", code))
}
