use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Shared color scheme state
#[derive(Clone, Copy)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme }
    }

    /// Handle color scheme key input. Returns true if key was handled.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: pink
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: gold
            KeyCode::Char('%') => self.scheme = 5,  // Shift+5: electric
            KeyCode::Char('^') => self.scheme = 6,  // Shift+6: lava
            KeyCode::Char('&') => self.scheme = 7,  // Shift+7: mono
            KeyCode::Char('*') => self.scheme = 8,  // Shift+8: rainbow
            KeyCode::Char('(') => self.scheme = 9,  // Shift+9: neon
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: green
            _ => return false,
        }
        true
    }

    pub fn is_mono(&self) -> bool {
        self.scheme == 7
    }

    /// Color for a dashboard role under the current scheme
    pub fn role(&self, role: Role) -> (Color, bool) {
        if self.is_mono() {
            return match role {
                Role::Border => (Color::DarkGrey, false),
                Role::Title => (Color::White, true),
                Role::Text => (Color::Grey, false),
                Role::Muted => (Color::DarkGrey, false),
                Role::Bar => (Color::Cyan, false),
                Role::Selected => (Color::Yellow, true),
                Role::Point => (Color::Magenta, false),
                Role::Error => (Color::Red, true),
            };
        }
        match role {
            Role::Border | Role::Muted => scheme_color(self.scheme, 0, false),
            Role::Text => scheme_color(self.scheme, 1, false),
            Role::Bar | Role::Point => scheme_color(self.scheme, 2, false),
            Role::Title | Role::Selected => scheme_color(self.scheme, 3, true),
            Role::Error => (Color::Red, true),
        }
    }
}

/// What a piece of the dashboard is, for coloring purposes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Role {
    Border,
    Title,
    Text,
    Muted,
    Bar,
    Selected,
    Point,
    Error,
}

/// Get color from scheme based on intensity (0-3)
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        1 => match intensity {  // Red/Yellow (fire)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, bold),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {  // Blue/Cyan (ice)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, bold),
            _ => (Color::Cyan, true),
        },
        3 => match intensity {  // Magenta/Pink (pink)
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),
        },
        4 => match intensity {  // Yellow/Gold (gold)
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, bold),
            _ => (Color::AnsiValue(11), true),
        },
        5 => match intensity {  // Cyan/Electric (electric)
            0 => (Color::DarkCyan, false),
            1 => (Color::Cyan, false),
            2 => (Color::Cyan, bold),
            _ => (Color::AnsiValue(14), true),
        },
        6 => match intensity {  // Red/Magenta (lava)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(9), true),
        },
        7 => match intensity {  // White/Grey (mono)
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, bold),
            _ => (Color::White, true),
        },
        8 => match intensity {  // Rainbow
            0 => (Color::Red, false),
            1 => (Color::Yellow, false),
            2 => (Color::Green, bold),
            _ => (Color::Cyan, true),
        },
        9 => match intensity {  // Blue/Magenta (neon)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),
        },
        _ => match intensity {  // Default: Green
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_digits_pick_schemes() {
        let mut c = ColorState::new(7);
        assert!(c.handle_key(KeyCode::Char('!')));
        assert_eq!(c.scheme, 1);
        assert!(!c.is_mono());
        assert!(c.handle_key(KeyCode::Char('&')));
        assert!(c.is_mono());
        assert!(!c.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn mono_errors_are_red() {
        let c = ColorState::new(7);
        assert_eq!(c.role(Role::Error), (Color::Red, true));
        assert_eq!(ColorState::new(2).role(Role::Error), (Color::Red, true));
    }
}
