use crate::colors::{ColorState, Role};
use crate::histogram::BUCKETS;
use crate::terminal::Terminal;

// Box drawing characters (rounded)
pub const BOX_TL: char = '╭';
pub const BOX_TR: char = '╮';
pub const BOX_BL: char = '╰';
pub const BOX_BR: char = '╯';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';
pub const BOX_TITLE_L: char = '┤';
pub const BOX_TITLE_R: char = '├';

// Vertical partial blocks, 1/8 increments
pub const VBLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const MIN_BAR_PANEL: u16 = 8;
/// Gutter left of the scatter plot for the y range and title
pub const Y_LABEL_WIDTH: u16 = 8;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x
            && col < self.x + self.width
            && row >= self.y
            && row < self.y + self.height
    }

    pub fn right(&self) -> u16 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u16 {
        self.y + self.height
    }
}

/// A bordered panel with a centered title
pub struct Panel {
    pub area: Area,
    pub title: String,
}

impl Panel {
    pub fn new(area: Area, title: &str) -> Self {
        Self {
            area,
            title: title.to_string(),
        }
    }

    /// Content area inside the border
    pub fn inner(&self) -> Area {
        Area {
            x: self.area.x + 1,
            y: self.area.y + 1,
            width: self.area.width.saturating_sub(2),
            height: self.area.height.saturating_sub(2),
        }
    }

    pub fn draw(&self, term: &mut Terminal, colors: &ColorState) {
        if self.area.width < 2 || self.area.height < 2 {
            return;
        }
        let (border, _) = colors.role(Role::Border);
        let (title_color, title_bold) = colors.role(Role::Title);
        let bc = Some(border);

        let x = self.area.x as i32;
        let y = self.area.y as i32;
        let w = self.area.width as i32;
        let h = self.area.height as i32;

        term.set(x, y, BOX_TL, bc, false);

        let title_len = self.title.chars().count() as i32;
        let title_start = if !self.title.is_empty() && title_len + 6 <= w {
            let padding = (w - 2 - (title_len + 4)) / 2;
            for i in 1..=padding {
                term.set(x + i, y, BOX_H, bc, false);
            }
            let tx = x + 1 + padding;
            term.set(tx, y, BOX_TITLE_L, bc, false);
            term.set(tx + 1, y, ' ', None, false);
            term.set_str(tx + 2, y, &self.title, Some(title_color), title_bold);
            term.set(tx + 2 + title_len, y, ' ', None, false);
            term.set(tx + 3 + title_len, y, BOX_TITLE_R, bc, false);
            tx + 4 + title_len
        } else {
            x + 1
        };

        for i in title_start..(x + w - 1) {
            term.set(i, y, BOX_H, bc, false);
        }
        term.set(x + w - 1, y, BOX_TR, bc, false);

        for i in 1..(h - 1) {
            term.set(x, y + i, BOX_V, bc, false);
            term.set(x + w - 1, y + i, BOX_V, bc, false);
        }

        term.set(x, y + h - 1, BOX_BL, bc, false);
        for i in 1..(w - 1) {
            term.set(x + i, y + h - 1, BOX_H, bc, false);
        }
        term.set(x + w - 1, y + h - 1, BOX_BR, bc, false);
    }
}

/// Where a click on the bar chart landed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BarHit {
    Bucket(usize),
    Empty,
}

/// Bar chart geometry: plot area, one column per bucket, label row and filter line
#[derive(Clone, Debug, PartialEq)]
pub struct BarChartLayout {
    pub panel: Area,
    pub plot: Area,
    pub columns: [Area; BUCKETS.len()],
    pub label_row: u16,
    pub filter_row: u16,
}

impl BarChartLayout {
    fn compute(panel: Area) -> Self {
        let inner = Panel::new(panel, "").inner();
        // plot rows, then bucket labels, then the filter line
        let plot = Area {
            height: inner.height.saturating_sub(2),
            ..inner
        };
        let label_row = plot.bottom();
        let filter_row = label_row + 1;

        let slot = inner.width / BUCKETS.len() as u16;
        let bar_width = slot.saturating_sub(2).max(1);
        let mut columns = [Area::default(); BUCKETS.len()];
        for (i, col) in columns.iter_mut().enumerate() {
            let slot_x = inner.x + slot * i as u16;
            *col = Area {
                x: slot_x + (slot.saturating_sub(bar_width)) / 2,
                y: plot.y,
                width: bar_width.min(slot),
                height: plot.height + 1,
            };
        }

        Self {
            panel,
            plot,
            columns,
            label_row,
            filter_row,
        }
    }

    /// Bucket column under the cursor, `Empty` for the rest of the chart,
    /// None when the click is outside the chart entirely
    pub fn hit_test(&self, col: u16, row: u16) -> Option<BarHit> {
        if !self.panel.contains(col, row) {
            return None;
        }
        let hit = self
            .columns
            .iter()
            .position(|c| c.contains(col, row))
            .map_or(BarHit::Empty, BarHit::Bucket);
        Some(hit)
    }
}

/// Dot area of the scatter panel: below the selector and caption rows,
/// right of the y gutter, above the x range row. None when too small.
pub fn scatter_plot_area(panel: Area) -> Option<Area> {
    let inner = Panel::new(panel, "").inner();
    if inner.height < 4 || inner.width <= Y_LABEL_WIDTH + 2 {
        return None;
    }
    Some(Area {
        x: inner.x + Y_LABEL_WIDTH,
        y: inner.y + 2,
        width: inner.width - Y_LABEL_WIDTH,
        height: inner.height - 3,
    })
}

/// Screen split: title line, bar chart, scatter | table, status line
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardLayout {
    pub title_row: u16,
    pub bars: BarChartLayout,
    pub scatter: Area,
    pub scatter_plot: Option<Area>,
    pub table: Area,
    pub status_row: u16,
}

impl DashboardLayout {
    pub fn compute(width: u16, height: u16) -> Self {
        let body = height.saturating_sub(2);
        let bar_height = (body * 2 / 5).max(MIN_BAR_PANEL).min(body);
        let bars = BarChartLayout::compute(Area {
            x: 0,
            y: 1,
            width,
            height: bar_height,
        });

        let lower_y = 1 + bar_height;
        let lower_h = body.saturating_sub(bar_height);
        let left_w = width / 2;
        let scatter = Area {
            x: 0,
            y: lower_y,
            width: left_w,
            height: lower_h,
        };
        let table = Area {
            x: left_w,
            y: lower_y,
            width: width - left_w,
            height: lower_h,
        };

        Self {
            title_row: 0,
            bars,
            scatter,
            scatter_plot: scatter_plot_area(scatter),
            table,
            status_row: height.saturating_sub(1),
        }
    }
}
