//! Drawing the dashboard state into the cell buffer
//!
//! Every function here reads state and writes cells; the caller clears the
//! buffer first, so a frame never depends on what the previous one drew.

use crate::colors::{ColorState, Role};
use crate::dashboard::layout::{Area, BarChartLayout, DashboardLayout, Panel, VBLOCKS, Y_LABEL_WIDTH};
use crate::histogram::{bucket_counts, BUCKETS};
use crate::quake::format_number;
use crate::scatter::{dataset_label, extent, project, ScatterPoint};
use crate::state::{DashboardState, LoadState};
use crate::table::{table_rows, TimeFormat, HEADERS};
use crate::terminal::Terminal;
use chrono::TimeZone;

/// How far from a dot, in cells, the cursor still picks it up
const HOVER_RADIUS: f64 = 1.5;

/// Draw one full frame. Returns the layout used so clicks can be mapped back.
pub fn render<Tz: TimeZone>(
    term: &mut Terminal,
    state: &DashboardState,
    colors: &ColorState,
    source: &str,
    tz: &Tz,
) -> DashboardLayout
where
    Tz::Offset: std::fmt::Display,
{
    let (width, height) = term.size();
    let layout = DashboardLayout::compute(width, height);

    draw_title(term, &layout, state, colors, source);

    match &state.load {
        LoadState::Empty => {
            draw_centered(term, width, height / 2, "Fetching earthquake feed...", colors.role(Role::Text));
        }
        LoadState::Failed(err) => {
            let msg = format!("Error: {}", err);
            draw_centered(term, width, height / 2, &msg, colors.role(Role::Error));
            draw_centered(term, width, height / 2 + 1, "Press r to reload", colors.role(Role::Muted));
        }
        LoadState::Loaded(_) => {
            draw_bar_chart(term, &layout.bars, state, colors);
            draw_scatter(term, layout.scatter, layout.scatter_plot, state, colors);
            draw_table(term, layout.table, state, colors, tz);
        }
    }

    draw_status(term, &layout, state, colors);
    layout
}

fn draw_title(term: &mut Terminal, layout: &DashboardLayout, state: &DashboardState, colors: &ColorState, source: &str) {
    let (title, bold) = colors.role(Role::Title);
    let (muted, _) = colors.role(Role::Muted);
    let heading = "Earthquake Data Dashboard";
    term.set_str(1, layout.title_row as i32, heading, Some(title), bold);

    let info = match &state.load {
        LoadState::Loaded(obs) => format!("{} events · {}", obs.len(), source),
        _ => source.to_string(),
    };
    let (width, _) = term.size();
    let x = (heading.len() as u16 + 3).max(width.saturating_sub(info.chars().count() as u16 + 1));
    term.set_str(x as i32, layout.title_row as i32, &info, Some(muted), false);
}

fn draw_status(term: &mut Terminal, layout: &DashboardLayout, state: &DashboardState, colors: &ColorState) {
    if let Some(point) = layout.scatter_plot.and_then(|plot| hovered_point(state, plot)) {
        let tip = format!(
            "{} | {}: {}, {}: {}",
            point.label,
            state.x_axis.name(),
            format_number(Some(point.x)),
            state.y_axis.name(),
            format_number(Some(point.y)),
        );
        let (c, bold) = colors.role(Role::Selected);
        term.set_str(1, layout.status_row as i32, &tip, Some(c), bold);
        return;
    }
    if let Some(banner) = &state.banner {
        let msg = format!("Reload failed: {} (showing previous data)", banner);
        let (c, bold) = colors.role(Role::Error);
        term.set_str(1, layout.status_row as i32, &msg, Some(c), bold);
        return;
    }
    let (c, _) = colors.role(Role::Muted);
    term.set_str(
        1,
        layout.status_row as i32,
        "click bar/1-6 filter · c clear · x/y axes · ↑↓ scroll · r reload · ? help · q quit",
        Some(c),
        false,
    );
}

fn draw_bar_chart(term: &mut Terminal, bars: &BarChartLayout, state: &DashboardState, colors: &ColorState) {
    Panel::new(bars.panel, "Number of Earthquakes").draw(term, colors);

    let counts = bucket_counts(state.observations());
    let max = counts.iter().copied().max().unwrap_or(0);
    // leave the top plot row for the count label
    let bar_rows = bars.plot.height.saturating_sub(1) as usize;

    for (i, (col, bucket)) in bars.columns.iter().zip(BUCKETS.iter()).enumerate() {
        let role = if state.selected_bucket == Some(i) { Role::Selected } else { Role::Bar };
        let (color, bold) = colors.role(role);

        let eighths = if max == 0 {
            0
        } else {
            let e = (counts[i] * bar_rows * 8 + max / 2) / max;
            if counts[i] > 0 { e.max(1) } else { 0 }
        };
        let full = eighths / 8;
        let partial = eighths % 8;
        let base = bars.plot.bottom() as i32 - 1;

        for row in 0..full {
            for dx in 0..col.width {
                term.set((col.x + dx) as i32, base - row as i32, VBLOCKS[8], Some(color), false);
            }
        }
        if partial > 0 {
            for dx in 0..col.width {
                term.set((col.x + dx) as i32, base - full as i32, VBLOCKS[partial], Some(color), false);
            }
        }

        let top = base - eighths.div_ceil(8) as i32;
        let count = counts[i].to_string();
        term.set_str(center_in(*col, &count) as i32, top, &count, Some(color), bold);
        term.set_str(center_in(*col, bucket.label) as i32, bars.label_row as i32, bucket.label, Some(color), bold);
    }

    let (text, _) = colors.role(Role::Text);
    match state.selected() {
        Some(bucket) => {
            let (sel, bold) = colors.role(Role::Selected);
            let prefix = "Filtering by magnitude: ";
            let range = format!("{} - {}", format_number(Some(bucket.min)), format_number(Some(bucket.max)));
            let x = bars.plot.x as i32 + 1;
            let y = bars.filter_row as i32;
            term.set_str(x, y, prefix, Some(text), false);
            term.set_str(x + prefix.len() as i32, y, &range, Some(sel), bold);
            term.set_str(x + (prefix.len() + range.len() + 2) as i32, y, "[c] Clear", Some(text), false);
        }
        None => {
            let (muted, _) = colors.role(Role::Muted);
            term.set_str(bars.plot.x as i32 + 1, bars.filter_row as i32, "Click a bar to filter by magnitude", Some(muted), false);
        }
    }
}

fn draw_scatter(term: &mut Terminal, area: Area, plot: Option<Area>, state: &DashboardState, colors: &ColorState) {
    let panel = Panel::new(area, "Scatter Plot");
    panel.draw(term, colors);
    let inner = panel.inner();
    let Some(plot) = plot else {
        return;
    };

    let (text, _) = colors.role(Role::Text);
    let (muted, _) = colors.role(Role::Muted);
    let (title, bold) = colors.role(Role::Title);

    let points = project(state.observations(), state.x_axis, state.y_axis);
    let selectors = format!("X-Axis: {:<10} Y-Axis: {}", state.x_axis.name(), state.y_axis.name());
    term.set_str(inner.x as i32, inner.y as i32, &fit(&selectors, inner.width as usize), Some(text), false);
    let caption = format!("{} ({} points)", dataset_label(state.x_axis, state.y_axis), points.len());
    term.set_str(inner.x as i32, inner.y as i32 + 1, &fit(&caption, inner.width as usize), Some(title), bold);

    let (Some(x_range), Some(y_range)) = (
        extent(points.iter().map(|p| p.x)),
        extent(points.iter().map(|p| p.y)),
    ) else {
        draw_centered_in(term, plot, "No data for these axes", (muted, false));
        return;
    };

    // y gutter: max on top, min at the bottom, field name in between
    let gutter = Y_LABEL_WIDTH as usize - 1;
    term.set_str(inner.x as i32, plot.y as i32, &fit(&short_number(y_range.1), gutter), Some(muted), false);
    term.set_str(inner.x as i32, plot.bottom() as i32 - 1, &fit(&short_number(y_range.0), gutter), Some(muted), false);
    if plot.height >= 3 {
        let y_title = fit(state.y_axis.name(), gutter);
        term.set_str(inner.x as i32, (plot.y + plot.height / 2) as i32, &y_title, Some(text), false);
    }

    let x_row = plot.bottom() as i32;
    let lo = short_number(x_range.0);
    let hi = short_number(x_range.1);
    term.set_str(plot.x as i32, x_row, &lo, Some(muted), false);
    term.set_str((plot.right() as usize).saturating_sub(hi.len()) as i32, x_row, &hi, Some(muted), false);
    let x_title = state.x_axis.name();
    if let Some(x) = x_title_column(plot, lo.len(), hi.len(), x_title.len()) {
        term.set_str(x as i32, x_row, x_title, Some(text), false);
    }

    let (dot_color, _) = colors.role(Role::Point);
    for (cx, cy, ch) in braille_cells(&points, plot.width as usize, plot.height as usize, x_range, y_range) {
        term.set(plot.x as i32 + cx as i32, plot.y as i32 + cy as i32, ch, Some(dot_color), false);
    }
}

/// Column for the x title: centered when it clears both range labels,
/// otherwise pushed into the gap between them, None if there is no gap
fn x_title_column(plot: Area, lo_len: usize, hi_len: usize, title_len: usize) -> Option<u16> {
    let first = plot.x as usize + lo_len + 1;
    let last = (plot.right() as usize).checked_sub(hi_len + 1 + title_len)?;
    if first > last {
        return None;
    }
    let centered = plot.x as usize + (plot.width as usize).saturating_sub(title_len) / 2;
    Some(centered.clamp(first, last) as u16)
}

/// Dot coordinates of a point on a `dot_w` x `dot_h` braille grid
fn dot_position(
    p: &ScatterPoint,
    dot_w: usize,
    dot_h: usize,
    (x_lo, x_hi): (f64, f64),
    (y_lo, y_hi): (f64, f64),
) -> (usize, usize) {
    let fx = (p.x - x_lo) / (x_hi - x_lo);
    let fy = (p.y - y_lo) / (y_hi - y_lo);
    let dx = (fx * (dot_w - 1) as f64).round().clamp(0.0, (dot_w - 1) as f64) as usize;
    // screen y grows downward
    let dy = ((1.0 - fy) * (dot_h - 1) as f64).round().clamp(0.0, (dot_h - 1) as f64) as usize;
    (dx, dy)
}

/// Point nearest to the hovered cell, if one is drawn close enough
fn hovered_point(state: &DashboardState, plot: Area) -> Option<ScatterPoint> {
    let (hx, hy) = state.hover?;
    let points = project(state.observations(), state.x_axis, state.y_axis);
    let x_range = extent(points.iter().map(|p| p.x))?;
    let y_range = extent(points.iter().map(|p| p.y))?;
    let (dot_w, dot_h) = (plot.width as usize * 2, plot.height as usize * 4);
    if dot_w == 0 || dot_h == 0 {
        return None;
    }

    // center of the hovered cell, in cell units
    let cx = hx as f64 + 0.5;
    let cy = hy as f64 + 0.5;
    points
        .into_iter()
        .map(|p| {
            let (dx, dy) = dot_position(&p, dot_w, dot_h, x_range, y_range);
            let ex = (dx as f64 + 0.5) / 2.0 - cx;
            let ey = (dy as f64 + 0.5) / 4.0 - cy;
            (ex * ex + ey * ey, p)
        })
        .filter(|(d, _)| *d <= HOVER_RADIUS * HOVER_RADIUS)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p)
}

/// Rasterize points onto a braille grid (2x4 dots per cell)
pub fn braille_cells(
    points: &[ScatterPoint],
    cols: usize,
    rows: usize,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Vec<(usize, usize, char)> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let dot_w = cols * 2;
    let dot_h = rows * 4;
    let mut cells = vec![0u8; cols * rows];

    for p in points {
        let (dx, dy) = dot_position(p, dot_w, dot_h, x_range, y_range);

        let bit = match (dx % 2, dy % 4) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (0, _) => 0x40,
            _ => 0x80,
        };
        cells[(dy / 4) * cols + dx / 2] |= bit;
    }

    cells
        .iter()
        .enumerate()
        .filter(|(_, dots)| **dots != 0)
        .map(|(i, dots)| {
            let ch = char::from_u32(0x2800 + *dots as u32).unwrap_or('•');
            (i % cols, i / cols, ch)
        })
        .collect()
}

fn draw_table<Tz: TimeZone>(term: &mut Terminal, area: Area, state: &DashboardState, colors: &ColorState, tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    let panel = Panel::new(area, "Data Table");
    panel.draw(term, colors);
    let inner = panel.inner();
    if inner.height < 3 || inner.width < 20 {
        return;
    }

    let (title, bold) = colors.role(Role::Title);
    let (text, _) = colors.role(Role::Text);
    let (muted, _) = colors.role(Role::Muted);

    let (widths, time_format) = column_widths(inner.width as usize);
    let header = join_cells(&HEADERS, &widths);
    term.set_str(inner.x as i32, inner.y as i32, &header, Some(title), bold);

    let observations = state.observations();
    // header on top, position footer at the bottom
    let visible = inner.height as usize - 2;
    let start = state.table_offset.min(observations.len());
    let end = (start + visible).min(observations.len());

    for (i, row) in table_rows(&observations[start..end], tz, time_format).iter().enumerate() {
        let line = join_cells(&row.cells(), &widths);
        term.set_str(inner.x as i32, inner.y as i32 + 1 + i as i32, &line, Some(text), false);
    }

    let footer = if observations.is_empty() {
        "no rows".to_string()
    } else {
        format!("rows {}-{} of {}", start + 1, end, observations.len())
    };
    term.set_str(inner.x as i32, inner.bottom() as i32 - 1, &footer, Some(muted), false);
}

const MIN_PLACE: usize = 8;
const GAPS: usize = HEADERS.len() - 1;

/// Widths for Place, Magnitude, Depth, Time. Place takes whatever the other
/// columns leave; narrow tables switch to the short time format, and if
/// that still does not fit, columns give up cells from the left.
/// The joined line never exceeds `total`.
fn column_widths(total: usize) -> ([usize; 4], TimeFormat) {
    let avail = total.saturating_sub(GAPS);
    let long = [9, 7, TimeFormat::Long.width()];
    let (fixed, format) = if avail >= MIN_PLACE + long.iter().sum::<usize>() {
        (long, TimeFormat::Long)
    } else {
        ([5, 5, TimeFormat::Short.width()], TimeFormat::Short)
    };

    let mut widths = [avail.saturating_sub(fixed.iter().sum()), fixed[0], fixed[1], fixed[2]];
    let mut over = widths.iter().sum::<usize>().saturating_sub(avail);
    for w in widths.iter_mut() {
        let cut = over.min(*w);
        *w -= cut;
        over -= cut;
    }
    (widths, format)
}

fn join_cells(cells: &[&str], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| fit(cell, *w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width > 1 {
        let mut s: String = text.chars().take(width - 1).collect();
        s.push('…');
        s
    } else {
        text.chars().take(width).collect()
    }
}

fn short_number(v: f64) -> String {
    if v.abs() >= 1000.0 || v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

fn center_in(area: Area, text: &str) -> u16 {
    area.x + area.width.saturating_sub(text.chars().count() as u16) / 2
}

fn draw_centered(term: &mut Terminal, width: u16, y: u16, text: &str, (color, bold): (crossterm::style::Color, bool)) {
    let x = width.saturating_sub(text.chars().count() as u16) / 2;
    term.set_str(x as i32, y as i32, text, Some(color), bold);
}

fn draw_centered_in(term: &mut Terminal, area: Area, text: &str, (color, bold): (crossterm::style::Color, bool)) {
    let y = area.y + area.height / 2;
    term.set_str(center_in(area, text) as i32, y as i32, text, Some(color), bold);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quake::{sample, Field};
    use crate::state::Action;
    use chrono::Utc;

    fn frame(state: &DashboardState) -> (Terminal, DashboardLayout) {
        let mut term = Terminal::headless(120, 40);
        let layout = render(&mut term, state, &ColorState::new(7), "test", &Utc);
        (term, layout)
    }

    fn screen(term: &Terminal) -> String {
        let (_, h) = term.size();
        (0..h).map(|y| term.row_text(y)).collect::<Vec<_>>().join("\n")
    }

    fn one_event() -> DashboardState {
        DashboardState::new(Field::Magnitude, Field::Depth).apply(Action::Loaded(vec![sample(
            "ev1",
            "Test Location",
            Some(3.5),
            Some(10.0),
        )]))
    }

    #[test]
    fn empty_state_shows_fetching() {
        let (term, _) = frame(&DashboardState::new(Field::Magnitude, Field::Depth));
        assert!(screen(&term).contains("Fetching earthquake feed..."));
    }

    #[test]
    fn failure_is_visible() {
        let state = DashboardState::new(Field::Magnitude, Field::Depth)
            .apply(Action::LoadFailed("network error: refused".into()));
        let (term, _) = frame(&state);
        let text = screen(&term);
        assert!(text.contains("Error: network error: refused"));
        assert!(text.contains("Press r to reload"));
    }

    #[test]
    fn single_event_frame() {
        let (term, layout) = frame(&one_event());
        let text = screen(&term);

        let labels = term.row_text(layout.bars.label_row);
        for b in BUCKETS {
            assert!(labels.contains(b.label));
        }
        // the "3-4" bar is the only one with a count of 1
        let col = layout.bars.columns[3];
        let counts: String = (layout.bars.plot.y..layout.bars.plot.bottom())
            .map(|y| term.row_text(y))
            .collect();
        assert_eq!(counts.matches('1').count(), 1);
        assert_eq!(term.get(col.x, layout.bars.plot.bottom() - 1).map(|c| c.ch), Some('█'));

        assert!(text.contains("depth vs magnitude (1 points)"));
        assert!(text.contains("Test Location"));
        assert!(text.contains("11/14/2023, 10:13:20 PM"));
        assert!(text.contains("rows 1-1 of 1"));
    }

    #[test]
    fn selected_bucket_shows_filter_but_keeps_table() {
        let base = one_event();
        let (before, _) = frame(&base);
        let selected = base.apply(Action::SelectBucket(0));
        let (after, layout) = frame(&selected);

        assert!(after.row_text(layout.bars.filter_row).contains("Filtering by magnitude: 0 - 1"));
        for y in layout.table.y..layout.table.bottom() {
            let right = |t: &Terminal| -> String {
                (layout.table.x..layout.table.right())
                    .map(|x| t.get(x, y).map_or(' ', |c| c.ch))
                    .collect()
            };
            assert_eq!(right(&before), right(&after));
        }
    }

    #[test]
    fn braille_maps_corners() {
        let pts = vec![
            ScatterPoint { x: 0.0, y: 0.0, label: String::new() },
            ScatterPoint { x: 1.0, y: 1.0, label: String::new() },
        ];
        let cells = braille_cells(&pts, 2, 2, (0.0, 1.0), (0.0, 1.0));
        // low-left point sits in the bottom-left dot of cell (0,1)
        // high-right point sits in the top-right dot of cell (1,0)
        assert!(cells.contains(&(0, 1, '\u{2840}')));
        assert!(cells.contains(&(1, 0, '\u{2808}')));
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
    }

    #[test]
    fn column_widths_never_overflow() {
        let (widths, format) = column_widths(80);
        assert_eq!(format, TimeFormat::Long);
        assert_eq!(widths, [80 - 39 - 3, 9, 7, 23]);

        let (widths, format) = column_widths(38);
        assert_eq!(format, TimeFormat::Short);
        assert_eq!(widths[3], TimeFormat::Short.width());
        for total in 0..140 {
            let (widths, _) = column_widths(total);
            assert!(widths.iter().sum::<usize>() + GAPS <= total.max(GAPS), "width {}", total);
        }
    }

    #[test]
    fn x_title_avoids_range_labels() {
        let plot = Area { x: 10, y: 0, width: 40, height: 5 };
        let x = x_title_column(plot, 3, 3, 9).unwrap();
        assert!(x >= 14 && x + 9 <= 46);
        // no room between "-118" and "-117.5"
        let narrow = Area { x: 10, y: 0, width: 14, height: 5 };
        assert_eq!(x_title_column(narrow, 4, 6, 9), None);
    }

    #[test]
    fn zero_features_render_empty_views() {
        let state = DashboardState::new(Field::Magnitude, Field::Depth).apply(Action::Loaded(vec![]));
        let (term, layout) = frame(&state);
        let text = screen(&term);

        let count_row = layout.bars.plot.bottom() - 1;
        for col in layout.bars.columns {
            let count: String = (col.x..col.right()).filter_map(|x| term.get(x, count_row)).map(|c| c.ch).collect();
            assert_eq!(count.trim(), "0");
        }
        assert!(text.contains("0 events"));
        assert!(text.contains("depth vs magnitude (0 points)"));
        assert!(text.contains("No data for these axes"));
        assert!(text.contains("no rows"));
        assert!(!text.contains("Error"));
        assert!(!text.contains("Fetching"));
    }

    #[test]
    fn narrow_table_keeps_border_and_time() {
        let mut term = Terminal::headless(80, 24);
        let layout = render(&mut term, &one_event(), &ColorState::new(7), "test", &Utc);
        let border_x = layout.table.right() - 1;
        for y in layout.table.y + 1..layout.table.bottom() - 1 {
            assert_eq!(term.get(border_x, y).map(|c| c.ch), Some('│'), "row {}", y);
        }
        let row = term.row_text(layout.table.y + 2);
        assert!(row.contains("11/14 22:13"), "{}", row);
        assert!(row.contains("3.5"));
    }

    #[test]
    fn both_axis_titles_drawn() {
        let (term, layout) = frame(&one_event());
        let plot = layout.scatter_plot.unwrap();
        let gutter: String = term.row_text(plot.y + plot.height / 2).chars().take(Y_LABEL_WIDTH as usize + 1).collect();
        assert!(gutter.contains("depth"), "{}", gutter);
        let x_row = term.row_text(plot.bottom());
        assert!(x_row.contains("magnitude"));
        assert!(x_row.contains("2.5") && x_row.contains("4.5"));
    }

    #[test]
    fn hovering_a_dot_shows_its_details() {
        let base = one_event();
        let (term, layout) = frame(&base);
        let plot = layout.scatter_plot.unwrap();
        let dot = (0..plot.height)
            .flat_map(|y| (0..plot.width).map(move |x| (x, y)))
            .find(|&(x, y)| term.get(plot.x + x, plot.y + y).is_some_and(|c| ('\u{2801}'..='\u{28ff}').contains(&c.ch)))
            .unwrap();

        let (term, layout) = frame(&base.clone().apply(Action::HoverScatter(Some(dot))));
        assert_eq!(
            term.row_text(layout.status_row).trim(),
            "Test Location | magnitude: 3.5, depth: 10"
        );

        // far corner: nothing close enough
        let (term, layout) = frame(&base.apply(Action::HoverScatter(Some((0, 0)))));
        assert!(!term.row_text(layout.status_row).contains("Test Location"));
    }
}
