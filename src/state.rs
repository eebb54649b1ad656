//! Dashboard state and the reducer that moves it forward
//!
//! Everything the renderer needs lives in one [`DashboardState`]. Input
//! handling turns events into [`Action`]s and folds them in with
//! [`DashboardState::apply`]; nothing mutates the state behind its back.

use crate::histogram::{Bucket, BUCKETS};
use crate::quake::{Field, Observation};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Empty,
    Loaded(Arc<[Observation]>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Loaded(Vec<Observation>),
    LoadFailed(String),
    SelectBucket(usize),
    ClearBucket,
    SetXAxis(Field),
    SetYAxis(Field),
    ScrollTable(isize),
    ScrollTableToTop,
    ScrollTableToBottom,
    /// Cursor cell over the scatter plot, relative to the plot's top-left
    HoverScatter(Option<(u16, u16)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub load: LoadState,
    /// Error from a reload that failed while older data stayed on screen
    pub banner: Option<String>,
    pub selected_bucket: Option<usize>,
    pub x_axis: Field,
    pub y_axis: Field,
    pub table_offset: usize,
    pub hover: Option<(u16, u16)>,
}

impl DashboardState {
    pub fn new(x_axis: Field, y_axis: Field) -> Self {
        Self {
            load: LoadState::Empty,
            banner: None,
            selected_bucket: None,
            x_axis,
            y_axis,
            table_offset: 0,
            hover: None,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        match &self.load {
            LoadState::Loaded(obs) => obs,
            LoadState::Empty | LoadState::Failed(_) => &[],
        }
    }

    pub fn selected(&self) -> Option<&'static Bucket> {
        self.selected_bucket.and_then(|i| BUCKETS.get(i))
    }

    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::Loaded(obs) => Self {
                load: LoadState::Loaded(obs.into()),
                banner: None,
                table_offset: 0,
                ..self
            },
            Action::LoadFailed(msg) => match self.load {
                LoadState::Loaded(_) => Self {
                    banner: Some(msg),
                    ..self
                },
                LoadState::Empty | LoadState::Failed(_) => Self {
                    load: LoadState::Failed(msg),
                    banner: None,
                    ..self
                },
            },
            Action::SelectBucket(i) if i < BUCKETS.len() => Self {
                selected_bucket: Some(i),
                ..self
            },
            Action::SelectBucket(_) => self,
            Action::ClearBucket => Self {
                selected_bucket: None,
                ..self
            },
            Action::SetXAxis(x_axis) => Self { x_axis, ..self },
            Action::SetYAxis(y_axis) => Self { y_axis, ..self },
            Action::ScrollTable(delta) => {
                let last = self.last_row();
                let offset = self.table_offset.saturating_add_signed(delta).min(last);
                Self {
                    table_offset: offset,
                    ..self
                }
            }
            Action::ScrollTableToTop => Self {
                table_offset: 0,
                ..self
            },
            Action::ScrollTableToBottom => Self {
                table_offset: self.last_row(),
                ..self
            },
            Action::HoverScatter(hover) => Self { hover, ..self },
        }
    }

    fn last_row(&self) -> usize {
        self.observations().len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quake::sample;

    fn loaded(n: usize) -> DashboardState {
        let obs = (0..n)
            .map(|i| sample(&format!("e{}", i), "p", Some(i as f64 * 0.7), Some(5.0)))
            .collect();
        DashboardState::new(Field::Magnitude, Field::Depth).apply(Action::Loaded(obs))
    }

    #[test]
    fn starts_empty_with_default_axes() {
        let s = DashboardState::new(Field::Magnitude, Field::Depth);
        assert_eq!(s.load, LoadState::Empty);
        assert!(s.observations().is_empty());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn selectors_never_touch_observations() {
        let s = loaded(12);
        let actions = [
            Action::SelectBucket(3),
            Action::SetXAxis(Field::Latitude),
            Action::SetYAxis(Field::Longitude),
            Action::ScrollTable(5),
            Action::ClearBucket,
            Action::HoverScatter(Some((2, 3))),
            Action::SelectBucket(5),
        ];
        let mut state = s;
        for a in actions {
            state = state.apply(a);
            assert_eq!(state.observations().len(), 12);
        }
        assert_eq!(state.selected().map(|b| b.label), Some("5+"));
        assert_eq!(state.x_axis, Field::Latitude);
        assert_eq!(state.y_axis, Field::Longitude);
    }

    #[test]
    fn select_and_clear_bucket() {
        let s = loaded(3).apply(Action::SelectBucket(2));
        assert_eq!(s.selected_bucket, Some(2));
        let s = s.apply(Action::SelectBucket(99));
        assert_eq!(s.selected_bucket, Some(2));
        let s = s.apply(Action::ClearBucket);
        assert_eq!(s.selected_bucket, None);
    }

    #[test]
    fn reload_replaces_set_and_keeps_selectors() {
        let s = loaded(8)
            .apply(Action::SelectBucket(1))
            .apply(Action::SetXAxis(Field::Longitude))
            .apply(Action::ScrollTable(4));
        assert_eq!(s.table_offset, 4);

        let s = s.apply(Action::Loaded(vec![sample("z", "z", Some(1.0), None)]));
        assert_eq!(s.observations().len(), 1);
        assert_eq!(s.observations()[0].id, "z");
        assert_eq!(s.selected_bucket, Some(1));
        assert_eq!(s.x_axis, Field::Longitude);
        assert_eq!(s.table_offset, 0);
    }

    #[test]
    fn failure_before_data_is_failed_state() {
        let s = DashboardState::new(Field::Magnitude, Field::Depth)
            .apply(Action::LoadFailed("network error: down".into()));
        assert_eq!(s.load, LoadState::Failed("network error: down".into()));
        assert!(s.observations().is_empty());
    }

    #[test]
    fn failed_reload_keeps_data_and_sets_banner() {
        let s = loaded(4).apply(Action::LoadFailed("parse error".into()));
        assert_eq!(s.observations().len(), 4);
        assert_eq!(s.banner.as_deref(), Some("parse error"));

        let s = s.apply(Action::Loaded(vec![]));
        assert_eq!(s.banner, None);
        assert!(matches!(s.load, LoadState::Loaded(_)));
    }

    #[test]
    fn hover_follows_cursor_and_survives_reload() {
        let s = loaded(3).apply(Action::HoverScatter(Some((4, 1))));
        assert_eq!(s.hover, Some((4, 1)));
        let s = s.apply(Action::Loaded(vec![sample("n", "n", Some(2.0), Some(2.0))]));
        assert_eq!(s.hover, Some((4, 1)));
        let s = s.apply(Action::HoverScatter(None));
        assert_eq!(s.hover, None);
    }

    #[test]
    fn scroll_is_clamped() {
        let s = loaded(5).apply(Action::ScrollTable(-3));
        assert_eq!(s.table_offset, 0);
        let s = s.apply(Action::ScrollTable(100));
        assert_eq!(s.table_offset, 4);
        let s = s.apply(Action::ScrollTableToTop);
        assert_eq!(s.table_offset, 0);
        let s = s.apply(Action::ScrollTableToBottom);
        assert_eq!(s.table_offset, 4);

        let empty = DashboardState::new(Field::Magnitude, Field::Depth).apply(Action::ScrollTable(3));
        assert_eq!(empty.table_offset, 0);
    }
}
