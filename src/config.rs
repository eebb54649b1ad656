use crate::feed::FeedSource;
use crate::quake::Field;
use crate::settings::Settings;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIME_STEP: f32 = 0.05;

/// Values given on the command line; `None` means "use the config file"
#[derive(Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub x_axis: Option<Field>,
    pub y_axis: Option<Field>,
}

/// Configuration for a dashboard session
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub source: FeedSource,
    pub x_axis: Field,
    pub y_axis: Field,
    pub time_step: f32,
    pub print: bool,
    pub color_scheme: u8,
}

impl DashboardConfig {
    /// Command line beats config file beats built-in defaults.
    /// A local file wins over any URL.
    pub fn resolve(overrides: Overrides, settings: &Settings, time_step: f32, print: bool) -> Self {
        let source = match overrides.file {
            Some(path) => FeedSource::File(path),
            None => FeedSource::Url {
                url: overrides.url.unwrap_or_else(|| settings.feed.url.clone()),
                timeout: Duration::from_secs(settings.feed.timeout_secs.max(1)),
            },
        };

        Self {
            source,
            x_axis: overrides.x_axis.unwrap_or(settings.view.x_axis),
            y_axis: overrides.y_axis.unwrap_or(settings.view.y_axis),
            time_step: if time_step.is_finite() {
                time_step.clamp(0.01, 1.0)
            } else {
                DEFAULT_TIME_STEP
            },
            print,
            color_scheme: settings.view.color_scheme.min(9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::DEFAULT_FEED_URL;

    #[test]
    fn defaults_come_from_settings() {
        let cfg = DashboardConfig::resolve(Overrides::default(), &Settings::default(), 0.05, false);
        assert_eq!(
            cfg.source,
            FeedSource::Url {
                url: DEFAULT_FEED_URL.to_string(),
                timeout: Duration::from_secs(30)
            }
        );
        assert_eq!(cfg.x_axis, Field::Magnitude);
        assert_eq!(cfg.y_axis, Field::Depth);
        assert_eq!(cfg.color_scheme, 7);
    }

    #[test]
    fn cli_overrides_win() {
        let overrides = Overrides {
            url: Some("http://example.test/feed".into()),
            file: Some(PathBuf::from("week.geojson")),
            x_axis: Some(Field::Latitude),
            y_axis: None,
        };
        let cfg = DashboardConfig::resolve(overrides, &Settings::default(), 5.0, true);
        assert_eq!(cfg.source, FeedSource::File(PathBuf::from("week.geojson")));
        assert_eq!(cfg.x_axis, Field::Latitude);
        assert_eq!(cfg.y_axis, Field::Depth);
        assert_eq!(cfg.time_step, 1.0);
        assert!(cfg.print);
    }

    #[test]
    fn non_finite_time_step_uses_default() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let cfg = DashboardConfig::resolve(Overrides::default(), &Settings::default(), bad, false);
            assert_eq!(cfg.time_step, DEFAULT_TIME_STEP);
            // the event loop turns this into a Duration
            let _ = Duration::from_secs_f32(cfg.time_step);
        }
    }
}
