mod colors;
mod config;
mod dashboard;
mod feed;
mod help;
mod histogram;
mod quake;
mod scatter;
mod settings;
mod state;
mod table;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use config::{DashboardConfig, Overrides, DEFAULT_TIME_STEP};
use quake::Field;
use settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "quakeview")]
#[command(version)]
#[command(about = "Terminal dashboard for the USGS weekly earthquake feed", long_about = None)]
struct Cli {
    /// Feed URL (defaults to the USGS all_week summary)
    #[arg(short, long)]
    url: Option<String>,

    /// Read a saved geoJSON file instead of fetching
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Render one frame to stdout and exit
    #[arg(short, long)]
    print: bool,

    /// Scatter X axis: magnitude, depth, latitude, longitude
    #[arg(short = 'x', long = "x")]
    x_axis: Option<Field>,

    /// Scatter Y axis: magnitude, depth, latitude, longitude
    #[arg(short = 'y', long = "y")]
    y_axis: Option<Field>,

    /// Redraw interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIME_STEP, value_parser = parse_time_step)]
    time: f32,

    /// Log file (defaults to the user cache dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_time_step(s: &str) -> Result<f32, String> {
    let secs: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("time step must be a positive number of seconds, got {}", s));
    }
    Ok(secs)
}

/// File-only logging; the dashboard owns the terminal
fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("creating log dir {}", dir.display()))?;
    let file_name = path.file_name().unwrap_or(std::ffi::OsStr::new("quakeview.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry().with(file_layer).init();
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, settings_err) = match Settings::load() {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| settings.log.file.clone())
        .unwrap_or_else(Settings::default_log_path);
    let _guard = init_logging(&log_path)?;

    if let Some(e) = settings_err {
        warn!(error = %e, "ignoring config file");
    }

    let overrides = Overrides {
        url: cli.url,
        file: cli.file,
        x_axis: cli.x_axis,
        y_axis: cli.y_axis,
    };
    let config = DashboardConfig::resolve(overrides, &settings, cli.time, cli.print);
    info!(source = %config.source.describe(), x = %config.x_axis, y = %config.y_axis, "starting");

    if config.print {
        dashboard::print(config).context("printing dashboard")?;
    } else {
        dashboard::run(config).context("running dashboard")?;
    }
    Ok(())
}
