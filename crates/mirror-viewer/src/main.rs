//! Display mirror entry point.
//!
//! Connects to the target X display named on the command line, opens a
//! local window at a fraction of the target's size, and runs the session
//! loop until the window is closed or the exit key is pressed.
//!
//! # Startup order
//!
//! 1. CLI arguments are parsed with `clap`.  Usage errors print to stderr
//!    and exit with status 1.
//! 2. The TOML config is loaded (a missing file means defaults) and CLI
//!    overrides are applied on top.
//! 3. `tracing_subscriber` is initialised.  `RUST_LOG` wins; otherwise the
//!    configured `log_level` is used.
//! 4. The target display and the local window are opened.  Either failing is
//!    fatal and exits with status 1 before the loop starts.
//! 5. The session runs; everything that goes wrong inside it is logged and
//!    recovered locally.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror_viewer::application::present_frame::TickStats;
use mirror_viewer::infrastructure::storage::config::{
    config_file_path, load_config, ConfigError, ViewerConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Mirrors an X display into a local window and relays input back to it.
#[derive(Debug, Parser)]
#[command(name = "mirror-viewer", version)]
struct Cli {
    /// Target X display, e.g. `:1` or `host:0.0`.
    #[arg(value_name = "DISPLAY")]
    display: String,

    /// Config file to read instead of the default location.
    #[arg(long, env = "MIRROR_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `frame_interval_ms` from the config file.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    frame_interval_ms: Option<u64>,

    /// Overrides `log_level` from the config file.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file and layers the command-line overrides on top.
    fn resolve_config(&self) -> anyhow::Result<ViewerConfig> {
        self.resolve_config_with(config_file_path())
    }

    /// Like [`Cli::resolve_config`], with the default location supplied by the
    /// caller.  Without `--config` and without a platform config directory the
    /// defaults are used.
    fn resolve_config_with(
        &self,
        default_path: Result<PathBuf, ConfigError>,
    ) -> anyhow::Result<ViewerConfig> {
        let path = match (&self.config, default_path) {
            (Some(path), _) => Some(path.clone()),
            (None, Ok(path)) => Some(path),
            (None, Err(ConfigError::NoPlatformConfigDir)) => None,
            (None, Err(e)) => return Err(e.into()),
        };

        let mut viewer = match path {
            Some(path) => {
                load_config(&path)
                    .with_context(|| format!("cannot load config from {}", path.display()))?
                    .viewer
            }
            None => ViewerConfig::default(),
        };
        self.apply_overrides(&mut viewer);
        Ok(viewer)
    }

    fn apply_overrides(&self, viewer: &mut ViewerConfig) {
        if let Some(ms) = self.frame_interval_ms {
            viewer.frame_interval_ms = ms;
        }
        if let Some(level) = &self.log_level {
            viewer.log_level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print to stdout and exit 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let config = cli.resolve_config();
    let fallback_level = match (&config, &cli.log_level) {
        (Ok(viewer), _) => viewer.log_level.as_str(),
        (Err(_), Some(level)) => level.as_str(),
        (Err(_), None) => "info",
    };
    init_logging(fallback_level);

    let result = config.and_then(|viewer| run(&cli.display, &viewer));
    match result {
        Ok(stats) => {
            info!(%stats, "display mirror stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("mirror-viewer: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(fallback_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(target_os = "linux")]
fn run(display: &str, viewer: &ViewerConfig) -> anyhow::Result<TickStats> {
    use mirror_viewer::application::present_frame::FrameSource;
    use mirror_viewer::application::run_session::RunSessionUseCase;
    use mirror_viewer::infrastructure::display_surface::window::WinitDisplaySurface;
    use mirror_viewer::infrastructure::target_display::linux::X11TargetDisplay;

    let target = X11TargetDisplay::open(display)
        .with_context(|| format!("cannot connect to target display {display:?}"))?;
    let (width, height) = target.screen_size();
    let (window_width, window_height) = viewer.window_size_for(width, height);

    let surface = WinitDisplaySurface::open(&viewer.window_title, window_width, window_height)
        .context("cannot open the local window")?;

    let mut session = RunSessionUseCase::new(target, surface, viewer.to_session_config());
    Ok(session.run())
}

#[cfg(not(target_os = "linux"))]
fn run(_display: &str, _viewer: &ViewerConfig) -> anyhow::Result<TickStats> {
    use mirror_viewer::infrastructure::target_display::TargetError;

    Err(TargetError::Unsupported.into())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
