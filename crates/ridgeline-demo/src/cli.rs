use std::path::PathBuf;

use clap::{ArgAction, Parser};
use ridgeline::SnapConfig;
use ridgeline::runtime::logging::{self, LogFormat};

use crate::error::{DemoError, Result};
use crate::layout::PageLayout;
use crate::replay::{Activation, ReplayOptions, render_text, replay};

#[derive(Debug, Parser)]
#[command(
    name = "ridgeline-demo",
    about = "Replay scroll gestures against a page layout and report snap decisions",
    version
)]
pub struct Cli {
    /// Page layout (TOML).
    #[arg(long, value_name = "PAGE.toml")]
    pub layout: PathBuf,

    /// Viewport height in pixels; overrides the layout.
    #[arg(long, value_name = "PX")]
    pub viewport: Option<f64>,

    /// Scroll offsets at which a gesture ends, replayed in order.
    #[arg(long = "gesture", value_name = "Y", num_args = 1..)]
    pub gestures: Vec<f64>,

    /// Snap config (TOML); replaces the layout's `[config]` table.
    #[arg(long, value_name = "SNAP.toml")]
    pub config: Option<PathBuf>,

    /// How snapping gets activated.
    #[arg(long, value_enum, default_value_t = Activation::Events)]
    pub activation: Activation,

    /// Wait out fallback delays on the wall clock.
    #[arg(long)]
    pub realtime: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log verbosity (-v debug, -vv trace). `RUST_LOG` applies otherwise.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let output = run(&cli)?;
    print!("{output}");
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    match verbose {
        0 => logging::init(LogFormat::default())?,
        1 => logging::init_with("warn,ridgeline=debug", LogFormat::default())?,
        _ => logging::init_with("warn,ridgeline=trace", LogFormat::default())?,
    }
    Ok(())
}

/// Run the replay described by `cli` and render its output.
pub fn run(cli: &Cli) -> Result<String> {
    if let Some(v) = cli.viewport
        && !(v.is_finite() && v > 0.0)
    {
        return Err(DemoError::invalid(format!(
            "--viewport must be positive, got {v}"
        )));
    }

    let layout = PageLayout::from_file(&cli.layout)?;
    let config = match &cli.config {
        Some(path) => SnapConfig::from_toml_file(path)?,
        None => layout.config.clone(),
    }
    .validated()?;

    let opts = ReplayOptions {
        viewport: cli.viewport,
        gestures: cli.gestures.clone(),
        activation: cli.activation,
        realtime: cli.realtime,
    };
    let report = replay(&layout, config, &opts)?;

    if cli.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(render_text(&report))
    }
}
