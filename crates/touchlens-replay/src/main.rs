use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use touchlens::logging::{init_logging, LoggingConfig};

mod replay;
mod trace;

use replay::{replay, FrameOutput};
use trace::Trace;

#[derive(Parser, Debug)]
#[command(name = "touchlens-replay", about = "Replay a touch trace through the touch debug overlay")]
struct Cli {
    /// JSON trace to replay.
    trace: PathBuf,

    /// Log filter in env_logger syntax (e.g. "touchlens=debug").
    #[arg(long, env = "TOUCHLENS_LOG")]
    log: Option<String>,

    /// Print frames as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let trace = Trace::load(&cli.trace)?;
    let base_dir = cli.trace.parent().unwrap_or(Path::new("."));
    let frames = replay(&trace, base_dir)?;

    if cli.json {
        let text = serde_json::to_string_pretty(&frames).context("failed to encode frames")?;
        println!("{text}");
    } else {
        print_frames(&frames);
    }

    Ok(())
}

fn print_frames(frames: &[FrameOutput]) {
    for frame in frames {
        println!("frame {:>4}  {} marker(s)", frame.frame, frame.markers.len());
        for m in &frame.markers {
            println!(
                "            draw {:>4}x{:<4} at ({:.1}, {:.1})",
                m.width, m.height, m.x, m.y
            );
        }
    }
}
