// beat-replay: run a recorded or autoplay input log against a note chart
// and print the result.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use beat_model::NoteChart;
use beat_replay::{InputLog, autoplay_log, run_replay};
use beat_rule::PlayerOptions;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "beat-replay", about = "Re-run recorded input against a note chart")]
struct Args {
    /// Note chart JSON (array of notes).
    #[arg(long)]
    chart: PathBuf,

    /// Input log to replay (JSON, gzip-compressed when ending in `.gz`).
    #[arg(long, conflicts_with = "autoplay")]
    replay: Option<PathBuf>,

    /// Player options JSON. Defaults are used when omitted.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Play the chart perfectly instead of replaying a log.
    #[arg(long)]
    autoplay: bool,

    /// Tick length for autoplay, in microseconds.
    #[arg(long, default_value_t = 16_667, env = "BEAT_REPLAY_TICK_US")]
    tick_us: i64,

    /// Write the input log that was played to this path.
    #[arg(long)]
    save_replay: Option<PathBuf>,

    /// Print every judgment, not just the final result.
    #[arg(long)]
    judgments: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    ensure!(args.tick_us > 0, "--tick-us must be positive, got {}", args.tick_us);

    let chart = load_chart(&args.chart)?;
    let options = match &args.options {
        Some(path) => load_options(path)?,
        None => PlayerOptions::default(),
    };
    info!(
        "loaded {} notes ({} judgments) from {}",
        chart.len(),
        chart.total_combo(),
        args.chart.display()
    );

    let log = match (&args.replay, args.autoplay) {
        (Some(path), false) => InputLog::read(path)?,
        (None, true) => autoplay_log(&chart, &options, args.tick_us)
            .context("Failed to generate autoplay input")?,
        _ => bail!("pass either --replay <PATH> or --autoplay"),
    };
    if let Some(path) = &args.save_replay {
        log.write(path)?;
        info!("input log saved to: {}", path.display());
    }

    let outcome = run_replay(&chart, &options, &log).context("Failed to set up player")?;
    let output = if args.judgments {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string_pretty(&outcome.result)
    }
    .context("Failed to serialize result")?;
    println!("{output}");
    Ok(())
}

fn load_chart(path: &Path) -> Result<NoteChart> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart: {}", path.display()))?;
    NoteChart::from_json_str(&json).with_context(|| format!("Invalid chart: {}", path.display()))
}

fn load_options(path: &Path) -> Result<PlayerOptions> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options: {}", path.display()))?;
    PlayerOptions::from_json_str(&json)
        .with_context(|| format!("Invalid options: {}", path.display()))
}
