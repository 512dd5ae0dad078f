use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelsmith::narration::Completion;
use reelsmith::reel::ReelTheme;
use reelsmith::templates::{ReelTemplate, DEFAULT_CLIP_COUNT};
use reelsmith::{
    reduce, AppConfig, JsonFileStore, PreviewEngine, ReelAction, ReelParser, ReelSession,
    ReelState, SymphoniaProbe, TransitionCalculator, TransitionKind,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "reelsmith")]
#[command(about = "Reel timeline and transition engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a reel and print its timeline
    Inspect {
        #[arg(value_name = "REEL")]
        reel: PathBuf,
    },

    /// Print the composition of one frame as JSON
    Frame {
        #[arg(value_name = "REEL")]
        reel: PathBuf,

        /// Absolute frame number
        #[arg(short, long, default_value_t = 0)]
        frame: u32,
    },

    /// Compose every frame and write the results to a directory
    Render {
        #[arg(value_name = "REEL")]
        reel: PathBuf,

        /// Output directory (defaults to render.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the per-frame style of a transition
    Transition {
        /// fade, slide, zoom, wipe, dissolve, blur or cut
        kind: String,

        /// Clip length in frames
        #[arg(short, long, default_value_t = 120)]
        duration: u32,

        /// Print every Nth frame
        #[arg(long, default_value_t = 5)]
        step: u32,
    },

    /// Generate a starter reel from the built-in content plan
    Template {
        #[arg(value_enum)]
        theme: ReelTheme,

        #[arg(short, long, default_value = "your topic")]
        prompt: String,

        #[arg(short, long, default_value_t = DEFAULT_CLIP_COUNT)]
        clips: usize,
    },

    /// Apply an action (JSON text or a path to a JSON file) to the saved reel
    Apply {
        #[arg(value_name = "ACTION")]
        action: String,

        /// State file (defaults to store.state_path)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Inspect { reel } => {
            let engine = load_engine(&reel, &config)?;

            println!("\n📋 Reel Summary:");
            println!("{}", ReelParser::summarize(engine.reel()));

            let timeline = engine.timeline();
            println!("🎞️  Timeline ({} fps):", timeline.fps());
            for segment in timeline.segments() {
                println!(
                    "  Clip {}: frames {}..{} ({} frames)",
                    segment.index + 1,
                    segment.start_frame,
                    segment.end_frame(),
                    segment.duration_frames
                );
            }
            println!(
                "  Total: {} frames ({:.2}s)",
                timeline.total_frames(),
                timeline.frame_to_time(timeline.total_frames())
            );
        }
        Commands::Frame { reel, frame } => {
            let engine = load_engine(&reel, &config)?;
            if frame >= engine.timeline().total_frames() {
                anyhow::bail!(
                    "frame {} is past the end of the reel ({} frames)",
                    frame,
                    engine.timeline().total_frames()
                );
            }
            println!("{}", serde_json::to_string_pretty(&engine.compose(frame))?);
        }
        Commands::Render { reel, output } => {
            println!("🎬 Rendering reel: {}", reel.display());
            let engine = load_engine(&reel, &config)?;
            let output_dir = output.unwrap_or_else(|| config.render.output_dir.clone());

            let summary = engine.render(&output_dir)?;
            println!(
                "\n✅ Composed {} frames for {} clips ({} narrations measured)",
                summary.frames, summary.clips, summary.measured_narrations
            );
            println!("   Output: {}", output_dir.display());
        }
        Commands::Transition {
            kind,
            duration,
            step,
        } => {
            let kind = TransitionKind::from_name(&kind);
            let calculator = TransitionCalculator::new(&config.composition);
            println!("Transition: {} over a {}-frame clip", kind, duration);
            for frame in (0..=duration).step_by(step.max(1) as usize) {
                let style = calculator.style_for(kind, 0, frame as i64, duration);
                let css: Vec<String> = style
                    .css()
                    .into_iter()
                    .map(|(prop, value)| format!("{}: {}", prop, value))
                    .collect();
                println!("  {:>4}  {}", frame, css.join("; "));
            }
        }
        Commands::Template {
            theme,
            prompt,
            clips,
        } => {
            let content = ReelTemplate::fallback(&prompt, Some(theme), clips);
            let reel = reduce(
                &ReelState::default(),
                ReelAction::SubmitPrompt {
                    prompt,
                    content,
                    bg_music: None,
                },
            );
            println!("{}", serde_json::to_string_pretty(&reel)?);
        }
        Commands::Apply { action, state } => {
            let raw = if Path::new(&action).is_file() {
                std::fs::read_to_string(&action)
                    .with_context(|| format!("Failed to read action file: {}", action))?
            } else {
                action
            };
            let action: ReelAction = serde_json::from_str(&raw).context("Invalid action JSON")?;

            let path = state.unwrap_or_else(|| config.store.state_path.clone());
            let clears = matches!(action, ReelAction::NewReel);
            let mut session = ReelSession::open(JsonFileStore::new(&path));
            let reel = session.dispatch(action)?;

            if clears {
                println!("🗑️  Session cleared: {}", path.display());
            } else if reel.prompt.is_empty() {
                println!("ℹ️  No active reel; nothing saved");
            } else {
                println!("💾 Saved reel to {}", path.display());
                println!("{}", ReelParser::summarize(reel));
            }
        }
    }

    Ok(())
}

/// Parse a reel document and measure its narration
fn load_engine(path: &Path, config: &AppConfig) -> Result<PreviewEngine> {
    let reel = ReelParser::parse_json(path)?;
    let base_path = path.parent().unwrap_or_else(|| Path::new("."));

    let mut engine = PreviewEngine::new(
        reel,
        config.composition,
        Arc::new(SymphoniaProbe::new(base_path)),
    );
    for outcome in engine.refresh_narration() {
        if let Completion::Failed { clip_id, reason } = outcome {
            eprintln!("  ✗ Narration for clip {} unavailable: {}", clip_id, reason);
        }
    }
    Ok(engine)
}
