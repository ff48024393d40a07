use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the slideshow video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Validate inputs and print the frame/cue timeline as JSON.
    Plan(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Caption script, one caption per line.
    #[arg(long, default_value = "report.txt")]
    script: PathBuf,

    /// Sound catalog JSON.
    #[arg(long, default_value = "sounds/sounds.json")]
    sounds: PathBuf,

    /// Directory holding `<index>.png` slides and the closing image.
    #[arg(long, default_value = "imgs")]
    images: PathBuf,

    /// Caption font file.
    #[arg(long, default_value = "imgs/pixelplay.ttf")]
    font: PathBuf,

    /// Directory sound filenames are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Render settings JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output frame rate.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Final video path.
    #[arg(long, default_value = "jail.mp4")]
    out: PathBuf,

    /// Keep the intermediate video and audio files.
    #[arg(long)]
    keep_temp: bool,
}

impl InputArgs {
    fn settings(&self) -> anyhow::Result<slidecast::RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => slidecast::RenderSettings::load_json(path)?,
            None => slidecast::RenderSettings::default(),
        };
        if let Some(fps) = self.fps {
            settings.fps = slidecast::Fps::new(fps, 1)?;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn inputs(&self) -> slidecast::Inputs {
        slidecast::Inputs {
            script: self.script.clone(),
            sounds: self.sounds.clone(),
            images: self.images.clone(),
            font: self.font.clone(),
            assets_root: self.root.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = args.input.settings()?;
    let outputs = slidecast::OutputPaths {
        video: args.out.clone(),
        keep_temp: args.keep_temp,
        ..slidecast::OutputPaths::default()
    };

    let report = slidecast::render_slideshow(&args.input.inputs(), &outputs, &settings)
        .with_context(|| format!("render '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames, {} cues)",
        args.out.display(),
        report.total_frames,
        report.cues.len()
    );
    Ok(())
}

fn cmd_plan(args: InputArgs) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let report = slidecast::plan_slideshow(&args.inputs(), &settings)?;
    let json = serde_json::to_string_pretty(&report).context("serialize timeline")?;
    println!("{json}");
    Ok(())
}
