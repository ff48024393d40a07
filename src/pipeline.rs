use std::path::PathBuf;

use anyhow::Context as _;

use crate::{
    assets::catalog::SoundCatalog,
    assets::images::ImageLibrary,
    assets::script::{Line, Script},
    audio::export::export_compressed,
    audio::mix::{CueMixer, FfmpegPcmSource, MixOptions, random_picker},
    encode::ffmpeg::{FfmpegVideoOpts, FfmpegVideoSink, is_ffmpeg_on_path},
    encode::mux::{TempArtifacts, mux_av},
    encode::sink::NullSink,
    foundation::error::{SlidecastError, SlidecastResult},
    render::raster::{CpuCompositor, NullCompositor},
    settings::RenderSettings,
    text::layout::{TextBrushRgba8, TextLayoutEngine},
    timeline::engine::{TimelineEngine, TimelineReport},
};

/// Input files of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inputs {
    /// Caption script, one caption per line.
    pub script: PathBuf,
    /// Sound catalog JSON.
    pub sounds: PathBuf,
    /// Directory of slide images.
    pub images: PathBuf,
    /// Caption font file.
    pub font: PathBuf,
    /// Directory that sound filenames are resolved against.
    pub assets_root: PathBuf,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            script: PathBuf::from("report.txt"),
            sounds: PathBuf::from("sounds/sounds.json"),
            images: PathBuf::from("imgs"),
            font: PathBuf::from("imgs/pixelplay.ttf"),
            assets_root: PathBuf::from("."),
        }
    }
}

/// Output and intermediate files of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// Final muxed video.
    pub video: PathBuf,
    /// Silent intermediate video.
    pub temp_video: PathBuf,
    /// Compressed intermediate soundtrack.
    pub temp_audio: PathBuf,
    /// Leave the intermediates on disk.
    pub keep_temp: bool,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            video: PathBuf::from("jail.mp4"),
            temp_video: PathBuf::from("temp.mp4"),
            temp_audio: PathBuf::from("temp.mp3"),
            keep_temp: false,
        }
    }
}

struct PreparedRun {
    catalog: SoundCatalog,
    library: ImageLibrary,
    lines: Vec<Line>,
}

// Every configuration check happens here, before a single frame exists.
fn prepare(inputs: &Inputs, settings: &RenderSettings) -> SlidecastResult<PreparedRun> {
    settings.validate()?;
    let catalog = SoundCatalog::load(&inputs.sounds)?;
    let library = ImageLibrary::scan(&inputs.images, settings.terminal_image.clone())?;
    let script = Script::load(&inputs.script)?;
    script.check_capacity(library.available())?;

    let lines = script.into_lines(&settings.terminal_text);
    tracing::info!(
        lines = lines.len(),
        images = library.available(),
        "inputs validated"
    );
    Ok(PreparedRun {
        catalog,
        library,
        lines,
    })
}

/// Validate the inputs and compute the timeline without drawing, encoding or mixing.
#[tracing::instrument(skip_all)]
pub fn plan_slideshow(inputs: &Inputs, settings: &RenderSettings) -> SlidecastResult<TimelineReport> {
    let run = prepare(inputs, settings)?;
    let mut compositor = NullCompositor;
    let mut sink = NullSink::default();
    TimelineEngine::new(settings, &mut compositor, &mut sink)?.run(&run.lines)
}

/// Render the full video: frames, soundtrack and final mux.
///
/// Intermediate files are removed on every exit path unless `outputs.keep_temp` is set.
#[tracing::instrument(skip_all, fields(out = %outputs.video.display()))]
pub fn render_slideshow(
    inputs: &Inputs,
    outputs: &OutputPaths,
    settings: &RenderSettings,
) -> SlidecastResult<TimelineReport> {
    let run = prepare(inputs, settings)?;
    if !is_ffmpeg_on_path() {
        return Err(SlidecastError::encode(
            "ffmpeg is required to render, but was not found on PATH",
        ));
    }

    let images = run
        .library
        .prepare(run.lines.iter().map(|l| l.image_key))?;
    let font_bytes = std::fs::read(&inputs.font)
        .with_context(|| format!("read font '{}'", inputs.font.display()))?;
    let [r, g, b] = settings.text_rgb;
    let text = TextLayoutEngine::new(
        font_bytes,
        settings.font_size_px,
        TextBrushRgba8 { r, g, b, a: 255 },
    )?;
    let mut compositor =
        CpuCompositor::new(settings.canvas, images, text, settings.wrap_width_px)?;

    let _temps = TempArtifacts::new(
        [outputs.temp_video.clone(), outputs.temp_audio.clone()],
        outputs.keep_temp,
    );

    let mut sink = FfmpegVideoSink::new(FfmpegVideoOpts::new(&outputs.temp_video));
    let report = TimelineEngine::new(settings, &mut compositor, &mut sink)?.run(&run.lines)?;

    let mut mixer = CueMixer::new(
        &run.catalog,
        &inputs.assets_root,
        FfmpegPcmSource::default(),
        random_picker(),
        MixOptions::from_settings(settings),
    );
    let track = mixer.mix(&report.cues, report.total_frames)?;
    export_compressed(&track, &outputs.temp_audio)?;

    mux_av(&outputs.temp_video, &outputs.temp_audio, &outputs.video)?;
    tracing::info!(
        frames = report.total_frames,
        ms = report.duration_ms(),
        "slideshow rendered"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
