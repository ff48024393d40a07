//! Slidecast renders narrated slideshow videos.
//!
//! For every caption of a script, a slide image wipes in from the left, the caption is typed letter
//! by letter underneath, and the slide holds before the next one. Sound cues (background music,
//! letter clicks, slide changes) are collected while frames are rendered, mixed into a soundtrack
//! afterwards, and `ffmpeg` muxes video and audio into the final file.
//!
//! - Configure a run with [`RenderSettings`], [`Inputs`] and [`OutputPaths`]
//! - [`render_slideshow`] produces the video; [`plan_slideshow`] only computes the timeline
//! - Lower-level pieces ([`TimelineEngine`], [`CueMixer`], [`FrameSink`]) can be driven directly
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod audio;
pub(crate) mod encode;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod settings;
pub(crate) mod text;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::assets::catalog::{SoundAsset, SoundCatalog};
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::images::{ImageLibrary, ImageStore};
pub use crate::assets::media::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use crate::assets::script::{ImageKey, Line, Script};
pub use crate::audio::export::{export_compressed, f32le_bytes};
pub use crate::audio::mix::{
    AssetPicker, AudioBuffer, CueMixer, FfmpegPcmSource, MixOptions, PcmSource, RandomPicker,
    cue_position_ms, random_picker,
};
pub use crate::encode::ffmpeg::{
    FfmpegVideoOpts, FfmpegVideoSink, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use crate::encode::mux::{TempArtifacts, mux_av, mux_command};
pub use crate::encode::sink::{FrameSink, InMemorySink, NullSink, SinkConfig};
pub use crate::pipeline::{Inputs, OutputPaths, plan_slideshow, render_slideshow};
pub use crate::render::caption::CaptionTyping;
pub use crate::render::frame::Frame;
pub use crate::render::raster::{
    Compositor, CpuCompositor, NullCompositor, blit_rgb, hidden_columns, image_origin,
    over_premul_onto_rgb,
};
pub use crate::render::wipe::ImageTransition;
pub use crate::settings::{HoldDurations, HoldFrames, RenderSettings};
pub use crate::text::layout::{
    TextBrushRgba8, TextLayoutEngine, TextMetrics, TextSize, WrappedText, wrap_words,
};
pub use crate::timeline::cue::{Cue, CueKind, CueList};
pub use crate::timeline::engine::{
    LineSpan, Phase, TimelineEngine, TimelineReport, planned_frame_count,
};
