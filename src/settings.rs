use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Per-phase hold durations, in seconds.
///
/// Each hold writes `floor(secs × fps)` copies of one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoldDurations {
    /// Image fully revealed, before the caption starts typing.
    pub after_image_secs: f64,
    /// Caption fully typed (first part of the reading pause).
    pub after_caption_secs: f64,
    /// Second part of the reading pause, before the caption is cleared.
    pub before_clear_secs: f64,
    /// Caption cleared, before the `next` sound and the next slide.
    pub after_clear_secs: f64,
    /// Closing hold on the final caption.
    pub final_secs: f64,
}

impl Default for HoldDurations {
    fn default() -> Self {
        Self {
            after_image_secs: 0.2,
            after_caption_secs: 0.8,
            before_clear_secs: 1.2,
            after_clear_secs: 0.1,
            final_secs: 5.0,
        }
    }
}

/// Hold durations converted to frame counts for one fps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldFrames {
    /// Frames held after the image wipe.
    pub after_image: u64,
    /// Frames held after the caption is typed.
    pub after_caption: u64,
    /// Frames held before the caption is cleared.
    pub before_clear: u64,
    /// Frames held on the cleared image.
    pub after_clear: u64,
    /// Frames held at the very end.
    pub final_hold: u64,
}

impl HoldDurations {
    /// Convert every hold to a frame count.
    pub fn frames(&self, fps: Fps) -> HoldFrames {
        HoldFrames {
            after_image: fps.secs_to_frames_floor(self.after_image_secs),
            after_caption: fps.secs_to_frames_floor(self.after_caption_secs),
            before_clear: fps.secs_to_frames_floor(self.before_clear_secs),
            after_clear: fps.secs_to_frames_floor(self.after_clear_secs),
            final_hold: fps.secs_to_frames_floor(self.final_secs),
        }
    }

    fn validate(&self) -> SlidecastResult<()> {
        for (name, v) in [
            ("after_image_secs", self.after_image_secs),
            ("after_caption_secs", self.after_caption_secs),
            ("before_clear_secs", self.before_clear_secs),
            ("after_clear_secs", self.after_clear_secs),
            ("final_secs", self.final_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SlidecastError::config(format!(
                    "holds.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Everything that shapes the rendered timeline and soundtrack.
///
/// Defaults reproduce the reference look: 1280×720 at 30 fps, a 40px white caption font, a 5%/frame
/// wipe, one character every 2 frames and one letter sound every 3 frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Output resolution.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Caption font size in pixels.
    pub font_size_px: f32,
    /// Caption color.
    pub text_rgb: [u8; 3],
    /// Accumulated line width at which a caption line is closed.
    pub wrap_width_px: f32,
    /// Percentage of the image width revealed per elapsed frame during the wipe.
    pub reveal_percent_per_frame: f64,
    /// Frames per revealed caption character.
    pub frames_per_char: u32,
    /// Frames per letter sound while typing.
    pub frames_per_letter_sound: u32,
    /// Hold durations.
    pub holds: HoldDurations,
    /// Gain applied to letter sounds, in dB.
    pub letter_gain_db: f32,
    /// Length of the soundtrack fade-out, in milliseconds.
    pub fade_out_ms: u64,
    /// Caption of the synthetic closing line.
    pub terminal_text: String,
    /// File stem of the closing image (`<stem>.png`).
    pub terminal_image: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            font_size_px: 40.0,
            text_rgb: [255, 255, 255],
            wrap_width_px: 800.0,
            reveal_percent_per_frame: 5.0,
            frames_per_char: 2,
            frames_per_letter_sound: 3,
            holds: HoldDurations::default(),
            letter_gain_db: -7.0,
            fade_out_ms: 1000,
            terminal_text: "Glory to Arstotzka.".to_string(),
            terminal_image: "arstotzka".to_string(),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load_json(path: &Path) -> SlidecastResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Parse settings from a JSON string. Missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> SlidecastResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| SlidecastError::serde(format!("invalid settings JSON: {e}")))
    }

    /// Check every invariant the timeline engine and encoder rely on.
    ///
    /// A zero reveal rate would make the wipe loop forever, and zero typing rates would divide by
    /// zero, so all of them are rejected here, before any rendering.
    pub fn validate(&self) -> SlidecastResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;

        let Canvas { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(SlidecastError::config("canvas width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(SlidecastError::config(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(SlidecastError::config("canvas width/height must fit in u16"));
        }

        if !self.reveal_percent_per_frame.is_finite() || self.reveal_percent_per_frame <= 0.0 {
            return Err(SlidecastError::config(
                "reveal_percent_per_frame must be finite and > 0",
            ));
        }
        if self.frames_per_char == 0 {
            return Err(SlidecastError::config("frames_per_char must be > 0"));
        }
        if self.frames_per_letter_sound == 0 {
            return Err(SlidecastError::config("frames_per_letter_sound must be > 0"));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(SlidecastError::config("font_size_px must be finite and > 0"));
        }
        if !self.wrap_width_px.is_finite() || self.wrap_width_px <= 0.0 {
            return Err(SlidecastError::config("wrap_width_px must be finite and > 0"));
        }
        if !self.letter_gain_db.is_finite() {
            return Err(SlidecastError::config("letter_gain_db must be finite"));
        }
        if self.terminal_image.trim().is_empty() {
            return Err(SlidecastError::config("terminal_image must be non-empty"));
        }
        self.holds.validate()
    }

    /// Hold durations in frames at the configured fps.
    pub fn hold_frames(&self) -> HoldFrames {
        self.holds.frames(self.fps)
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
