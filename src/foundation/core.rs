use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Number of frames elapsed since `start` (saturating at zero).
    pub fn since(self, start: FrameIndex) -> u64 {
        self.0.saturating_sub(start.0)
    }

    /// The next frame index.
    pub fn next(self) -> FrameIndex {
        FrameIndex(self.0 + 1)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SlidecastResult<Self> {
        if den == 0 {
            return Err(SlidecastError::config("fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlidecastError::config("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to a frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Timeline position of `frames` in whole milliseconds, rounded down.
    pub fn frames_to_millis_floor(self, frames: u64) -> u64 {
        let num = u128::from(frames) * 1000 * u128::from(self.den);
        (num / u128::from(self.num)) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
