use crate::{
    assets::script::ImageKey,
    foundation::core::FrameIndex,
    foundation::error::SlidecastResult,
    render::frame::Frame,
    render::raster::Compositor,
};

/// Left-to-right wipe-in of one slide image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransition {
    /// Frame at which the wipe started.
    pub start: FrameIndex,
    /// Percent of the image width revealed per elapsed frame. Must be > 0.
    pub reveal_percent_per_frame: f64,
}

impl ImageTransition {
    /// Start a wipe at `start`.
    pub fn new(start: FrameIndex, reveal_percent_per_frame: f64) -> Self {
        Self {
            start,
            reveal_percent_per_frame,
        }
    }

    /// Fraction of the image still hidden `elapsed` frames after the start, clamped to `>= 0`.
    pub fn hidden_fraction_at(&self, elapsed: u64) -> f64 {
        (1.0 - self.reveal_percent_per_frame * elapsed as f64 / 100.0).max(0.0)
    }

    /// Fraction of the image still hidden at `current`.
    pub fn hidden_fraction(&self, current: FrameIndex) -> f64 {
        self.hidden_fraction_at(current.since(self.start))
    }

    /// Draw the wipe state for `current` onto `frame`. Returns `true` once fully revealed.
    pub fn render(
        &self,
        compositor: &mut impl Compositor,
        frame: &mut Frame,
        key: ImageKey,
        current: FrameIndex,
    ) -> SlidecastResult<bool> {
        let hidden = self.hidden_fraction(current);
        compositor.draw_image(frame, key, hidden)?;
        Ok(hidden <= 0.0)
    }

    /// Number of frames a complete wipe writes (the done frame included).
    ///
    /// The rate must be positive and finite.
    pub fn frame_count(reveal_percent_per_frame: f64) -> u64 {
        let probe = Self::new(FrameIndex(0), reveal_percent_per_frame);
        let mut e = (100.0 / reveal_percent_per_frame).ceil().max(0.0) as u64;
        while e > 0 && probe.hidden_fraction_at(e - 1) <= 0.0 {
            e -= 1;
        }
        while probe.hidden_fraction_at(e) > 0.0 {
            e += 1;
        }
        e + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/wipe.rs"]
mod tests;
