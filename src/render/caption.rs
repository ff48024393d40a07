use crate::{
    foundation::core::FrameIndex,
    foundation::error::SlidecastResult,
    render::frame::Frame,
    render::raster::Compositor,
    timeline::cue::{CueKind, CueList},
};

/// Letter-by-letter typing of one caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionTyping {
    /// Frame at which typing started.
    pub start: FrameIndex,
    /// Frames per revealed character.
    pub frames_per_char: u32,
    /// Frames per letter sound.
    pub frames_per_letter_sound: u32,
}

impl CaptionTyping {
    /// Start typing at `start`. Both rates must be non-zero.
    pub fn new(start: FrameIndex, frames_per_char: u32, frames_per_letter_sound: u32) -> Self {
        Self {
            start,
            frames_per_char,
            frames_per_letter_sound,
        }
    }

    /// Characters visible `elapsed` frames after the start.
    pub fn prefix_len(&self, elapsed: u64) -> usize {
        (elapsed / u64::from(self.frames_per_char)) as usize
    }

    /// Whether a letter sound starts `elapsed` frames after the start.
    ///
    /// Uses floor division on both sides, so the first frame always fires.
    pub fn letter_cue_fires(&self, elapsed: u64) -> bool {
        let s = i64::from(self.frames_per_letter_sound);
        let e = elapsed as i64;
        (e - 1).div_euclid(s) != e.div_euclid(s)
    }

    /// Frames a complete typing phase writes for a caption of `char_count` characters.
    pub fn frame_count(char_count: usize, frames_per_char: u32) -> u64 {
        char_count as u64 * u64::from(frames_per_char) + 1
    }

    /// Render the caption state for `current` over `background`.
    ///
    /// Appends a `letter` cue at `current` when a letter sound is due. Returns the new frame and
    /// whether the whole caption is visible.
    pub fn render(
        &self,
        compositor: &mut impl Compositor,
        text: &str,
        background: &Frame,
        current: FrameIndex,
        cues: &mut CueList,
    ) -> SlidecastResult<(Frame, bool)> {
        let elapsed = current.since(self.start);
        if self.letter_cue_fires(elapsed) {
            cues.push(CueKind::Letter, current)?;
        }

        let n = self.prefix_len(elapsed);
        let prefix: String = text.chars().take(n).collect();
        let done = n >= text.chars().count();

        let mut frame = background.clone();
        compositor.draw_caption(&mut frame, &prefix)?;
        Ok((frame, done))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
