use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::render::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Destination for rendered frames, in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing, gap-free `FrameIndex`
/// values starting at 0.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidecastResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SlidecastResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, Frame)>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidecastResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SlidecastResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that only counts frames.
#[derive(Debug, Default)]
pub struct NullSink {
    /// Frames received so far.
    pub frames: u64,
}

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> SlidecastResult<()> {
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &Frame) -> SlidecastResult<()> {
        if idx.0 != self.frames {
            return Err(SlidecastError::encode(format!(
                "frame {} pushed out of order (expected {})",
                idx.0, self.frames
            )));
        }
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> SlidecastResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
