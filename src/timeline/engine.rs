use crate::{
    assets::script::{ImageKey, Line},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{Fps, FrameIndex},
    foundation::error::{SlidecastError, SlidecastResult},
    render::caption::CaptionTyping,
    render::frame::Frame,
    render::raster::Compositor,
    render::wipe::ImageTransition,
    settings::{HoldFrames, RenderSettings},
    timeline::cue::{Cue, CueKind, CueList},
};

/// Per-line phase of the timeline.
///
/// Phases only move forward: `EnterImage → HoldShort → TypeCaption`, then either
/// `HoldMedium → HoldLong → ClearHold → EmitNext` or, on the last line, `HoldFinal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Wipe the slide image in.
    EnterImage,
    /// Short hold on the revealed image.
    HoldShort,
    /// Type the caption letter by letter.
    TypeCaption,
    /// First reading pause.
    HoldMedium,
    /// Second reading pause.
    HoldLong,
    /// Caption removed, image only.
    ClearHold,
    /// Queue the slide-change sound.
    EmitNext,
    /// Closing hold after the last caption.
    HoldFinal,
    /// Line finished.
    Done,
}

impl Phase {
    /// Phase that follows `self` on a line; `is_last` selects the closing branch.
    pub fn successor(self, is_last: bool) -> Phase {
        match self {
            Phase::EnterImage => Phase::HoldShort,
            Phase::HoldShort => Phase::TypeCaption,
            Phase::TypeCaption if is_last => Phase::HoldFinal,
            Phase::TypeCaption => Phase::HoldMedium,
            Phase::HoldMedium => Phase::HoldLong,
            Phase::HoldLong => Phase::ClearHold,
            Phase::ClearHold => Phase::EmitNext,
            Phase::EmitNext | Phase::HoldFinal | Phase::Done => Phase::Done,
        }
    }
}

/// Frame range covered by one rendered line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LineSpan {
    /// Position in the rendered line list.
    pub index: usize,
    /// Caption text.
    pub text: String,
    /// Image shown.
    pub image_key: ImageKey,
    /// First frame of the line.
    pub start: FrameIndex,
    /// One past the last frame of the line.
    pub end: FrameIndex,
}

/// Result of a timeline run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineReport {
    /// Frame rate the timeline was rendered at.
    pub fps: Fps,
    /// Number of frames written to the sink.
    pub total_frames: u64,
    /// Sound cues in emission order.
    pub cues: Vec<Cue>,
    /// Per-line frame ranges.
    pub lines: Vec<LineSpan>,
}

impl TimelineReport {
    /// Video duration in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.fps.frames_to_millis_floor(self.total_frames)
    }

    /// Number of cues of `kind`.
    pub fn cue_count(&self, kind: CueKind) -> usize {
        self.cues.iter().filter(|c| c.kind == kind).count()
    }
}

/// Closed-form frame count of a full run over `lines`.
pub fn planned_frame_count(lines: &[Line], settings: &RenderSettings) -> u64 {
    let holds = settings.hold_frames();
    let wipe = ImageTransition::frame_count(settings.reveal_percent_per_frame);
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let typing = CaptionTyping::frame_count(line.text.chars().count(), settings.frames_per_char);
            let tail = if i == last {
                holds.final_hold
            } else {
                holds.after_caption + holds.before_clear + holds.after_clear
            };
            wipe + holds.after_image + typing + tail
        })
        .sum()
}

struct FrameWriter<'s, S> {
    sink: &'s mut S,
    counter: FrameIndex,
}

impl<S: FrameSink> FrameWriter<'_, S> {
    fn write(&mut self, frame: &Frame) -> SlidecastResult<()> {
        self.sink.push_frame(self.counter, frame)?;
        self.counter = self.counter.next();
        Ok(())
    }

    fn hold(&mut self, frame: &Frame, frames: u64) -> SlidecastResult<()> {
        for _ in 0..frames {
            self.write(frame)?;
        }
        Ok(())
    }
}

/// Drives the renderers line by line, writing frames to a sink and collecting sound cues.
pub struct TimelineEngine<'a, C, S> {
    settings: &'a RenderSettings,
    holds: HoldFrames,
    compositor: &'a mut C,
    out: FrameWriter<'a, S>,
    current: Frame,
    cues: CueList,
}

impl<'a, C: Compositor, S: FrameSink> TimelineEngine<'a, C, S> {
    /// Validate `settings` and prepare a black starting frame.
    pub fn new(
        settings: &'a RenderSettings,
        compositor: &'a mut C,
        sink: &'a mut S,
    ) -> SlidecastResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            holds: settings.hold_frames(),
            compositor,
            out: FrameWriter {
                sink,
                counter: FrameIndex(0),
            },
            current: Frame::black(settings.canvas),
            cues: CueList::new(),
        })
    }

    /// Render every line. The last line always shows the terminal image and gets the closing hold.
    #[tracing::instrument(skip_all, fields(lines = lines.len()))]
    pub fn run(mut self, lines: &[Line]) -> SlidecastResult<TimelineReport> {
        if lines.is_empty() {
            return Err(SlidecastError::config("timeline needs at least one line"));
        }

        self.out.sink.begin(SinkConfig {
            width: self.settings.canvas.width,
            height: self.settings.canvas.height,
            fps: self.settings.fps,
        })?;
        self.cues.push(CueKind::Music, FrameIndex(0))?;

        let last = lines.len() - 1;
        let mut spans = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let is_last = index == last;
            let image_key = if is_last {
                ImageKey::Terminal
            } else {
                line.image_key
            };

            let start = self.out.counter;
            tracing::info!(index, ?image_key, start = start.0, "rendering line");
            self.run_line(&line.text, image_key, is_last)?;

            spans.push(LineSpan {
                index,
                text: line.text.clone(),
                image_key,
                start,
                end: self.out.counter,
            });
        }

        self.out.sink.end()?;

        let total_frames = self.out.counter.0;
        tracing::info!(
            total_frames,
            cues = self.cues.len(),
            letters = self.cues.count(CueKind::Letter),
            "timeline complete"
        );
        Ok(TimelineReport {
            fps: self.settings.fps,
            total_frames,
            cues: self.cues.into_vec(),
            lines: spans,
        })
    }

    fn run_line(&mut self, text: &str, key: ImageKey, is_last: bool) -> SlidecastResult<()> {
        let mut image_frame: Option<Frame> = None;
        let mut phase = Phase::EnterImage;

        while phase != Phase::Done {
            match phase {
                Phase::EnterImage => {
                    let wipe = ImageTransition::new(
                        self.out.counter,
                        self.settings.reveal_percent_per_frame,
                    );
                    loop {
                        let done =
                            wipe.render(&mut *self.compositor, &mut self.current, key, self.out.counter)?;
                        self.out.write(&self.current)?;
                        if done {
                            break;
                        }
                    }
                }
                Phase::HoldShort => {
                    image_frame = Some(self.current.clone());
                    self.hold(phase, self.holds.after_image)?;
                }
                Phase::TypeCaption => {
                    let background = image_frame
                        .as_ref()
                        .ok_or_else(|| SlidecastError::render("caption typed before image"))?;
                    let typing = CaptionTyping::new(
                        self.out.counter,
                        self.settings.frames_per_char,
                        self.settings.frames_per_letter_sound,
                    );
                    loop {
                        let (frame, done) = typing.render(
                            &mut *self.compositor,
                            text,
                            background,
                            self.out.counter,
                            &mut self.cues,
                        )?;
                        self.out.write(&frame)?;
                        self.current = frame;
                        if done {
                            break;
                        }
                    }
                }
                Phase::HoldMedium => self.hold(phase, self.holds.after_caption)?,
                Phase::HoldLong => self.hold(phase, self.holds.before_clear)?,
                Phase::ClearHold => {
                    if let Some(frame) = image_frame.as_ref() {
                        self.current.clone_from(frame);
                    }
                    self.hold(phase, self.holds.after_clear)?;
                }
                Phase::EmitNext => self.cues.push(CueKind::Next, self.out.counter)?,
                Phase::HoldFinal => self.hold(phase, self.holds.final_hold)?,
                Phase::Done => {}
            }
            phase = phase.successor(is_last);
        }
        Ok(())
    }

    fn hold(&mut self, phase: Phase, frames: u64) -> SlidecastResult<()> {
        tracing::debug!(?phase, frames, at = self.out.counter.0, "hold");
        self.out.hold(&self.current, frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/engine.rs"]
mod tests;
