use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Kind of sound event.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// Background track, starts the soundtrack at frame 0.
    Music,
    /// One typed letter.
    Letter,
    /// Slide change.
    Next,
}

impl CueKind {
    /// Catalog key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Letter => "letter",
            Self::Next => "next",
        }
    }
}

impl std::fmt::Display for CueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sound event bound to an output frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    /// What to play.
    pub kind: CueKind,
    /// Output frame at which the sound starts.
    pub frame: FrameIndex,
}

/// Append-only list of cues in emission order.
///
/// Frames are non-decreasing; ties keep emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CueList {
    cues: Vec<Cue>,
}

impl CueList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cue. Fails if `frame` is earlier than the last appended cue.
    pub fn push(&mut self, kind: CueKind, frame: FrameIndex) -> SlidecastResult<()> {
        if let Some(last) = self.cues.last()
            && frame < last.frame
        {
            return Err(SlidecastError::render(format!(
                "{kind} cue at frame {} precedes previous cue at frame {}",
                frame.0, last.frame.0
            )));
        }
        self.cues.push(Cue { kind, frame });
        Ok(())
    }

    /// Borrow the cues in emission order.
    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    /// Number of cues of `kind`.
    pub fn count(&self, kind: CueKind) -> usize {
        self.cues.iter().filter(|c| c.kind == kind).count()
    }

    /// Total number of cues.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Return `true` when no cue was appended.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Consume the list.
    pub fn into_vec(self) -> Vec<Cue> {
        self.cues
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/cue.rs"]
mod tests;
