use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Which image a line shows.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageKey {
    /// Positional slide image `<index>.png`.
    Slide(usize),
    /// The reserved closing image.
    Terminal,
}

/// One entry of the rendered script.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Line {
    /// Caption typed over the image.
    pub text: String,
    /// Image shown behind the caption.
    pub image_key: ImageKey,
}

/// Captions read from the input script, one per line, without the closing line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    captions: Vec<String>,
}

impl Script {
    /// Read and parse a UTF-8 script file.
    pub fn load(path: &Path) -> SlidecastResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        Self::parse(&raw)
    }

    /// Split `raw` on line breaks (`\n` or `\r\n`).
    ///
    /// The first line must contain something other than whitespace. Later blank lines are kept and
    /// render as empty captions.
    pub fn parse(raw: &str) -> SlidecastResult<Self> {
        let captions: Vec<String> = raw.lines().map(str::to_string).collect();
        match captions.first() {
            Some(first) if !first.trim().is_empty() => Ok(Self { captions }),
            _ => Err(SlidecastError::config(
                "no text found, the first line of the script must not be blank",
            )),
        }
    }

    /// Number of captions in the script.
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    /// Always `false` for a parsed script; kept for API symmetry with [`Script::len`].
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Borrow the captions.
    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    /// Reject scripts that need more slide images than `available_images` provides.
    ///
    /// `available_images` counts the closing image too, so the script must be strictly shorter.
    pub fn check_capacity(&self, available_images: usize) -> SlidecastResult<()> {
        if self.captions.len() >= available_images {
            return Err(SlidecastError::config(format!(
                "too many lines ({}), maximum is {}",
                self.captions.len(),
                available_images.saturating_sub(1)
            )));
        }
        Ok(())
    }

    /// Build the rendered line list: one line per caption plus the closing line.
    pub fn into_lines(self, terminal_text: &str) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .captions
            .into_iter()
            .enumerate()
            .map(|(i, text)| Line {
                text,
                image_key: ImageKey::Slide(i),
            })
            .collect();
        lines.push(Line {
            text: terminal_text.to_string(),
            image_key: ImageKey::Terminal,
        });
        lines
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/script.rs"]
mod tests;
