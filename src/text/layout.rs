use std::sync::Arc;

use crate::foundation::error::{SlidecastError, SlidecastResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Pixel extent of one laid-out line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSize {
    /// Advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
}

/// Font metrics used for caption wrapping.
pub trait TextMetrics {
    /// Measure `text` as a single unwrapped line.
    fn measure(&mut self, text: &str) -> SlidecastResult<TextSize>;
}

/// Caption split into display lines.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    /// Display lines, top to bottom.
    pub lines: Vec<String>,
    /// Vertical distance between consecutive lines: the tallest line measured while wrapping.
    pub line_height: f32,
}

/// Greedily pack space-separated words into lines.
///
/// A word is appended to the current line first; if the accumulated line then measures at least
/// `max_width`, the line is closed with that word on it.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    metrics: &mut impl TextMetrics,
) -> SlidecastResult<WrappedText> {
    let mut lines = Vec::new();
    let mut line_height = 0.0f32;
    let mut current = String::new();

    for word in text.split(' ') {
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        let size = metrics.measure(&current)?;
        line_height = line_height.max(size.height);

        if size.width >= max_width {
            lines.push(std::mem::take(&mut current));
        }
    }
    lines.push(current);

    Ok(WrappedText { lines, line_height })
}

/// Stateful helper for building Parley text layouts from one set of font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    font_bytes: Arc<Vec<u8>>,
    family_name: String,
    size_px: f32,
    brush: TextBrushRgba8,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("font_bytes_len", &self.font_bytes.len())
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl TextLayoutEngine {
    /// Register `font_bytes` and prepare layouts at `size_px` in `brush` color.
    pub fn new(font_bytes: Vec<u8>, size_px: f32, brush: TextBrushRgba8) -> SlidecastResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SlidecastError::config(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SlidecastError::config("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlidecastError::config("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_bytes: Arc::new(font_bytes),
            family_name,
            size_px,
            brush,
        })
    }

    /// Raw font bytes, shared with the glyph rasterizer.
    pub fn font_bytes(&self) -> Arc<Vec<u8>> {
        self.font_bytes.clone()
    }

    /// Family name resolved from the font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape `text` as one unwrapped line.
    pub fn layout_line(&mut self, text: &str) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(self.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMetrics for TextLayoutEngine {
    fn measure(&mut self, text: &str) -> SlidecastResult<TextSize> {
        let layout = self.layout_line(text);
        Ok(TextSize {
            width: layout.width(),
            height: layout.height(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
