use crate::{
    assets::decode::PreparedImage,
    assets::images::ImageStore,
    assets::script::ImageKey,
    foundation::core::Canvas,
    foundation::error::{SlidecastError, SlidecastResult},
    foundation::math::mul_div255_u16,
    render::frame::Frame,
    text::layout::{TextLayoutEngine, wrap_words},
};

/// Pixel backend used by the image and caption renderers.
///
/// Renderers own the timing math and cue emission; a compositor only turns "draw this image with
/// this much hidden" or "draw this caption" into pixels.
pub trait Compositor {
    /// Draw the image for `key` onto `frame`, skipping the leftmost `hidden_fraction` of its width.
    fn draw_image(
        &mut self,
        frame: &mut Frame,
        key: ImageKey,
        hidden_fraction: f64,
    ) -> SlidecastResult<()>;

    /// Draw `text` as a wrapped caption onto `frame`.
    fn draw_caption(&mut self, frame: &mut Frame, text: &str) -> SlidecastResult<()>;
}

/// Top-left corner of an image of `width × height` centered on `(W/2, H/3)`.
pub fn image_origin(canvas: Canvas, width: u32, height: u32) -> (i64, i64) {
    let x = (f64::from(canvas.width) / 2.0 - f64::from(width) / 2.0).floor();
    let y = (f64::from(canvas.height) / 3.0 - f64::from(height) / 2.0).floor();
    (x as i64, y as i64)
}

/// Number of leftmost image columns left undrawn for `hidden_fraction`.
pub fn hidden_columns(hidden_fraction: f64, width: u32) -> u32 {
    let cols = (hidden_fraction.clamp(0.0, 1.0) * f64::from(width)).floor();
    (cols as u32).min(width)
}

/// Copy `image` onto `frame` with its top-left corner at `(x, y)`, skipping the first `skip_cols`
/// columns. Everything outside the frame is clipped.
pub fn blit_rgb(frame: &mut Frame, image: &PreparedImage, x: i64, y: i64, skip_cols: u32) {
    let fw = i64::from(frame.width);
    let fh = i64::from(frame.height);
    let iw = i64::from(image.width);

    let col_start = i64::from(skip_cols).max(-x).max(0);
    let col_end = iw.min(fw - x);
    if col_start >= col_end {
        return;
    }

    let stride = frame.stride();
    for row in 0..image.height {
        let dy = y + i64::from(row);
        if dy < 0 {
            continue;
        }
        if dy >= fh {
            break;
        }

        let src = &image.row(row)[(col_start * 3) as usize..(col_end * 3) as usize];
        let dst_start = dy as usize * stride + ((x + col_start) * 3) as usize;
        frame.data[dst_start..dst_start + src.len()].copy_from_slice(src);
    }
}

/// Composite a premultiplied RGBA8 layer of the frame's size over the opaque frame.
pub fn over_premul_onto_rgb(frame: &mut Frame, layer: &[u8]) -> SlidecastResult<()> {
    let px = frame.width as usize * frame.height as usize;
    if layer.len() != px * 4 {
        return Err(SlidecastError::render(
            "caption layer size does not match the frame",
        ));
    }

    for (d, s) in frame.data.chunks_exact_mut(3).zip(layer.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 0 {
            continue;
        }
        let inv = 255 - a;
        for i in 0..3 {
            let v = u16::from(s[i]) + mul_div255_u16(u16::from(d[i]), inv);
            d[i] = v.min(255) as u8;
        }
    }
    Ok(())
}

/// CPU compositor: image blits plus `vello_cpu` glyph rasterization.
pub struct CpuCompositor {
    canvas: Canvas,
    width_u16: u16,
    height_u16: u16,
    images: ImageStore,
    text: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    layer: vello_cpu::Pixmap,
    wrap_width_px: f32,
}

impl std::fmt::Debug for CpuCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCompositor")
            .field("canvas", &self.canvas)
            .field("images", &self.images.len())
            .field("text", &self.text)
            .finish()
    }
}

impl CpuCompositor {
    /// Build a compositor for `canvas` over decoded `images`.
    pub fn new(
        canvas: Canvas,
        images: ImageStore,
        text: TextLayoutEngine,
        wrap_width_px: f32,
    ) -> SlidecastResult<Self> {
        let width_u16: u16 = canvas
            .width
            .try_into()
            .map_err(|_| SlidecastError::config("canvas width exceeds u16"))?;
        let height_u16: u16 = canvas
            .height
            .try_into()
            .map_err(|_| SlidecastError::config("canvas height exceeds u16"))?;

        let font_bytes = text.font_bytes().as_ref().clone();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            canvas,
            width_u16,
            height_u16,
            images,
            text,
            font,
            layer: vello_cpu::Pixmap::new(width_u16, height_u16),
            wrap_width_px,
        })
    }

    fn rasterize_lines(&mut self, lines: &[String], line_height: f32) {
        self.layer.data_as_u8_slice_mut().fill(0);

        let mut ctx = vello_cpu::RenderContext::new(self.width_u16, self.height_u16);
        let center_x = f64::from(self.canvas.width) / 2.0;
        let top = (f64::from(self.canvas.height) * 2.0 / 3.0).floor();

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let layout = self.text.layout_line(line);
            let x = center_x - (f64::from(layout.width()) / 2.0).floor();
            let y = top + f64::from(line_height) * i as f64;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

            for layout_line in layout.lines() {
                for item in layout_line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.layer);
    }
}

impl Compositor for CpuCompositor {
    fn draw_image(
        &mut self,
        frame: &mut Frame,
        key: ImageKey,
        hidden_fraction: f64,
    ) -> SlidecastResult<()> {
        let image = self.images.get(key)?;
        let (x, y) = image_origin(self.canvas, image.width, image.height);
        let skip = hidden_columns(hidden_fraction, image.width);
        blit_rgb(frame, image, x, y, skip);
        Ok(())
    }

    fn draw_caption(&mut self, frame: &mut Frame, text: &str) -> SlidecastResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let wrapped = wrap_words(text, self.wrap_width_px, &mut self.text)?;
        self.rasterize_lines(&wrapped.lines, wrapped.line_height);
        over_premul_onto_rgb(frame, self.layer.data_as_u8_slice())
    }
}

/// Compositor that leaves frames untouched; used for timeline planning.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCompositor;

impl Compositor for NullCompositor {
    fn draw_image(&mut self, _: &mut Frame, _: ImageKey, _: f64) -> SlidecastResult<()> {
        Ok(())
    }

    fn draw_caption(&mut self, _: &mut Frame, _: &str) -> SlidecastResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
