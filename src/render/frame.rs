use crate::foundation::core::Canvas;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Opaque RGB8 frame buffer in row-major order.
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 3`.
    pub data: Vec<u8>,
}

impl Frame {
    /// All-black frame covering `canvas`.
    pub fn black(canvas: Canvas) -> Self {
        let len = canvas.width as usize * canvas.height as usize * 3;
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; len],
        }
    }

    /// RGB value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub(crate) fn stride(&self) -> usize {
        self.width as usize * 3
    }
}
