use pixels::Pixels;

use crate::graphics::{Canvas, CpuCanvas};
use crate::surface::SurfaceSize;

/// Windowed presentation built on `pixels`.
///
/// The game draws into a fixed logical buffer (`buffer_size`) through the `Canvas` trait; `pixels`
/// scales that buffer to whatever size the window surface currently has.
pub struct PixelsCanvas {
    pixels: Pixels,
    buffer_size: SurfaceSize,
}

impl PixelsCanvas {
    pub fn new(mut pixels: Pixels, buffer_size: SurfaceSize) -> Result<Self, pixels::Error> {
        pixels.resize_buffer(buffer_size.width, buffer_size.height)?;
        Ok(Self {
            pixels,
            buffer_size,
        })
    }

    pub fn buffer_size(&self) -> SurfaceSize {
        self.buffer_size
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Follows a window resize. The logical buffer keeps its size.
    pub fn resize_surface(&mut self, size: SurfaceSize) -> Result<(), pixels::Error> {
        if size.is_empty() {
            return Ok(());
        }
        self.pixels.resize_surface(size.width, size.height)?;
        Ok(())
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Canvas) -> R,
    {
        let mut cpu = CpuCanvas::new(self.pixels.frame_mut(), self.buffer_size);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}
