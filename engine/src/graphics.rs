use crate::geometry::Rect;
use crate::image::Image;
use crate::surface::SurfaceSize;

pub type Color = [u8; 4];

// A tiny block font (no external deps).
pub const DEFAULT_TEXT_SCALE: u32 = 2;
pub const GLYPH_W: u32 = 3;
pub const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * glyph_advance_x(scale) - scale.max(1)
}

pub fn text_height(scale: u32) -> u32 {
    GLYPH_H * scale.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Color,
    pub scale: u32,
}

impl TextStyle {
    pub const fn new(color: Color, scale: u32) -> Self {
        Self { color, scale }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new([255, 255, 255, 255], DEFAULT_TEXT_SCALE)
    }
}

/// The drawing-surface capability game code renders through.
///
/// Game code should only talk to this trait; it must not care whether pixels land in a window,
/// an offscreen buffer, or a test recorder.
pub trait Canvas {
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws the `src` region of `image` scaled into `dst`. Transparent source pixels are skipped.
    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect);

    /// Draws `text` with its top-left corner at (`x`, `y`).
    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle);

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU canvas that draws into an RGBA frame buffer.
pub struct CpuCanvas<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuCanvas<'a> {
    /// Wraps `frame`. If the buffer is shorter than `size` requires, every draw is a no-op.
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        let size = if frame.len() < size.rgba_len() {
            SurfaceSize::new(0, 0)
        } else {
            size
        };
        Self { frame, size }
    }

    fn bounds(&self) -> Rect {
        Rect::from_size(self.size.width, self.size.height)
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * 4
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        let idx = self.index(x, y);
        let px = &mut self.frame[idx..idx + 4];
        match color[3] {
            0 => {}
            255 => px.copy_from_slice(&color),
            a => {
                let a = a as u32;
                let inv = 255 - a;
                for c in 0..3 {
                    px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                }
                px[3] = 255;
            }
        }
    }
}

impl Canvas for CpuCanvas<'_> {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clip) = rect.intersect(&self.bounds()) else {
            return;
        };

        let row_bytes = clip.w as usize * 4;
        let stride = self.size.width as usize * 4;
        let mut row_start = self.index(clip.x, clip.y);
        for _ in 0..clip.h {
            let row = &mut self.frame[row_start..row_start + row_bytes];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
            row_start += stride;
        }
    }

    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect) {
        if src.is_empty() {
            return;
        }
        let Some(clip) = dst.intersect(&self.bounds()) else {
            return;
        };

        // Nearest-neighbour: map each destination pixel back into the source region.
        let (sw, sh) = (src.w as i64, src.h as i64);
        let (dw, dh) = (dst.w as i64, dst.h as i64);
        for y in clip.y..clip.y + clip.h as i32 {
            let sy = src.y as i64 + (y as i64 - dst.y as i64) * sh / dh;
            for x in clip.x..clip.x + clip.w as i32 {
                let sx = src.x as i64 + (x as i64 - dst.x as i64) * sw / dw;
                if let Some(color) = image.pixel(sx as i32, sy as i32) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        let scale = style.scale.max(1);
        let adv = glyph_advance_x(scale) as i32;
        let mut cursor_x = x;
        for ch in text.chars() {
            if ch != ' ' {
                for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                            continue;
                        }
                        let cell = Rect::new(
                            cursor_x + (col * scale) as i32,
                            y + (row as u32 * scale) as i32,
                            scale,
                            scale,
                        );
                        self.fill_rect(cell, style.color);
                    }
                }
            }
            cursor_x = cursor_x.saturating_add(adv);
        }
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}

/// One recorded call on a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    Image { label: String, src: Rect, dst: Rect },
    Text { text: String, x: i32, y: i32, style: TextStyle },
}

/// Canvas that records draw calls instead of rasterizing them. Useful for asserting draw order.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: SurfaceSize,
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect) {
        self.calls.push(DrawCall::Image {
            label: image.label().to_string(),
            src,
            dst,
        });
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBuilder;

    fn px(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn fill_rect_clips_off_surface_parts() {
        let size = SurfaceSize::new(8, 4);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuCanvas::new(&mut frame, size);
        gfx.fill_rect(Rect::new(-3, 2, 5, 10), [1, 2, 3, 255]);

        assert_eq!(px(&frame, 8, 0, 2), [1, 2, 3, 255]);
        assert_eq!(px(&frame, 8, 1, 3), [1, 2, 3, 255]);
        assert_eq!(px(&frame, 8, 2, 3), [0, 0, 0, 0]);
        assert_eq!(px(&frame, 8, 0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_scales_source_region_down() {
        let mut b = ImageBuilder::new(4, 2);
        b.fill_rect(Rect::new(0, 0, 2, 2), [255, 0, 0, 255]);
        b.fill_rect(Rect::new(2, 0, 2, 2), [0, 0, 255, 255]);
        let img = b.build("halves").unwrap();

        let size = SurfaceSize::new(2, 1);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuCanvas::new(&mut frame, size);
        gfx.draw_image(&img, img.bounds(), Rect::new(0, 0, 2, 1));

        assert_eq!(px(&frame, 2, 0, 0), [255, 0, 0, 255]);
        assert_eq!(px(&frame, 2, 1, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn draw_image_skips_transparent_pixels() {
        let img = ImageBuilder::new(2, 2).build("clear").unwrap();
        let size = SurfaceSize::new(2, 2);
        let mut frame = vec![7u8; size.rgba_len()];
        let mut gfx = CpuCanvas::new(&mut frame, size);
        gfx.draw_image(&img, img.bounds(), Rect::new(0, 0, 2, 2));
        assert!(frame.iter().all(|&b| b == 7));
    }

    #[test]
    fn undersized_buffer_draws_nothing() {
        let mut frame = vec![0u8; 3];
        let mut gfx = CpuCanvas::new(&mut frame, SurfaceSize::new(4, 4));
        gfx.clear([255; 4]);
        assert_eq!(frame, vec![0u8; 3]);
    }

    #[test]
    fn text_renders_glyph_cells() {
        let size = SurfaceSize::new(16, 8);
        let mut frame = vec![0u8; size.rgba_len()];
        let mut gfx = CpuCanvas::new(&mut frame, size);
        gfx.fill_text("!", 0, 0, TextStyle::new([0, 255, 0, 255], 1));

        // '!' is the middle column on rows 0..3 and row 4.
        assert_eq!(px(&frame, 16, 1, 0), [0, 255, 0, 255]);
        assert_eq!(px(&frame, 16, 1, 3), [0, 0, 0, 0]);
        assert_eq!(px(&frame, 16, 1, 4), [0, 255, 0, 255]);
        assert_eq!(px(&frame, 16, 0, 0), [0, 0, 0, 0]);
        assert_eq!(text_width("ab", 2), 14);
        assert_eq!(text_height(10), 50);
    }

    #[test]
    fn recording_canvas_keeps_call_order() {
        let mut gfx = RecordingCanvas::new(SurfaceSize::new(10, 10));
        gfx.clear([0; 4]);
        gfx.fill_text("hi", 1, 2, TextStyle::default());
        assert_eq!(gfx.calls()[0], DrawCall::Clear([0; 4]));
        assert_eq!(gfx.texts(), vec!["hi"]);
        assert_eq!(gfx.take_calls().len(), 2);
        assert!(gfx.calls().is_empty());
    }
}
