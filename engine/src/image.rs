use std::sync::Arc;

use thiserror::Error;

use crate::geometry::Rect;
use crate::graphics::Color;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image {label:?} has zero size ({width}x{height})")]
    Empty { label: String, width: u32, height: u32 },
    #[error("image {label:?} expects {expected} rgba bytes, got {actual}")]
    BadLength {
        label: String,
        expected: usize,
        actual: usize,
    },
}

/// An opaque RGBA drawable with an intrinsic size.
///
/// Pixel data is shared, so cloning an image is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    label: Arc<str>,
    width: u32,
    height: u32,
    rgba: Arc<[u8]>,
}

impl Image {
    pub fn from_rgba(
        label: impl Into<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let label = label.into();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty {
                label,
                width,
                height,
            });
        }
        let expected = rgba_len(width, height);
        if rgba.len() != expected {
            return Err(ImageError::BadLength {
                label,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            label: label.into(),
            width,
            height,
            rgba: rgba.into(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

fn rgba_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Mutable pixel buffer used to paint images procedurally before freezing them.
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0u8; rgba_len(width, height)],
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> &mut Self {
        let Some(clip) = rect.intersect(&Rect::from_size(self.width, self.height)) else {
            return self;
        };
        let stride = self.width as usize * 4;
        for y in clip.y..clip.y + clip.h as i32 {
            let row = y as usize * stride;
            let start = row + clip.x as usize * 4;
            let end = start + clip.w as usize * 4;
            for px in self.rgba[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
        self
    }

    pub fn build(self, label: impl Into<String>) -> Result<Image, ImageError> {
        Image::from_rgba(label, self.width, self.height, self.rgba)
    }
}
