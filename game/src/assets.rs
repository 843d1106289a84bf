//! Named sprites the renderer draws from.
//!
//! The store ships procedurally painted placeholders at the intrinsic sizes of the real art,
//! so layout and source regions are the same whichever images are loaded.

use std::collections::HashMap;

use engine::geometry::Rect;
use engine::graphics::Color;
use engine::image::{Image, ImageBuilder, ImageError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Platform,
    Brick,
    Clouds,
}

impl SpriteId {
    pub const ALL: [SpriteId; 4] = [
        SpriteId::Player,
        SpriteId::Platform,
        SpriteId::Brick,
        SpriteId::Clouds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpriteId::Player => "player",
            SpriteId::Platform => "platform",
            SpriteId::Brick => "brick",
            SpriteId::Clouds => "clouds",
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("sprite {0:?} is not loaded")]
    Missing(SpriteId),
    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    sprites: HashMap<SpriteId, Image>,
}

const PLAYER_SHEET: (u32, u32) = (864, 270);
const PLAYER_CELL: (u32, u32) = (108, 130);
const PLAYER_LEFT_ROW_Y: i32 = 140;
const PLATFORM_SIZE: (u32, u32) = (1842, 238);
const BRICK_SIZE: (u32, u32) = (326, 100);
const CLOUDS_SIZE: (u32, u32) = (820, 399);

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every sprite painted procedurally.
    pub fn placeholder() -> Result<Self, AssetError> {
        let mut store = Self::new();
        store.insert(SpriteId::Player, player_sheet()?);
        store.insert(SpriteId::Platform, platform()?);
        store.insert(SpriteId::Brick, brick()?);
        store.insert(SpriteId::Clouds, clouds()?);
        debug!(count = store.sprites.len(), "placeholder sprites ready");
        Ok(store)
    }

    pub fn insert(&mut self, id: SpriteId, image: Image) {
        self.sprites.insert(id, image);
    }

    pub fn get(&self, id: SpriteId) -> Result<&Image, AssetError> {
        self.sprites.get(&id).ok_or(AssetError::Missing(id))
    }

    /// Fails with the first sprite that isn't loaded. Call before the first running frame.
    pub fn require_all(&self) -> Result<(), AssetError> {
        for id in SpriteId::ALL {
            self.get(id)?;
        }
        Ok(())
    }
}

fn player_sheet() -> Result<Image, ImageError> {
    const SKIN: Color = [240, 200, 160, 255];
    const SHIRT: Color = [200, 40, 40, 255];
    const PANTS: Color = [40, 60, 160, 255];
    const EYE: Color = [20, 20, 20, 255];

    let (cw, ch) = (PLAYER_CELL.0 as i32, PLAYER_CELL.1 as i32);
    let mut img = ImageBuilder::new(PLAYER_SHEET.0, PLAYER_SHEET.1);
    for (row_y, facing_left) in [(0, false), (PLAYER_LEFT_ROW_Y, true)] {
        for frame in 0..8 {
            let x0 = frame * cw;
            // Legs swing through the walk cycle.
            let stride = [0, 8, 14, 8, 0, -8, -14, -8][frame as usize];
            let eye_x = if facing_left { x0 + 34 } else { x0 + 64 };
            img.fill_rect(Rect::new(x0 + 34, row_y + 6, 40, 36), SKIN)
                .fill_rect(Rect::new(eye_x, row_y + 18, 8, 8), EYE)
                .fill_rect(Rect::new(x0 + 26, row_y + 42, 56, 46), SHIRT)
                .fill_rect(Rect::new(x0 + 34 + stride, row_y + 88, 16, (ch - 90) as u32), PANTS)
                .fill_rect(Rect::new(x0 + 58 - stride, row_y + 88, 16, (ch - 90) as u32), PANTS);
        }
    }
    img.build(SpriteId::Player.name())
}

fn platform() -> Result<Image, ImageError> {
    let (w, h) = PLATFORM_SIZE;
    let mut img = ImageBuilder::new(w, h);
    img.fill_rect(Rect::from_size(w, h), [134, 84, 48, 255])
        .fill_rect(Rect::new(0, 0, w, 40), [70, 160, 60, 255]);
    for x in (0..w as i32).step_by(96) {
        img.fill_rect(Rect::new(x + 30, 90, 18, 14), [110, 66, 36, 255])
            .fill_rect(Rect::new(x + 70, 160, 14, 12), [110, 66, 36, 255]);
    }
    img.build(SpriteId::Platform.name())
}

fn brick() -> Result<Image, ImageError> {
    let (w, h) = BRICK_SIZE;
    let mut img = ImageBuilder::new(w, h);
    img.fill_rect(Rect::from_size(w, h), [90, 40, 30, 255]);
    let (bw, bh) = (80, 22);
    for (row, y) in (4..h as i32).step_by(bh + 3).enumerate() {
        let offset = if row % 2 == 0 { 0 } else { -(bw as i32) / 2 };
        for x in (offset..w as i32).step_by(bw + 3) {
            img.fill_rect(Rect::new(x, y, bw as u32, bh as u32), [180, 76, 50, 255]);
        }
    }
    img.build(SpriteId::Brick.name())
}

fn clouds() -> Result<Image, ImageError> {
    const CLOUD: Color = [250, 250, 255, 220];
    let (w, h) = CLOUDS_SIZE;
    let mut img = ImageBuilder::new(w, h);
    for (x, y, s) in [(60, 80, 1.0f32), (420, 40, 1.4), (300, 240, 0.8)] {
        let u = |v: f32| (v * s) as u32;
        img.fill_rect(Rect::new(x, y + u(40.0) as i32, u(200.0), u(60.0)), CLOUD)
            .fill_rect(Rect::new(x + u(40.0) as i32, y, u(120.0), u(50.0)), CLOUD);
    }
    img.build(SpriteId::Clouds.name())
}
