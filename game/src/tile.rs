use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Platform,
    Brick,
    Decoration,
}

/// Construction parameters for one tile slot.
///
/// `x` defaults to `width * index + gap`; `y` defaults to resting on the canvas floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpec {
    pub kind: TileKind,
    pub index: usize,
    pub gap: f32,
    pub width: f32,
    pub height: f32,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl TileSpec {
    pub fn new(kind: TileKind, index: usize, gap: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            index,
            gap,
            width,
            height,
            x: None,
            y: None,
        }
    }

    pub fn at_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn at_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn build(self, config: &GameConfig) -> Tile {
        let x = self
            .x
            .unwrap_or(self.width * self.index as f32 + self.gap);
        let y = self.y.unwrap_or(config.canvas_height - self.height);
        Tile {
            kind: self.kind,
            index: self.index,
            gap: self.gap,
            pos: Vec2::new(x, y),
            width: self.width,
            height: self.height,
        }
    }
}

/// A platform, brick or background decoration. Tiles never move on their own; the world
/// shifts them all together when it scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub index: usize,
    pub gap: f32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Tile {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn shift(&mut self, dx: f32) {
        self.pos.x += dx;
    }
}
