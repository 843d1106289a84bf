use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::GameConfig;
use crate::player::Player;
use crate::tile::{Tile, TileKind, TileSpec};

/// Everything that scrolls: the collidable tiles, the background decorations and the
/// distance scrolled so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Distance scrolled right since the start. Every collidable tile has been shifted by
    /// exactly `-scroll_offset` from where it was built.
    pub scroll_offset: f32,
    /// The level is won once `scroll_offset` reaches this.
    pub max_limit: f32,
    /// Platforms followed by bricks, in slot order.
    pub tiles: Vec<Tile>,
    pub decorations: Vec<Tile>,
}

impl World {
    /// Lays out `tile_count` slots. Slot `i` gets a gap of `i * gap_step`, and each slot's
    /// gap is also added to the win distance.
    pub fn build(config: &GameConfig) -> Self {
        let n = config.tile_count;
        let mut platforms = Vec::with_capacity(n);
        let mut bricks = Vec::with_capacity(n);
        let mut decorations = Vec::with_capacity(n);
        let mut max_limit = config.max_limit_baseline;

        for i in 0..n {
            let gap = i as f32 * config.gap_step;
            max_limit += gap;

            platforms.push(
                TileSpec::new(
                    TileKind::Platform,
                    i,
                    gap,
                    config.platform_width,
                    config.platform_height,
                )
                .build(config),
            );
            bricks.push(
                TileSpec::new(
                    TileKind::Brick,
                    i,
                    gap + config.brick_extra_gap,
                    config.brick_width,
                    config.brick_height,
                )
                .at_y(config.brick_y)
                .build(config),
            );
            decorations.push(
                TileSpec::new(
                    TileKind::Decoration,
                    i,
                    gap,
                    config.decoration_width,
                    config.decoration_height,
                )
                .at_y(config.decoration_y)
                .build(config),
            );
        }

        platforms.append(&mut bricks);
        Self {
            scroll_offset: 0.0,
            max_limit,
            tiles: platforms,
            decorations,
        }
    }

    /// Scrolls the camera back toward the start. Does nothing at the start of the level.
    pub fn scroll_left(&mut self, config: &GameConfig) -> bool {
        if self.scroll_offset <= 0.0 {
            return false;
        }
        let speed = config.movement_speed;
        self.scroll_offset -= speed;
        self.shift_all(speed, speed - config.parallax_shift);
        true
    }

    pub fn scroll_right(&mut self, config: &GameConfig) {
        let speed = config.movement_speed;
        self.scroll_offset += speed;
        self.shift_all(-speed, -config.parallax_shift);
    }

    fn shift_all(&mut self, tile_dx: f32, decoration_dx: f32) {
        for tile in &mut self.tiles {
            tile.shift(tile_dx);
        }
        for deco in &mut self.decorations {
            deco.shift(decoration_dx);
        }
        trace!(scroll_offset = self.scroll_offset, "scrolled");
    }

    /// First collidable tile the player would land on this frame, if any.
    pub fn landing_tile(&self, player: &Player) -> Option<&Tile> {
        self.tiles.iter().find(|tile| lands_on(player, tile))
    }

    pub fn goal_reached(&self) -> bool {
        self.scroll_offset >= self.max_limit
    }
}

/// One-sided landing test: the player's bottom edge is at or above the tile's top now and
/// at or below it after this frame's fall, while the two overlap horizontally (edges touching
/// counts). Upward motion through a tile is never stopped.
pub fn lands_on(player: &Player, tile: &Tile) -> bool {
    player.bottom() <= tile.top()
        && player.next_bottom() >= tile.top()
        && player.right() >= tile.pos.x
        && player.pos.x <= tile.right()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec2::Vec2;

    #[test]
    fn build_lays_out_ten_slots_with_growing_gaps() {
        let c = GameConfig::default();
        let w = World::build(&c);

        assert_eq!(w.tiles.len(), 20);
        assert_eq!(w.decorations.len(), 10);
        assert_eq!(w.scroll_offset, 0.0);
        assert_eq!(w.max_limit, 14736.0 + 150.0 * 45.0);

        let platforms: Vec<&Tile> = w.tiles.iter().filter(|t| t.kind == TileKind::Platform).collect();
        let bricks: Vec<&Tile> = w.tiles.iter().filter(|t| t.kind == TileKind::Brick).collect();
        assert_eq!(platforms.len(), 10);
        assert_eq!(bricks.len(), 10);
        assert!(w.tiles[..10].iter().all(|t| t.kind == TileKind::Platform));

        for pair in platforms.windows(2) {
            assert!(pair[0].right() < pair[1].pos.x, "platforms must not overlap");
        }
        for pair in bricks.windows(2) {
            assert!(pair[0].pos.x < pair[1].pos.x);
        }

        assert_eq!(platforms[1].pos, Vec2::new(921.0 + 150.0, 457.0));
        assert_eq!(bricks[0].pos, Vec2::new(3000.0, 200.0));
        assert_eq!(w.decorations[2].pos, Vec2::new(820.0 + 300.0, 60.0));
    }

    #[test]
    fn scrolling_keeps_offset_and_tile_shift_in_step() {
        let c = GameConfig::default();
        let built = World::build(&c);
        let mut w = built.clone();

        assert!(!w.scroll_left(&c), "no scrolling back past the start");
        assert_eq!(w, built);

        for _ in 0..7 {
            w.scroll_right(&c);
        }
        assert!(w.scroll_left(&c));
        assert_eq!(w.scroll_offset, 30.0);
        for (now, then) in w.tiles.iter().zip(&built.tiles) {
            assert_eq!(then.pos.x - now.pos.x, w.scroll_offset);
        }
        // Decorations lag: -2 per right step, +3 per left step.
        assert_eq!(w.decorations[0].pos.x, built.decorations[0].pos.x - 14.0 + 3.0);
    }

    #[test]
    fn landing_requires_crossing_the_top_while_overlapping() {
        let c = GameConfig::default();
        let tile = TileSpec::new(TileKind::Platform, 0, 0.0, 200.0, 50.0)
            .at_x(100.0)
            .at_y(500.0)
            .build(&c);
        let mut p = Player::new(&c);
        p.width = 50.0;
        p.pos = Vec2::new(150.0, 498.0 - p.height);
        p.vel.y = 7.0;
        assert!(lands_on(&p, &tile));

        p.pos.x = 301.0;
        assert!(!lands_on(&p, &tile), "no horizontal overlap");
        p.pos.x = 300.0;
        assert!(lands_on(&p, &tile), "touching edges count");

        p.vel.y = 1.0;
        assert!(!lands_on(&p, &tile), "won't reach the top this frame");
        p.vel.y = -40.0;
        p.pos.y = 510.0 - p.height;
        assert!(!lands_on(&p, &tile), "already below the top");
    }

    #[test]
    fn goal_is_reached_at_the_limit() {
        let mut w = World::build(&GameConfig::default());
        w.scroll_offset = w.max_limit - 0.5;
        assert!(!w.goal_reached());
        w.scroll_offset = w.max_limit;
        assert!(w.goal_reached());
    }
}
