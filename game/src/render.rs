use engine::geometry::Rect;
use engine::graphics::{Canvas, Color, TextStyle, text_height};

use crate::assets::{AssetStore, SpriteId};
use crate::phase::GamePhase;
use crate::state::GameState;
use crate::tile::{Tile, TileKind};

pub const SKY: Color = [150, 200, 240, 255];
pub const OVERLAY_BACKGROUND: Color = [255, 255, 255, 255];
pub const WIN_COLOR: Color = [0, 128, 0, 255];
pub const LOSE_COLOR: Color = [255, 0, 0, 255];
pub const PROMPT_COLOR: Color = [255, 0, 0, 255];

pub const HEADLINE_SCALE: u32 = 10;
pub const PROMPT_SCALE: u32 = 3;

pub const WIN_TEXT: &str = "You Win!";
pub const LOSE_TEXT: &str = "You Lose!";
pub const REPLAY_PROMPT: &str = "Press ENTER to replay";
pub const START_PROMPT: &str = "Press ENTER to start";

/// Draws one frame of `state`. Sprites missing from `assets` are skipped.
///
/// Callers draw after the frame's update, so tiles appear already scrolled and the player
/// already moved. Drawing at the start of the update would show the same picture one frame
/// earlier; gameplay is unaffected. The walk cell is `Player::shown_frame`, the counter value
/// before the update advanced it.
pub fn render(state: &GameState, assets: &AssetStore, canvas: &mut dyn Canvas) {
    match state.phase {
        GamePhase::Idle => {
            draw_world(state, assets, canvas);
            draw_prompt(state, START_PROMPT, canvas);
        }
        GamePhase::Running => draw_world(state, assets, canvas),
        GamePhase::Won => draw_outcome(state, WIN_TEXT, WIN_COLOR, canvas),
        GamePhase::Lost => draw_outcome(state, LOSE_TEXT, LOSE_COLOR, canvas),
    }
}

/// Background decorations first, then the collidable tiles, then the player on top.
fn draw_world(state: &GameState, assets: &AssetStore, canvas: &mut dyn Canvas) {
    canvas.clear(SKY);

    if let Ok(clouds) = assets.get(SpriteId::Clouds) {
        for deco in &state.world.decorations {
            canvas.draw_image(clouds, clouds.bounds(), tile_rect(deco));
        }
    }

    for tile in &state.world.tiles {
        let sprite = match tile.kind {
            TileKind::Platform => SpriteId::Platform,
            TileKind::Brick => SpriteId::Brick,
            TileKind::Decoration => SpriteId::Clouds,
        };
        if let Ok(image) = assets.get(sprite) {
            canvas.draw_image(image, image.bounds(), tile_rect(tile));
        }
    }

    let Ok(sheet) = assets.get(SpriteId::Player) else {
        return;
    };
    let player = &state.player;
    let config = &state.config;
    let (sx, sy) = player.animation.sheet_origin(player.shown_frame, config);
    let src = Rect::from_f32(sx, sy, config.sprite_frame_width, config.sprite_frame_height);
    let dst = Rect::from_f32(player.pos.x, player.pos.y, player.width, player.height);
    canvas.draw_image(sheet, src, dst);
}

fn draw_outcome(state: &GameState, headline: &str, color: Color, canvas: &mut dyn Canvas) {
    canvas.clear(OVERLAY_BACKGROUND);
    let baseline = (state.config.canvas_height / 2.0).round() as i32;
    fill_text_on_baseline(
        canvas,
        headline,
        100,
        baseline,
        TextStyle::new(color, HEADLINE_SCALE),
    );
    draw_prompt(state, REPLAY_PROMPT, canvas);
}

fn draw_prompt(state: &GameState, text: &str, canvas: &mut dyn Canvas) {
    let config = &state.config;
    let x = (config.canvas_width / 2.0 + 40.0).round() as i32;
    let baseline = (config.canvas_height - 20.0).round() as i32;
    fill_text_on_baseline(
        canvas,
        text,
        x,
        baseline,
        TextStyle::new(PROMPT_COLOR, PROMPT_SCALE),
    );
}

/// `Canvas::fill_text` takes a top-left corner; overlay positions are text baselines.
fn fill_text_on_baseline(canvas: &mut dyn Canvas, text: &str, x: i32, baseline: i32, style: TextStyle) {
    let top = baseline - text_height(style.scale) as i32;
    canvas.fill_text(text, x, top, style);
}

fn tile_rect(tile: &Tile) -> Rect {
    Rect::from_f32(tile.pos.x, tile.pos.y, tile.width, tile.height)
}
