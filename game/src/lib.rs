pub mod assets;
pub mod config;
pub mod headful;
pub mod input;
pub mod logic;
pub mod phase;
pub mod player;
pub mod render;
pub mod state;
pub mod tile;
pub mod update;
pub mod vec2;
pub mod world;
