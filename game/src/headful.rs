//! Glue between the windowed driver and the game.

pub mod input_adapter;
