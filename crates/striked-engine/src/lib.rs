//! Striked engine crate.
//!
//! Batched 2D canvas rendering on wgpu: canvases record draw items into a
//! batch, resolve per-item resource sets and submit one draw per item.
//! Also owns the window/GPU startup used by the studio.

pub mod canvas;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod texture;
pub mod window;
pub mod world;

#[cfg(test)]
mod testing;
