//! Textures that canvases can draw.

mod bitmap;
mod source;

pub use bitmap::BitmapTexture;
pub use source::TextureSource;
