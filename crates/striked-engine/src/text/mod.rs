//! Fonts, glyph metrics and text layout.
//!
//! Canvases only see [`FontSource`]; [`Font`] is the fontdue-backed
//! implementation that bakes signed-distance atlas pages at load time.

mod atlas;
mod font;
mod glyph;
mod import;
mod metrics;
mod sdf;

pub use font::{Font, FontLoadError, LineMetrics};
pub use glyph::{AtlasHandle, AtlasId, FontSource, GlyphInfo};
pub use import::FontImportConfig;
pub use metrics::{
    GlyphQuad, NATIVE_RENDER_SIZE, RENDER_RANGE, highest_char, layout_glyphs, sdf_range,
    text_advance, text_height, text_width,
};
