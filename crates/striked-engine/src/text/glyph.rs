use std::fmt::Debug;

use crate::coords::Vec2;
use crate::render::{Renderer, ResourceSetId};

/// Identifies one atlas page of a font.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AtlasId(pub u32);

impl AtlasId {
    /// Never handed out by a font. Lookups with it always fail.
    pub const NONE: AtlasId = AtlasId(u32::MAX);
}

/// Metrics of one character, in native-render-size pixels.
///
/// `region` is the top-left corner of the glyph bitmap in its atlas page;
/// the bitmap extends by `size`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphInfo {
    pub advance: f32,
    pub bearing: Vec2,
    pub size: Vec2,
    pub region: Vec2,
    pub atlas: AtlasId,
}

impl GlyphInfo {
    /// Metrics for a character the font does not contain: takes no space and
    /// never resolves to an atlas.
    pub const fn missing() -> Self {
        Self {
            advance: 0.0,
            bearing: Vec2::zero(),
            size: Vec2::zero(),
            region: Vec2::zero(),
            atlas: AtlasId::NONE,
        }
    }
}

/// A realized atlas page.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AtlasHandle {
    pub id: AtlasId,
    pub set: ResourceSetId,
}

/// Query interface of a loaded font, as consumed by canvases.
pub trait FontSource: Debug {
    /// Metrics for `c`. Unknown characters return [`GlyphInfo::missing`].
    fn glyph(&self, c: char) -> GlyphInfo;

    /// The atlas page `id`, or `None` while it is not on the GPU yet.
    fn atlas(&self, id: AtlasId) -> Option<AtlasHandle>;

    /// Makes the font's atlas pages available to `renderer`. Called every frame.
    fn bind(&self, renderer: &mut dyn Renderer);
}
