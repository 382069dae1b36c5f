use std::fmt;
use std::rc::Rc;

use crate::coords::{Rect, Vec2, Vec4};
use crate::paint::Color;
use crate::render::Material2DInfo;
use crate::text::{AtlasId, FontSource};
use crate::texture::TextureSource;

/// Geometry + color of an untextured quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectItem {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
}

/// One primitive in a canvas batch.
///
/// Items hold `Rc` copies of their font/texture so a batch never borrows
/// from the content that produced it.
#[derive(Clone)]
pub enum DrawItem {
    Rect(RectItem),
    TexturedRect {
        position: Vec2,
        size: Vec2,
        modulate: Vec4,
        texture: Rc<dyn TextureSource>,
    },
    /// Axis-aligned thin rect produced by `draw_line`.
    Line(RectItem),
    Glyph {
        position: Vec2,
        size: Vec2,
        color: Color,
        /// Atlas px: x0, y0, x1, y1.
        region: Vec4,
        range: f32,
        font: Rc<dyn FontSource>,
        atlas: AtlasId,
    },
}

impl DrawItem {
    #[inline]
    pub fn is_font(&self) -> bool {
        matches!(self, DrawItem::Glyph { .. })
    }

    #[inline]
    pub fn uses_texture(&self) -> bool {
        matches!(self, DrawItem::TexturedRect { .. })
    }

    pub fn position(&self) -> Vec2 {
        match self {
            DrawItem::Rect(r) | DrawItem::Line(r) => r.position,
            DrawItem::TexturedRect { position, .. } | DrawItem::Glyph { position, .. } => *position,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            DrawItem::Rect(r) | DrawItem::Line(r) => r.size,
            DrawItem::TexturedRect { size, .. } | DrawItem::Glyph { size, .. } => *size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    pub fn font(&self) -> Option<&Rc<dyn FontSource>> {
        match self {
            DrawItem::Glyph { font, .. } => Some(font),
            _ => None,
        }
    }

    pub fn texture(&self) -> Option<&Rc<dyn TextureSource>> {
        match self {
            DrawItem::TexturedRect { texture, .. } => Some(texture),
            _ => None,
        }
    }

    /// The per-draw payload handed to the canvas pipeline.
    pub fn material_info(&self) -> Material2DInfo {
        match self {
            DrawItem::Rect(r) | DrawItem::Line(r) => Material2DInfo {
                position: r.position.to_array(),
                size: r.size.to_array(),
                color: r.color.to_array(),
                modulate: Vec4::ONE.to_array(),
                ..Material2DInfo::default()
            },
            DrawItem::TexturedRect { position, size, modulate, .. } => Material2DInfo {
                position: position.to_array(),
                size: size.to_array(),
                color: Color::WHITE.to_array(),
                modulate: modulate.to_array(),
                use_texture: 1.0,
                ..Material2DInfo::default()
            },
            DrawItem::Glyph { position, size, color, region, range, .. } => Material2DInfo {
                position: position.to_array(),
                size: size.to_array(),
                color: color.to_array(),
                modulate: Vec4::ONE.to_array(),
                font_region: region.to_array(),
                font_range: *range,
                is_font: 1.0,
                ..Material2DInfo::default()
            },
        }
    }
}

impl fmt::Debug for DrawItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawItem::Rect(r) => f.debug_tuple("Rect").field(r).finish(),
            DrawItem::Line(r) => f.debug_tuple("Line").field(r).finish(),
            DrawItem::TexturedRect { position, size, modulate, .. } => f
                .debug_struct("TexturedRect")
                .field("position", position)
                .field("size", size)
                .field("modulate", modulate)
                .finish_non_exhaustive(),
            DrawItem::Glyph { position, size, color, atlas, .. } => f
                .debug_struct("Glyph")
                .field("position", position)
                .field("size", size)
                .field("color", color)
                .field("atlas", atlas)
                .finish_non_exhaustive(),
        }
    }
}

/// Resources compare by identity.
impl PartialEq for DrawItem {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DrawItem::Rect(a), DrawItem::Rect(b)) | (DrawItem::Line(a), DrawItem::Line(b)) => a == b,
            (
                DrawItem::TexturedRect { position: p0, size: s0, modulate: m0, texture: t0 },
                DrawItem::TexturedRect { position: p1, size: s1, modulate: m1, texture: t1 },
            ) => p0 == p1 && s0 == s1 && m0 == m1 && Rc::ptr_eq(t0, t1),
            (
                DrawItem::Glyph { position: p0, size: s0, color: c0, region: r0, range: g0, font: f0, atlas: a0 },
                DrawItem::Glyph { position: p1, size: s1, color: c1, region: r1, range: g1, font: f1, atlas: a1 },
            ) => {
                p0 == p1
                    && s0 == s1
                    && c0 == c1
                    && r0 == r1
                    && g0 == g1
                    && a0 == a1
                    && Rc::ptr_eq(f0, f1)
            }
            _ => false,
        }
    }
}
