use crate::render::ResourceSetId;

use super::DrawItem;

/// Fallback sets the resolver composes with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BindingDefaults {
    /// World uniform set (slot 0).
    pub world: ResourceSetId,
    /// 1x1 white texture set.
    pub texture: ResourceSetId,
}

/// Resource sets for slots 0..3 of one item's draw.
///
/// - glyph: `[world, atlas, default]`; `None` while the atlas is not ready
/// - textured rect: `[world, default, texture]`, texture falls back to the
///   default until it is realized
/// - rect / line: `[world, default, default]`
pub fn resolve_binding_set(item: &DrawItem, defaults: &BindingDefaults) -> Option<[ResourceSetId; 3]> {
    match item {
        DrawItem::Glyph { font, atlas, .. } => {
            let handle = font.atlas(*atlas)?;
            Some([defaults.world, handle.set, defaults.texture])
        }
        DrawItem::TexturedRect { texture, .. } => {
            let image = texture.resource_set().unwrap_or(defaults.texture);
            Some([defaults.world, defaults.texture, image])
        }
        DrawItem::Rect(_) | DrawItem::Line(_) => {
            Some([defaults.world, defaults.texture, defaults.texture])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::canvas::RectItem;
    use crate::coords::{Vec2, Vec4};
    use crate::paint::Color;
    use crate::testing::{FakeFont, FakeTexture};
    use crate::text::{AtlasId, FontSource};

    const DEFAULTS: BindingDefaults = BindingDefaults {
        world: ResourceSetId(100),
        texture: ResourceSetId(200),
    };

    fn glyph(font: FakeFont, atlas: AtlasId) -> DrawItem {
        let font: Rc<dyn FontSource> = Rc::new(font);
        DrawItem::Glyph {
            position: Vec2::zero(),
            size: Vec2::splat(1.0),
            color: Color::WHITE,
            region: Vec4::ZERO,
            range: 1.0,
            font,
            atlas,
        }
    }

    fn textured(texture: FakeTexture) -> DrawItem {
        DrawItem::TexturedRect {
            position: Vec2::zero(),
            size: Vec2::splat(1.0),
            modulate: Vec4::ONE,
            texture: Rc::new(texture),
        }
    }

    #[test]
    fn glyph_binds_atlas_in_slot_one() {
        let item = glyph(FakeFont::new().with_atlas(AtlasId(3), ResourceSetId(7)), AtlasId(3));
        assert_eq!(
            resolve_binding_set(&item, &DEFAULTS),
            Some([ResourceSetId(100), ResourceSetId(7), ResourceSetId(200)])
        );
    }

    #[test]
    fn glyph_without_atlas_is_unresolved() {
        let item = glyph(FakeFont::new().with_atlas(AtlasId(0), ResourceSetId(7)), AtlasId(1));
        assert_eq!(resolve_binding_set(&item, &DEFAULTS), None);
    }

    #[test]
    fn realized_texture_binds_in_slot_two() {
        let item = textured(FakeTexture::realized(ResourceSetId(9)));
        assert_eq!(
            resolve_binding_set(&item, &DEFAULTS),
            Some([ResourceSetId(100), ResourceSetId(200), ResourceSetId(9)])
        );
    }

    #[test]
    fn unrealized_texture_falls_back_to_default() {
        let item = textured(FakeTexture::unrealized());
        assert_eq!(
            resolve_binding_set(&item, &DEFAULTS),
            Some([ResourceSetId(100), ResourceSetId(200), ResourceSetId(200)])
        );
    }

    #[test]
    fn solid_items_use_defaults() {
        let item = DrawItem::Line(RectItem {
            position: Vec2::zero(),
            size: Vec2::splat(1.0),
            color: Color::BLACK,
        });
        assert_eq!(
            resolve_binding_set(&item, &DEFAULTS),
            Some([ResourceSetId(100), ResourceSetId(200), ResourceSetId(200)])
        );
    }
}
