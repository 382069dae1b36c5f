//! Glyph layout math shared by text measurement and emission.
//!
//! All glyph metrics are stored at [`NATIVE_RENDER_SIZE`] and scaled by
//! `font_size / NATIVE_RENDER_SIZE`. Measurement walks the same
//! [`layout_glyphs`] path as emission so both stay numerically identical.

use crate::coords::{Vec2, Vec4};

use super::{AtlasId, FontSource, GlyphInfo};

/// Pixel size glyphs are rasterized at when a font is imported.
pub const NATIVE_RENDER_SIZE: f32 = 32.0;

/// Signed-distance spread, in native pixels, used at import.
pub const RENDER_RANGE: f32 = 4.0;

/// Anti-aliasing bleed added to quad and region sizes.
const BLEED: f32 = 0.5;

/// One positioned glyph quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    pub position: Vec2,
    pub size: Vec2,
    /// Atlas px: x0, y0, x1, y1.
    pub region: Vec4,
    pub range: f32,
    pub atlas: AtlasId,
}

#[inline]
fn scale_for(font_size: f32) -> f32 {
    font_size / NATIVE_RENDER_SIZE
}

/// Signed-distance range for `font_size`, never below 1.
#[inline]
pub fn sdf_range(font_size: f32) -> f32 {
    (scale_for(font_size) * RENDER_RANGE).max(1.0)
}

/// Tallest scaled bearing in `text`. Anchors the baseline of every glyph.
pub fn highest_char(font: &dyn FontSource, text: &str, font_size: f32) -> f32 {
    let scale = scale_for(font_size);
    text.chars()
        .map(|c| font.glyph(c).bearing.y * scale)
        .fold(0.0, f32::max)
}

/// Lays `text` out starting at `origin`, one quad per character.
pub fn layout_glyphs(
    font: &dyn FontSource,
    origin: Vec2,
    font_size: f32,
    text: &str,
) -> Vec<GlyphQuad> {
    let scale = scale_for(font_size);
    let top = highest_char(font, text, font_size);
    let range = sdf_range(font_size);

    let mut pen_x = origin.x;
    let mut quads = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let g = font.glyph(ch);
        quads.push(quad_for(ch, &g, pen_x, origin.y + top, scale, range));
        pen_x += pen_advance(&g, scale);
    }
    quads
}

/// Right edge of the emitted quads, bleed excluded, relative to the origin.
pub fn text_width(font: &dyn FontSource, text: &str, font_size: f32) -> f32 {
    layout_glyphs(font, Vec2::zero(), font_size, text)
        .iter()
        .map(|q| q.position.x + q.size.x - BLEED)
        .fold(0.0, f32::max)
}

/// Horizontal pen travel of `text`: where a following run would start.
pub fn text_advance(font: &dyn FontSource, text: &str, font_size: f32) -> f32 {
    let scale = scale_for(font_size);
    text.chars().map(|c| pen_advance(&font.glyph(c), scale)).sum()
}

/// Distance from the top of the line to the lowest glyph bottom.
pub fn text_height(font: &dyn FontSource, text: &str, font_size: f32) -> f32 {
    let scale = scale_for(font_size);
    let top = highest_char(font, text, font_size);
    text.chars()
        .map(|c| {
            let g = font.glyph(c);
            top - g.bearing.y * scale + g.size.y * scale
        })
        .fold(0.0, f32::max)
}

#[inline]
fn pen_advance(g: &GlyphInfo, scale: f32) -> f32 {
    (g.advance - g.bearing.x) * scale
}

fn quad_for(ch: char, g: &GlyphInfo, pen_x: f32, baseline_top: f32, scale: f32, range: f32) -> GlyphQuad {
    GlyphQuad {
        ch,
        position: Vec2::new(pen_x, baseline_top - g.bearing.y * scale),
        size: g.size * scale + Vec2::splat(BLEED),
        region: Vec4::new(
            g.region.x,
            g.region.y,
            g.region.x + g.size.x + BLEED,
            g.region.y + g.size.y + BLEED,
        ),
        range,
        atlas: g.atlas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFont;

    fn font() -> FakeFont {
        FakeFont::new()
            .with_glyph('A', 20.0, Vec2::new(1.0, 24.0), Vec2::new(18.0, 24.0))
            .with_glyph('g', 16.0, Vec2::new(2.0, 14.0), Vec2::new(12.0, 20.0))
            .with_glyph(' ', 8.0, Vec2::zero(), Vec2::zero())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn highest_char_scales_max_bearing() {
        let f = font();
        assert!(approx(highest_char(&f, "Ag", 64.0), 48.0));
        assert!(approx(highest_char(&f, "g", 32.0), 14.0));
        assert_eq!(highest_char(&f, "", 32.0), 0.0);
    }

    #[test]
    fn glyphs_share_a_baseline() {
        let f = font();
        let quads = layout_glyphs(&f, Vec2::new(10.0, 5.0), 32.0, "Ag");
        assert_eq!(quads.len(), 2);

        // baseline = top + bearing.y for every glyph
        let base_a = quads[0].position.y + 24.0;
        let base_g = quads[1].position.y + 14.0;
        assert!(approx(base_a, base_g));
        assert!(approx(quads[0].position.y, 5.0));
    }

    #[test]
    fn pen_advances_by_advance_minus_bearing() {
        let f = font();
        let quads = layout_glyphs(&f, Vec2::new(10.0, 0.0), 64.0, "Ag ");
        assert!(approx(quads[0].position.x, 10.0));
        assert!(approx(quads[1].position.x, 10.0 + (20.0 - 1.0) * 2.0));
        assert!(approx(quads[2].position.x, quads[1].position.x + (16.0 - 2.0) * 2.0));
    }

    #[test]
    fn quad_and_region_carry_bleed() {
        let f = font();
        let q = layout_glyphs(&f, Vec2::zero(), 16.0, "A")[0];
        assert!(approx(q.size.x, 9.5));
        assert!(approx(q.size.y, 12.5));
        assert_eq!(q.region, Vec4::new(0.0, 0.0, 18.5, 24.5));
    }

    #[test]
    fn range_is_floored_at_one() {
        assert_eq!(sdf_range(4.0), 1.0);
        assert!(approx(sdf_range(64.0), 8.0));
    }

    #[test]
    fn measurement_matches_emitted_quads() {
        let f = font();
        let size = 48.0;
        let text = "gA g";
        let origin = Vec2::new(3.0, 7.0);
        let quads = layout_glyphs(&f, origin, size, text);

        let top = quads
            .iter()
            .filter(|q| q.size.y > BLEED)
            .map(|q| q.position.y)
            .fold(f32::MAX, f32::min);
        let bottom = quads
            .iter()
            .map(|q| q.position.y + q.size.y - BLEED)
            .fold(f32::MIN, f32::max);

        assert!(approx(top, origin.y));
        assert!(approx(bottom - origin.y, text_height(&f, text, size)));

        let right = quads
            .iter()
            .map(|q| q.position.x + q.size.x - BLEED)
            .fold(f32::MIN, f32::max);
        assert!(approx(right - origin.x, text_width(&f, text, size)));
    }

    #[test]
    fn width_is_the_right_edge_of_the_last_ink() {
        let f = font();
        let quads = layout_glyphs(&f, Vec2::zero(), 64.0, "Ag");

        // 'g' starts at (20 - 1) * 2 = 38 and is 12 * 2 = 24 wide.
        assert!(approx(quads[1].position.x + quads[1].size.x, 62.5));
        assert!(approx(text_width(&f, "Ag", 64.0), 62.0));
    }

    #[test]
    fn advance_continues_the_same_pen() {
        let f = font();
        let origin = Vec2::new(3.0, 7.0);
        let joined = layout_glyphs(&f, origin, 48.0, "gA gA");
        let next = origin + Vec2::new(text_advance(&f, "gA g", 48.0), 0.0);
        let appended = layout_glyphs(&f, next, 48.0, "A");
        assert!(approx(joined[4].position.x, appended[0].position.x));
    }

    #[test]
    fn unknown_characters_take_no_space() {
        let f = font();
        assert_eq!(text_width(&f, "\u{2603}", 32.0), 0.0);
        assert_eq!(text_advance(&f, "\u{2603}", 32.0), 0.0);
        let q = layout_glyphs(&f, Vec2::zero(), 32.0, "\u{2603}")[0];
        assert_eq!(q.atlas, AtlasId::NONE);
    }
}
