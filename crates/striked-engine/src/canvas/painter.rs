use std::rc::Rc;

use crate::coords::{Vec2, Vec4};
use crate::paint::Color;
use crate::text::{self, FontSource};
use crate::texture::TextureSource;

use super::{Batch, DrawItem, RectItem};

/// Drawing surface handed to [`CanvasContent::draw_canvas`] during a rebuild.
///
/// Every call appends to the canvas batch in call order.
///
/// [`CanvasContent::draw_canvas`]: super::CanvasContent::draw_canvas
pub struct CanvasPainter<'a> {
    batch: &'a mut Batch,
}

impl<'a> CanvasPainter<'a> {
    pub(crate) fn new(batch: &'a mut Batch) -> Self {
        Self { batch }
    }

    /// Items emitted so far in this rebuild.
    #[inline]
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    // ── rects ─────────────────────────────────────────────────────────────

    pub fn draw_rect(&mut self, color: Color, position: Vec2, size: Vec2) {
        self.batch.push(DrawItem::Rect(RectItem { position, size, color }));
    }

    pub fn draw_texture_rect(&mut self, texture: &Rc<dyn TextureSource>, position: Vec2, size: Vec2) {
        self.draw_texture_rect_modulated(texture, position, size, Vec4::ONE);
    }

    /// Textured quad tinted by `modulate` (multiplied per channel).
    pub fn draw_texture_rect_modulated(
        &mut self,
        texture: &Rc<dyn TextureSource>,
        position: Vec2,
        size: Vec2,
        modulate: Vec4,
    ) {
        self.batch.push(DrawItem::TexturedRect {
            position,
            size,
            modulate,
            texture: Rc::clone(texture),
        });
    }

    // ── lines ─────────────────────────────────────────────────────────────

    /// Axis-aligned line from `start` to `end` as a thin rect.
    ///
    /// Size is `end - start` grown by the per-axis thickness. A diagonal
    /// segment yields its bounding box, not a stroke.
    pub fn draw_line(&mut self, color: Color, start: Vec2, end: Vec2, thickness_x: f32, thickness_y: f32) {
        let size = end - start + Vec2::new(thickness_x, thickness_y);
        self.batch.push(DrawItem::Line(RectItem { position: start, size, color }));
    }

    /// Four lines outlining `position..end`, inset by half the thickness.
    pub fn draw_rect_border(&mut self, color: Color, position: Vec2, end: Vec2, thickness: f32) {
        let half = thickness / 2.0;

        // top
        self.draw_line(color, position, Vec2::new(end.x, position.y), 0.0, thickness);
        // bottom
        self.draw_line(
            color,
            Vec2::new(position.x, end.y - half),
            Vec2::new(end.x, end.y - half),
            0.0,
            thickness,
        );
        // left
        self.draw_line(
            color,
            Vec2::new(position.x + half, position.y),
            Vec2::new(position.x + half, end.y),
            thickness,
            0.0,
        );
        // right
        self.draw_line(
            color,
            Vec2::new(end.x - half, position.y),
            Vec2::new(end.x - half, end.y),
            thickness,
            0.0,
        );
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// One glyph item per character of `text`. No-op without a font.
    pub fn draw_text(
        &mut self,
        font: Option<&Rc<dyn FontSource>>,
        color: Color,
        position: Vec2,
        font_size: f32,
        text: &str,
    ) {
        let Some(font) = font else { return };

        for quad in text::layout_glyphs(font.as_ref(), position, font_size, text) {
            self.batch.push(DrawItem::Glyph {
                position: quad.position,
                size: quad.size,
                color,
                region: quad.region,
                range: quad.range,
                font: Rc::clone(font),
                atlas: quad.atlas,
            });
        }
    }

    /// Ink width of `text` as drawn by [`draw_text`](Self::draw_text); 0 without a font.
    pub fn text_width(&self, font: Option<&Rc<dyn FontSource>>, font_size: f32, text: &str) -> f32 {
        font.map_or(0.0, |f| text::text_width(f.as_ref(), text, font_size))
    }

    /// Pen travel of `text`, for placing a following run.
    pub fn text_advance(&self, font: Option<&Rc<dyn FontSource>>, font_size: f32, text: &str) -> f32 {
        font.map_or(0.0, |f| text::text_advance(f.as_ref(), text, font_size))
    }

    pub fn text_height(&self, font: Option<&Rc<dyn FontSource>>, font_size: f32, text: &str) -> f32 {
        font.map_or(0.0, |f| text::text_height(f.as_ref(), text, font_size))
    }

    pub fn highest_char(&self, font: Option<&Rc<dyn FontSource>>, font_size: f32, text: &str) -> f32 {
        font.map_or(0.0, |f| text::highest_char(f.as_ref(), text, font_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFont, FakeTexture};

    fn with_painter(f: impl FnOnce(&mut CanvasPainter<'_>)) -> Batch {
        let mut batch = Batch::new();
        f(&mut CanvasPainter::new(&mut batch));
        batch
    }

    fn font() -> Rc<dyn FontSource> {
        Rc::new(
            FakeFont::new()
                .with_glyph('H', 20.0, Vec2::new(2.0, 22.0), Vec2::new(16.0, 22.0))
                .with_glyph('i', 8.0, Vec2::new(1.0, 23.0), Vec2::new(6.0, 23.0)),
        )
    }

    #[test]
    fn rect_keeps_literal_geometry() {
        let batch = with_painter(|p| p.draw_rect(Color::BLACK, Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.items()[0].rect().origin, Vec2::new(3.0, 4.0));
        assert_eq!(batch.items()[0].size(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn line_size_is_delta_plus_thickness() {
        let batch = with_painter(|p| {
            p.draw_line(Color::WHITE, Vec2::new(10.0, 10.0), Vec2::new(60.0, 10.0), 0.0, 3.0)
        });
        let DrawItem::Line(line) = &batch.items()[0] else { panic!("expected a line") };
        assert_eq!(line.position, Vec2::new(10.0, 10.0));
        assert_eq!(line.size, Vec2::new(50.0, 3.0));
    }

    #[test]
    fn diagonal_line_is_a_bounding_box() {
        let batch = with_painter(|p| p.draw_line(Color::WHITE, Vec2::zero(), Vec2::new(30.0, 40.0), 1.0, 1.0));
        assert_eq!(batch.items()[0].size(), Vec2::new(31.0, 41.0));
    }

    #[test]
    fn border_emits_four_inset_lines() {
        let batch = with_painter(|p| {
            p.draw_rect_border(Color::WHITE, Vec2::zero(), Vec2::new(100.0, 50.0), 4.0)
        });
        let rects: Vec<_> = batch.iter().map(|i| (i.position(), i.size())).collect();
        assert_eq!(
            rects,
            vec![
                (Vec2::new(0.0, 0.0), Vec2::new(100.0, 4.0)),
                (Vec2::new(0.0, 48.0), Vec2::new(100.0, 4.0)),
                (Vec2::new(2.0, 0.0), Vec2::new(4.0, 50.0)),
                (Vec2::new(98.0, 0.0), Vec2::new(4.0, 50.0)),
            ]
        );
        assert!(batch.iter().all(|i| matches!(i, DrawItem::Line(_))));
    }

    #[test]
    fn texture_rect_defaults_to_white_modulate() {
        let tex: Rc<dyn TextureSource> = Rc::new(FakeTexture::unrealized());
        let batch = with_painter(|p| p.draw_texture_rect(&tex, Vec2::zero(), Vec2::splat(16.0)));
        let DrawItem::TexturedRect { modulate, .. } = &batch.items()[0] else {
            panic!("expected a textured rect")
        };
        assert_eq!(*modulate, Vec4::ONE);
    }

    #[test]
    fn text_emits_one_glyph_per_char() {
        let font = font();
        let batch = with_painter(|p| p.draw_text(Some(&font), Color::WHITE, Vec2::zero(), 32.0, "HiHi"));
        assert_eq!(batch.len(), 4);
        assert!(batch.iter().all(DrawItem::is_font));
    }

    #[test]
    fn missing_font_is_a_no_op() {
        let batch = with_painter(|p| {
            p.draw_text(None, Color::WHITE, Vec2::zero(), 32.0, "Hi");
            assert_eq!(p.text_width(None, 32.0, "Hi"), 0.0);
            assert_eq!(p.text_advance(None, 32.0, "Hi"), 0.0);
            assert_eq!(p.text_height(None, 32.0, "Hi"), 0.0);
            assert_eq!(p.highest_char(None, 32.0, "Hi"), 0.0);
        });
        assert!(batch.is_empty());
    }

    #[test]
    fn measurements_agree_with_emitted_glyphs() {
        let font = font();
        let origin = Vec2::new(5.0, 9.0);
        let mut measured = (0.0, 0.0, 0.0);
        let batch = with_painter(|p| {
            p.draw_text(Some(&font), Color::WHITE, origin, 64.0, "Hi");
            measured = (
                p.text_width(Some(&font), 64.0, "Hi"),
                p.text_height(Some(&font), 64.0, "Hi"),
                p.highest_char(Some(&font), 64.0, "Hi"),
            );
        });
        let (width, height, top) = measured;

        // 'i' starts where the pen stopped after 'H'.
        assert_eq!(batch.items()[1].position().x, origin.x + (20.0 - 2.0) * 2.0);
        let right = batch
            .iter()
            .map(|i| i.position().x + i.size().x - 0.5)
            .fold(f32::MIN, f32::max);
        assert!((right - origin.x - width).abs() < 1e-4);
        assert_eq!(width, (20.0 - 2.0) * 2.0 + 6.0 * 2.0);
        assert_eq!(top, 46.0);

        let bottom = batch
            .iter()
            .map(|i| i.position().y + i.size().y - 0.5)
            .fold(f32::MIN, f32::max);
        assert!((bottom - origin.y - height).abs() < 1e-4);
    }

    #[test]
    fn mixed_calls_preserve_order_and_count() {
        let font = font();
        let tex: Rc<dyn TextureSource> = Rc::new(FakeTexture::unrealized());
        let batch = with_painter(|p| {
            p.draw_rect(Color::BLACK, Vec2::zero(), Vec2::splat(1.0));
            p.draw_text(Some(&font), Color::WHITE, Vec2::zero(), 16.0, "Hi");
            p.draw_line(Color::WHITE, Vec2::zero(), Vec2::new(5.0, 0.0), 0.0, 1.0);
            p.draw_texture_rect(&tex, Vec2::zero(), Vec2::splat(2.0));
        });
        let kinds: Vec<&str> = batch
            .iter()
            .map(|i| match i {
                DrawItem::Rect(_) => "rect",
                DrawItem::Glyph { .. } => "glyph",
                DrawItem::Line(_) => "line",
                DrawItem::TexturedRect { .. } => "texture",
            })
            .collect();
        assert_eq!(kinds, vec!["rect", "glyph", "glyph", "line", "texture"]);
    }
}
