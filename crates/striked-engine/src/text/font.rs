use std::collections::HashMap;
use std::fmt;

use crate::coords::Vec2;
use crate::render::Renderer;

use super::atlas::{AtlasBuilder, AtlasPage};
use super::sdf::coverage_to_sdf;
use super::{AtlasHandle, AtlasId, FontImportConfig, FontSource, GlyphInfo, NATIVE_RENDER_SIZE, RENDER_RANGE};

/// Error returned by [`Font::from_bytes`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Vertical line metrics at [`NATIVE_RENDER_SIZE`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    /// Negative below the baseline.
    pub descent: f32,
}

impl LineMetrics {
    #[inline]
    pub fn total_height(self) -> f32 {
        self.ascent - self.descent
    }
}

/// A TrueType/OpenType font imported into signed-distance atlas pages.
///
/// Glyphs are rasterized once at [`NATIVE_RENDER_SIZE`] when the font is
/// loaded; pages are uploaded on the first [`FontSource::bind`].
pub struct Font {
    glyphs: HashMap<char, GlyphInfo>,
    pages: Vec<AtlasPage>,
    line: LineMetrics,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("glyphs", &self.glyphs.len())
            .field("pages", &self.pages.len())
            .field("line", &self.line)
            .finish()
    }
}

impl Font {
    /// Parses `bytes` and builds atlas pages for `config.charset`.
    pub fn from_bytes(bytes: &[u8], config: &FontImportConfig) -> Result<Self, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;

        let spread = RENDER_RANGE as usize;
        let mut builder = AtlasBuilder::new(config.atlas_size);
        let mut glyphs = HashMap::with_capacity(config.charset.len());

        for &c in &config.charset {
            if font.lookup_glyph_index(c) == 0 {
                continue;
            }
            let (m, coverage) = font.rasterize(c, NATIVE_RENDER_SIZE);

            // Whitespace: metrics only, no bitmap.
            if m.width == 0 || m.height == 0 {
                glyphs.insert(
                    c,
                    GlyphInfo {
                        advance: m.advance_width,
                        bearing: Vec2::new(m.xmin as f32, 0.0),
                        size: Vec2::zero(),
                        region: Vec2::zero(),
                        atlas: AtlasId(0),
                    },
                );
                continue;
            }

            let (sdf, w, h) = coverage_to_sdf(&coverage, m.width, m.height, spread);
            let Some((atlas, region)) = builder.place(&sdf, w as u32, h as u32) else {
                log::warn!("glyph {c:?} does not fit a {0}x{0} atlas page", config.atlas_size);
                continue;
            };

            // Bitmap top includes the distance padding; the horizontal bearing
            // stays ink-relative.
            glyphs.insert(
                c,
                GlyphInfo {
                    advance: m.advance_width,
                    bearing: Vec2::new(m.xmin as f32, (m.ymin + m.height as i32 + spread as i32) as f32),
                    size: Vec2::new(w as f32, h as f32),
                    region,
                    atlas,
                },
            );
        }

        let line = font
            .horizontal_line_metrics(NATIVE_RENDER_SIZE)
            .map(|l| LineMetrics { ascent: l.ascent, descent: l.descent })
            .unwrap_or_default();

        let pages = builder.finish();
        log::debug!("font imported: {} glyphs on {} atlas page(s)", glyphs.len(), pages.len());

        Ok(Self { glyphs, pages, line })
    }

    #[inline]
    pub fn line_metrics(&self) -> LineMetrics {
        self.line
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    /// Drops the GPU copies of every atlas page.
    pub fn release(&self, renderer: &mut dyn Renderer) {
        for page in &self.pages {
            page.release(renderer);
        }
    }
}

impl FontSource for Font {
    fn glyph(&self, c: char) -> GlyphInfo {
        self.glyphs.get(&c).copied().unwrap_or(GlyphInfo::missing())
    }

    fn atlas(&self, id: AtlasId) -> Option<AtlasHandle> {
        self.pages.get(id.0 as usize)?.handle()
    }

    fn bind(&self, renderer: &mut dyn Renderer) {
        for page in &self.pages {
            page.realize(renderer);
        }
    }
}
