/// Settings used when a font is turned into atlas pages.
///
/// Render size and distance range are fixed ([`NATIVE_RENDER_SIZE`],
/// [`RENDER_RANGE`]) because layout math depends on them.
///
/// [`NATIVE_RENDER_SIZE`]: super::NATIVE_RENDER_SIZE
/// [`RENDER_RANGE`]: super::RENDER_RANGE
#[derive(Debug, Clone, PartialEq)]
pub struct FontImportConfig {
    /// Width and height of each atlas page, in texels.
    pub atlas_size: u32,
    /// Characters rasterized at import. Others render as missing glyphs.
    pub charset: Vec<char>,
}

impl Default for FontImportConfig {
    fn default() -> Self {
        Self {
            atlas_size: 512,
            charset: (0x20u8..=0x7E).map(char::from).collect(),
        }
    }
}

impl FontImportConfig {
    /// Adds `chars` to the charset, skipping duplicates.
    pub fn with_chars(mut self, chars: &str) -> Self {
        for c in chars.chars() {
            if !self.charset.contains(&c) {
                self.charset.push(c);
            }
        }
        self
    }
}
