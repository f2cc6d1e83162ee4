//! Handwriting fonts and glyph rasterization
//!
//! Faces are resolved through a process-wide `fontdb` database of system
//! fonts and rasterized to alpha coverage masks with `swash`. Masks are cached
//! per character and size, so a page only scales each distinct glyph once.

use crate::{RenderError, Result};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;
use swash::FontRef;

/// System font database, loaded on first use
fn system_fonts() -> &'static Database {
    static FONTS: OnceLock<Database> = OnceLock::new();
    FONTS.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

/// One font face, shared cheaply between rasterizers
#[derive(Debug, Clone)]
pub struct InkFont {
    data: Arc<Vec<u8>>,
    index: u32,
    family: String,
}

impl InkFont {
    /// A face from raw font file bytes
    pub fn from_bytes(data: Vec<u8>, index: u32, family: &str) -> Result<Self> {
        if FontRef::from_index(&data, index as usize).is_none() {
            return Err(RenderError::Font(format!("unreadable face {} in {}", index, family)));
        }
        Ok(Self {
            data: Arc::new(data),
            index,
            family: family.to_string(),
        })
    }

    /// The first face of a font file
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, 0, &family)
    }

    /// Resolve `family` among the system fonts.
    ///
    /// Falls back to any cursive face, then sans-serif, then serif. Returns
    /// `None` when the system has no usable font at all.
    pub fn system(family: &str) -> Option<Self> {
        let db = system_fonts();
        let families = [
            Family::Name(family),
            Family::Cursive,
            Family::SansSerif,
            Family::Serif,
        ];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;

        let resolved = db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| family.to_string());
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        if resolved != family {
            tracing::debug!("Font {:?} not installed, writing with {:?}", family, resolved);
        }
        Self::from_bytes(data, index, &resolved).ok()
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn face(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index as usize)
    }
}

/// Alpha coverage of one glyph, positioned relative to its pen origin.
///
/// Row `r` of the mask sits `top - r` pixels above the baseline and column
/// `c` sits `left + c` pixels right of the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl GlyphMask {
    /// Coverage in `0.0..=1.0` at mask pixel `(col, row)`, zero outside
    pub fn coverage(&self, col: i32, row: i32) -> f32 {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return 0.0;
        }
        self.alpha[(row as u32 * self.width + col as u32) as usize] as f32 / 255.0
    }

    /// Bilinear coverage at a point in glyph space (y down, baseline at 0)
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let u = x - self.left as f32 - 0.5;
        let v = y + self.top as f32 - 0.5;
        let (c0, r0) = (u.floor(), v.floor());
        let (fu, fv) = (u - c0, v - r0);
        let (c0, r0) = (c0 as i32, r0 as i32);

        self.coverage(c0, r0) * (1.0 - fu) * (1.0 - fv)
            + self.coverage(c0 + 1, r0) * fu * (1.0 - fv)
            + self.coverage(c0, r0 + 1) * (1.0 - fu) * fv
            + self.coverage(c0 + 1, r0 + 1) * fu * fv
    }

    /// Glyph-space box `(x0, y0, x1, y1)` covered by the mask
    pub fn extent(&self) -> (f32, f32, f32, f32) {
        let x0 = self.left as f32;
        let y0 = -self.top as f32;
        (x0, y0, x0 + self.width as f32, y0 + self.height as f32)
    }
}

/// Scales glyphs of one font into coverage masks
pub struct GlyphRasterizer {
    font: InkFont,
    context: ScaleContext,
    masks: HashMap<(char, u32), Option<Arc<GlyphMask>>>,
}

impl GlyphRasterizer {
    pub fn new(font: InkFont) -> Self {
        Self {
            font,
            context: ScaleContext::new(),
            masks: HashMap::new(),
        }
    }

    pub fn font(&self) -> &InkFont {
        &self.font
    }

    /// Coverage mask of `ch` at `size` pixels per em.
    ///
    /// `None` for whitespace, for characters the font lacks, and for glyphs
    /// with no outline.
    pub fn mask(&mut self, ch: char, size: f32) -> Option<Arc<GlyphMask>> {
        let key = (ch, size.to_bits());
        if let Some(cached) = self.masks.get(&key) {
            return cached.clone();
        }
        let mask = self.scale(ch, size).map(Arc::new);
        self.masks.insert(key, mask.clone());
        mask
    }

    /// Horizontal advance of `ch` at `size`, zero when the font lacks it
    pub fn advance(&self, ch: char, size: f32) -> f32 {
        let Some(face) = self.font.face() else {
            return 0.0;
        };
        let glyph = face.charmap().map(ch);
        face.glyph_metrics(&[]).scale(size).advance_width(glyph)
    }

    fn scale(&mut self, ch: char, size: f32) -> Option<GlyphMask> {
        if ch.is_whitespace() || size <= 0.0 {
            return None;
        }
        let face = self.font.face()?;
        let glyph = face.charmap().map(ch);
        if glyph == 0 {
            tracing::trace!("No glyph for {:?} in {}", ch, self.font.family);
            return None;
        }

        let mut scaler = self.context.builder(face).size(size).hint(false).build();
        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph)?;

        let placement = image.placement;
        if placement.width == 0 || placement.height == 0 {
            return None;
        }
        let pixels = (placement.width * placement.height) as usize;
        // Color sources come back as RGBA; keep their alpha channel
        let alpha = if image.data.len() == pixels * 4 {
            image.data.chunks_exact(4).map(|px| px[3]).collect()
        } else {
            image.data
        };

        Some(GlyphMask {
            left: placement.left,
            top: placement.top,
            width: placement.width,
            height: placement.height,
            alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask() -> GlyphMask {
        GlyphMask {
            left: 1,
            top: 4,
            width: 2,
            height: 2,
            alpha: vec![255; 4],
        }
    }

    #[test]
    fn test_mask_extent() {
        assert_eq!(square_mask().extent(), (1.0, -4.0, 3.0, -2.0));
    }

    #[test]
    fn test_sample_inside_and_outside() {
        let mask = square_mask();
        // Centre of the top-left mask pixel
        assert!((mask.sample(1.5, -3.5) - 1.0).abs() < 1e-6);
        assert_eq!(mask.sample(10.0, 10.0), 0.0);
        // Half a pixel past the right edge fades to half coverage
        assert!((mask.sample(3.0, -3.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(matches!(
            InkFont::from_bytes(vec![0, 1, 2, 3], 0, "junk"),
            Err(RenderError::Font(_))
        ));
    }

    #[test]
    fn test_system_font_rasterizes_letters() {
        // Hosts without any installed font have nothing to rasterize
        let Some(font) = InkFont::system("Caveat") else {
            return;
        };
        let mut glyphs = GlyphRasterizer::new(font);

        let mask = glyphs.mask('H', 32.0).unwrap();
        assert!(mask.width > 0 && mask.height > 0);
        assert!(mask.top > 0);
        assert!(mask.alpha.iter().any(|&a| a > 128));
        assert!(glyphs.advance('H', 32.0) > 0.0);

        assert!(glyphs.mask(' ', 32.0).is_none());
        // Cached masks are shared
        assert!(Arc::ptr_eq(&mask, &glyphs.mask('H', 32.0).unwrap()));
    }
}
