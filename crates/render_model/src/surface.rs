//! Page surfaces

use crate::{
    Affine, GlyphItem, GlyphMask, GlyphRasterizer, PaintState, Point, RenderError, RenderItem,
    Result,
};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use style_model::Color;

/// One page: a raster layer plus the ink display list drawn on it.
///
/// The raster is a plain RGBA buffer holding the paper and, once items are
/// [painted](PageSurface::paint), their ink. A surface is written by one
/// layout pass at a time.
#[derive(Debug, Clone)]
pub struct PageSurface {
    paper: RgbaImage,
    items: Vec<RenderItem>,
}

impl PageSurface {
    /// A blank, fully transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            paper: RgbaImage::new(width, height),
            items: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.paper.width()
    }

    pub fn height(&self) -> u32 {
        self.paper.height()
    }

    /// The raster: paper with the ink painted so far
    pub fn pixels(&self) -> &RgbaImage {
        &self.paper
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.paper
    }

    /// The ink layer, in drawing order
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphItem> {
        self.items.iter().filter_map(RenderItem::as_glyph)
    }

    pub fn into_parts(self) -> (RgbaImage, Vec<RenderItem>) {
        (self.paper, self.items)
    }

    /// Fill the whole paper layer with one color
    pub fn fill(&mut self, color: Color) {
        let px = Rgba(color.to_array());
        for pixel in self.paper.pixels_mut() {
            *pixel = px;
        }
    }

    /// Draw `item` into the raster, then append it to the display list.
    ///
    /// Glyphs need a rasterizer; without one only their display-list entry
    /// is kept. Math and diagram frames carry no ink of their own.
    pub fn paint(&mut self, item: RenderItem, glyphs: Option<&mut GlyphRasterizer>) {
        match &item {
            RenderItem::Glyph(glyph) => {
                if let Some(glyphs) = glyphs {
                    self.ink_glyph(glyphs, glyph.ch, &glyph.paint);
                }
            }
            RenderItem::Dot(dot) => self.fill_disc(dot.center, dot.radius, dot.color),
            RenderItem::Stroke(stroke) => self.stroke_polyline(&stroke.points, stroke.color, stroke.width),
            RenderItem::Math(_) | RenderItem::Diagram(_) => {}
        }
        self.items.push(item);
    }

    /// Paint every item in order
    pub fn paint_all(
        &mut self,
        items: impl IntoIterator<Item = RenderItem>,
        mut glyphs: Option<&mut GlyphRasterizer>,
    ) {
        for item in items {
            self.paint(item, glyphs.as_deref_mut());
        }
    }

    /// Write one glyph into the raster without recording it.
    ///
    /// An outline is drawn by repeating the mask around the glyph at the
    /// outline width before the fill goes on top.
    pub fn ink_glyph(&mut self, glyphs: &mut GlyphRasterizer, ch: char, paint: &PaintState) {
        let Some(mask) = glyphs.mask(ch, paint.font_size) else {
            return;
        };
        if let Some(outline) = paint.outline {
            let r = outline.width / 2.0;
            for (dx, dy) in [(-r, 0.0), (r, 0.0), (0.0, -r), (0.0, r)] {
                let shifted = paint.transform.then_local(&Affine::translate(dx, dy));
                self.draw_mask(&mask, &shifted, outline.color);
            }
        }
        self.draw_mask(&mask, &paint.transform, paint.fill);
    }

    /// Blend a glyph mask through `transform` in `color`.
    ///
    /// Every destination pixel in the transformed mask's bounding box is
    /// mapped back into glyph space and sampled there, so rotation and shear
    /// stay smooth.
    pub fn draw_mask(&mut self, mask: &GlyphMask, transform: &Affine, color: Color) {
        let Some(inverse) = transform.inverse() else {
            return;
        };
        let (x0, y0, x1, y1) = mask.extent();
        let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)].map(|(x, y)| transform.apply(x, y));
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max).ceil();
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max).ceil();
        let max_x = max_x.min(self.width() as f32);
        let max_y = max_y.min(self.height() as f32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let alpha = color.a as f32 / 255.0;
        for py in min_y as u32..max_y as u32 {
            for px in min_x as u32..max_x as u32 {
                let (lx, ly) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                let cover = mask.sample(lx, ly);
                if cover > 0.0 {
                    blend(self.paper.get_pixel_mut(px, py), color, cover.min(1.0) * alpha);
                }
            }
        }
    }

    /// Fill a disc with a one-pixel soft edge
    pub fn fill_disc(&mut self, center: Point, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let min_x = (center.x - radius - 1.0).floor().max(0.0) as u32;
        let min_y = (center.y - radius - 1.0).floor().max(0.0) as u32;
        let max_x = ((center.x + radius + 1.0).ceil().max(0.0) as u32).min(self.width());
        let max_y = ((center.y + radius + 1.0).ceil().max(0.0) as u32).min(self.height());

        let alpha = color.a as f32 / 255.0;
        for py in min_y..max_y {
            for px in min_x..max_x {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                let cover = (radius + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                if cover > 0.0 {
                    blend(self.paper.get_pixel_mut(px, py), color, cover * alpha);
                }
            }
        }
    }

    /// Rasterize a polyline into the raster.
    ///
    /// Samples every half pixel along each segment and spreads each sample
    /// over its four neighbouring pixels, keeping the strongest coverage per
    /// pixel. Sub-pixel offsets therefore shift ink between rows rather than
    /// snapping. Widths below one pixel fade the line instead of thinning it.
    pub fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f32) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }

        let strength = width.min(1.0);
        let passes = width.ceil().max(1.0) as i32;
        let mut coverage: HashMap<(u32, u32), f32> = HashMap::new();

        for segment in points.windows(2) {
            let (p, q) = (segment[0], segment[1]);
            let (dx, dy) = (q.x - p.x, q.y - p.y);
            let len = (dx * dx + dy * dy).sqrt();
            let (nx, ny) = if len > 0.0 {
                (-dy / len, dx / len)
            } else {
                (0.0, 0.0)
            };
            let steps = (len * 2.0).ceil().max(1.0) as usize;

            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                let (cx, cy) = (p.x + dx * t, p.y + dy * t);
                for k in 0..passes {
                    let offset = k as f32 - (passes - 1) as f32 / 2.0;
                    self.splat(&mut coverage, cx + nx * offset, cy + ny * offset, strength);
                }
            }
        }

        let alpha = color.a as f32 / 255.0;
        for ((x, y), cover) in coverage {
            let pixel = self.paper.get_pixel_mut(x, y);
            blend(pixel, color, cover.min(1.0) * alpha);
        }
    }

    fn splat(&self, coverage: &mut HashMap<(u32, u32), f32>, x: f32, y: f32, strength: f32) {
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let taps = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x0 + 1.0, y0, fx * (1.0 - fy)),
            (x0, y0 + 1.0, (1.0 - fx) * fy),
            (x0 + 1.0, y0 + 1.0, fx * fy),
        ];
        for (px, py, weight) in taps {
            if weight <= 0.0 || px < 0.0 || py < 0.0 {
                continue;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= self.width() || py >= self.height() {
                continue;
            }
            let entry = coverage.entry((px, py)).or_insert(0.0);
            *entry = entry.max(weight * strength);
        }
    }
}

/// Source-over blend of `color` at opacity `alpha` into an opaque pixel
fn blend(pixel: &mut Rgba<u8>, color: Color, alpha: f32) {
    let src = [color.r, color.g, color.b];
    for (channel, s) in pixel.0.iter_mut().take(3).zip(src) {
        let d = *channel as f32;
        *channel = (d + (s as f32 - d) * alpha).round().clamp(0.0, 255.0) as u8;
    }
    let a = pixel.0[3] as f32;
    pixel.0[3] = (a + (255.0 - a) * alpha).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(PageSurface::new(0, 10).is_err());
        assert!(PageSurface::new(10, 0).is_err());
    }

    #[test]
    fn test_fill() {
        let mut surface = PageSurface::new(4, 3).unwrap();
        surface.fill(Color::PAPER);
        assert!(surface
            .pixels()
            .pixels()
            .all(|p| p.0 == Color::PAPER.to_array()));
    }

    #[test]
    fn test_horizontal_stroke_on_integer_row() {
        let mut surface = PageSurface::new(20, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.stroke_polyline(
            &[Point::new(0.0, 5.0), Point::new(19.0, 5.0)],
            Color::BLACK,
            1.0,
        );
        for x in 0..19 {
            assert_eq!(surface.pixels().get_pixel(x, 5).0[0], 0);
            assert_eq!(surface.pixels().get_pixel(x, 2).0[0], 255);
        }
    }

    #[test]
    fn test_subpixel_offset_spreads_ink() {
        let mut surface = PageSurface::new(20, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.stroke_polyline(
            &[Point::new(0.0, 5.5), Point::new(19.0, 5.5)],
            Color::BLACK,
            1.0,
        );
        let upper = surface.pixels().get_pixel(10, 5).0[0];
        let lower = surface.pixels().get_pixel(10, 6).0[0];
        assert!(upper > 0 && upper < 255);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_thin_stroke_is_faint() {
        let mut surface = PageSurface::new(10, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.stroke_polyline(
            &[Point::new(4.0, 0.0), Point::new(4.0, 9.0)],
            Color::BLACK,
            0.5,
        );
        let value = surface.pixels().get_pixel(4, 4).0[0];
        assert!(value > 100 && value < 155);
    }

    #[test]
    fn test_paint_inks_strokes_and_dots() {
        let mut surface = PageSurface::new(40, 40).unwrap();
        surface.fill(Color::WHITE);
        surface.paint(
            RenderItem::Stroke(crate::StrokeItem {
                points: vec![Point::new(2.0, 10.0), Point::new(30.0, 10.0)],
                color: Color::BLACK,
                width: 2.0,
            }),
            None,
        );
        surface.paint(
            RenderItem::Dot(crate::DotItem {
                center: Point::new(20.0, 30.0),
                radius: 4.0,
                color: Color::BLACK,
            }),
            None,
        );

        assert_eq!(surface.items().len(), 2);
        assert!(surface.pixels().get_pixel(15, 10).0[0] < 200);
        assert_eq!(surface.pixels().get_pixel(20, 30).0[0], 0);
        assert_eq!(surface.pixels().get_pixel(20, 36).0[0], 255);
    }

    #[test]
    fn test_draw_mask_follows_transform() {
        let mut surface = PageSurface::new(40, 40).unwrap();
        surface.fill(Color::WHITE);
        // A 4x4 solid block standing on the baseline
        let mask = GlyphMask {
            left: 0,
            top: 4,
            width: 4,
            height: 4,
            alpha: vec![255; 16],
        };
        surface.draw_mask(&mask, &Affine::translate(10.0, 20.0), Color::BLACK);

        assert_eq!(surface.pixels().get_pixel(11, 17).0[0], 0);
        assert_eq!(surface.pixels().get_pixel(11, 21).0[0], 255);
        assert_eq!(surface.pixels().get_pixel(5, 17).0[0], 255);

        // A quarter turn swings the block below the baseline
        surface.fill(Color::WHITE);
        let turned = Affine::translate(10.0, 20.0).then_local(&Affine::rotate(std::f32::consts::FRAC_PI_2));
        surface.draw_mask(&mask, &turned, Color::BLACK);
        assert_eq!(surface.pixels().get_pixel(11, 21).0[0], 0);
        assert_eq!(surface.pixels().get_pixel(11, 17).0[0], 255);
    }

    #[test]
    fn test_glyph_ink_lands_near_origin() {
        let Some(font) = crate::InkFont::system("Caveat") else {
            return;
        };
        let mut glyphs = GlyphRasterizer::new(font);
        let mut surface = PageSurface::new(80, 80).unwrap();
        surface.fill(Color::WHITE);

        let paint = PaintState::new("Caveat", 40.0, Color::BLACK).transformed(&Affine::translate(20.0, 60.0));
        surface.paint(
            RenderItem::Glyph(GlyphItem {
                ch: 'W',
                paint,
                line: 0,
                word: 1,
            }),
            Some(&mut glyphs),
        );

        let inked: Vec<(u32, u32)> = surface
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] < 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        // Ink sits above the baseline, right of the pen origin
        assert!(inked.iter().all(|&(x, y)| x >= 15 && y <= 62));
    }

    #[test]
    fn test_outline_thickens_glyph() {
        let Some(font) = crate::InkFont::system("Caveat") else {
            return;
        };
        let mut glyphs = GlyphRasterizer::new(font);
        let count = |paint: &PaintState, glyphs: &mut GlyphRasterizer| {
            let mut surface = PageSurface::new(60, 60).unwrap();
            surface.fill(Color::WHITE);
            surface.ink_glyph(glyphs, 'l', paint);
            surface.pixels().pixels().filter(|p| p.0[0] < 128).count()
        };

        let plain = PaintState::new("Caveat", 40.0, Color::BLACK).transformed(&Affine::translate(20.0, 50.0));
        let bold = plain.with_outline(Some(crate::Outline {
            color: Color::BLACK,
            width: 2.0,
        }));
        assert!(count(&bold, &mut glyphs) > count(&plain, &mut glyphs));
    }

    #[test]
    fn test_out_of_bounds_points_are_clipped() {
        let mut surface = PageSurface::new(10, 10).unwrap();
        surface.fill(Color::WHITE);
        surface.stroke_polyline(
            &[Point::new(-50.0, -5.0), Point::new(50.0, 20.0)],
            Color::BLACK,
            2.0,
        );
        assert_eq!(surface.width(), 10);
    }
}
