//! Paper compositor
//!
//! Paints the paper layer of a surface: base color, grain noise, ruled or grid
//! lines, and a hand-drawn margin rule. Must run before any glyph layout on the
//! same surface.

use render_model::{PageSurface, Point, RandomSource};
use style_model::{Color, EngineSettings, PageConfig, PaperType};

/// Horizontal distance between wobble samples on a ruled line
const RULE_WOBBLE_STEP: u32 = 20;
/// Peak-to-peak wobble of ruled lines
const RULE_WOBBLE: f32 = 0.5;
/// Vertical distance between wobble samples on the margin rule
const MARGIN_WOBBLE_STEP: u32 = 10;
/// Peak-to-peak wobble of the margin rule
const MARGIN_WOBBLE: f32 = 2.0;

pub struct PaperCompositor<'a> {
    settings: &'a EngineSettings,
}

impl<'a> PaperCompositor<'a> {
    pub fn new(settings: &'a EngineSettings) -> Self {
        Self { settings }
    }

    /// Paint the full paper layer for `page`
    pub fn draw(&self, surface: &mut PageSurface, page: &PageConfig, rng: &mut dyn RandomSource) {
        tracing::debug!(
            "Drawing {:?} paper {}x{}",
            page.paper_type,
            surface.width(),
            surface.height()
        );

        surface.fill(page.background());
        self.add_grain(surface, rng);

        match page.paper_type {
            PaperType::Ruled => self.draw_ruled_lines(surface, rng),
            PaperType::Grid => self.draw_grid_lines(surface),
            PaperType::Plain | PaperType::Vintage => {}
        }

        self.draw_margin_rule(surface, page, rng);
    }

    /// Shift the luminance of every pixel by an independent small amount
    fn add_grain(&self, surface: &mut PageSurface, rng: &mut dyn RandomSource) {
        let span = self.settings.paper_noise;
        if span <= 0.0 {
            return;
        }
        for pixel in surface.pixels_mut().pixels_mut() {
            let noise = rng.symmetric(span).round() as i16;
            for channel in pixel.0.iter_mut().take(3) {
                *channel = (*channel as i16 + noise).clamp(0, 255) as u8;
            }
        }
    }

    fn draw_ruled_lines(&self, surface: &mut PageSurface, rng: &mut dyn RandomSource) {
        let (width, height) = (surface.width(), surface.height());
        let pitch = self.settings.ruled_line_pitch.max(1) as usize;

        for y in (self.settings.ruled_first_line..height).step_by(pitch) {
            let mut points: Vec<Point> = (0..width)
                .step_by(RULE_WOBBLE_STEP as usize)
                .map(|x| Point::new(x as f32, y as f32 + rng.symmetric(RULE_WOBBLE)))
                .collect();
            points.push(Point::new(width as f32, y as f32 + rng.symmetric(RULE_WOBBLE)));
            surface.stroke_polyline(&points, Color::RULE_BLUE, 1.0);
        }
    }

    fn draw_grid_lines(&self, surface: &mut PageSurface) {
        let (width, height) = (surface.width() as f32, surface.height() as f32);
        let pitch = self.settings.grid_pitch.max(1) as usize;

        for y in (0..surface.height()).step_by(pitch) {
            let y = y as f32;
            surface.stroke_polyline(
                &[Point::new(0.0, y), Point::new(width, y)],
                Color::GRID_GRAY,
                0.5,
            );
        }
        for x in (0..surface.width()).step_by(pitch) {
            let x = x as f32;
            surface.stroke_polyline(
                &[Point::new(x, 0.0), Point::new(x, height)],
                Color::GRID_GRAY,
                0.5,
            );
        }
    }

    fn draw_margin_rule(&self, surface: &mut PageSurface, page: &PageConfig, rng: &mut dyn RandomSource) {
        let points: Vec<Point> = (0..surface.height())
            .step_by(MARGIN_WOBBLE_STEP as usize)
            .map(|y| Point::new(page.margin_left + rng.symmetric(MARGIN_WOBBLE), y as f32))
            .collect();
        surface.stroke_polyline(&points, page.margin_rule_color(), 1.5);
    }
}
