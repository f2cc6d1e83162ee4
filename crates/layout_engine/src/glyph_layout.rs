//! Stochastic Glyph Layout Engine
//!
//! Places text one glyph at a time, left to right, onto a page surface. Every
//! glyph gets independent positional, rotational and baseline noise scaled by
//! the style, plus a slow sinusoidal drift of the baseline across the line.
//!
//! The layout proceeds as follows:
//! 1. Split the input into lines; blank lines advance by half a line height
//! 2. In rich mode, detect a list marker, then tokenize the line into runs
//! 3. Split each text run into words on single spaces
//! 4. Wrap before any word that would cross the right boundary
//! 5. Place each glyph of the word with its own random transform
//! 6. Advance past the word by the word spacing plus noise
//!
//! Every item is painted into the surface raster as it is placed, and also
//! kept in the display list. Math runs are delegated to a [`MathTypesetter`]
//! for their box and written inside it in linear form. They are the only
//! points where a layout pass suspends, and the render ticket is checked
//! right after each one.

use crate::{GlyphMetrics, HandMetrics, PaperCompositor, RenderTicket, Result};
use math::{linear_text, EstimatingTypesetter, MathBox, MathTypesetter};
use render_model::{
    Affine, DotItem, EntropyRandom, GlyphItem, GlyphRasterizer, InkFont, MathItem, Outline,
    PaintState, PageSurface, Point, RandomSource, Rect, RenderItem, StrokeItem,
};
use rich_text::{split_list_item, tokenize, ListMarker, Token};
use std::sync::Arc;
use style_model::{Color, EngineSettings, HandwritingStyle, PageConfig};

/// Horizontal shear applied to italic glyphs
const ITALIC_SHEAR: f32 = -0.2;
/// Outline width used to embolden glyphs
const BOLD_OUTLINE: f32 = 1.0;
/// Gap left after an inline math box and below a block math box
const MATH_GAP: f32 = 10.0;
/// Fraction of a math box drawn above the baseline
const MATH_ASCENT: f32 = 0.8;
/// Display math is written this much larger than the body
const DISPLAY_MATH_SCALE: f32 = 1.2;
/// Wavelength divisor of the baseline drift
const DRIFT_PERIOD: f32 = 100.0;

/// Pen position during a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
    /// Where wrapped lines resume (indented inside list items)
    pub line_start: f32,
}

impl Cursor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, line_start: x }
    }
}

/// How the glyphs of one run are drawn
#[derive(Debug, Clone)]
struct Pen<'s> {
    style: &'s HandwritingStyle,
    paint: PaintState,
    italic: bool,
}

impl<'s> Pen<'s> {
    fn plain(style: &'s HandwritingStyle) -> Self {
        Self {
            style,
            paint: PaintState::new(&style.font, style.size, style.color),
            italic: false,
        }
    }

    fn bold(style: &'s HandwritingStyle) -> Self {
        let pen = Self::plain(style);
        Self {
            paint: pen.paint.with_outline(Some(Outline {
                color: style.color,
                width: BOLD_OUTLINE,
            })),
            ..pen
        }
    }

    fn italic(style: &'s HandwritingStyle) -> Self {
        Self {
            italic: true,
            ..Self::plain(style)
        }
    }
}

/// Handwriting layout engine for one page geometry.
///
/// The engine owns its random source. Inject a [`render_model::SeededRandom`]
/// or [`render_model::PooledRandom`] for reproducible output; the default is
/// an unseeded source, so two renders of the same input differ.
///
/// Glyph ink comes from the system font closest to the default hand, unless
/// another font is given with [`HandwritingEngine::with_font`]. On a host with
/// no fonts, glyphs are only recorded in the display list.
pub struct HandwritingEngine<M = EstimatingTypesetter> {
    page: PageConfig,
    settings: EngineSettings,
    rng: Box<dyn RandomSource + Send>,
    metrics: Arc<dyn GlyphMetrics>,
    glyphs: Option<GlyphRasterizer>,
    math: M,
    line: u32,
    word: u32,
}

impl HandwritingEngine<EstimatingTypesetter> {
    /// An engine that sizes math from the expression source
    pub fn with_page(page: PageConfig) -> Self {
        Self::new(page, EstimatingTypesetter)
    }
}

impl<M: MathTypesetter> HandwritingEngine<M> {
    pub fn new(page: PageConfig, math: M) -> Self {
        Self {
            page,
            settings: EngineSettings::default(),
            rng: Box::new(EntropyRandom::new()),
            metrics: Arc::new(HandMetrics),
            glyphs: InkFont::system(&HandwritingStyle::default().font).map(GlyphRasterizer::new),
            math,
            line: 0,
            word: 0,
        }
    }

    pub fn with_random(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn GlyphMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Write glyphs with `font`
    pub fn with_font(mut self, font: InkFont) -> Self {
        self.glyphs = Some(GlyphRasterizer::new(font));
        self
    }

    /// The font glyphs are written with, if any
    pub fn font(&self) -> Option<&InkFont> {
        self.glyphs.as_ref().map(GlyphRasterizer::font)
    }

    pub fn glyphs_mut(&mut self) -> Option<&mut GlyphRasterizer> {
        self.glyphs.as_mut()
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &dyn GlyphMetrics {
        self.metrics.as_ref()
    }

    pub fn rng_mut(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }

    /// Rightmost x a word may reach before it is wrapped
    pub fn right_edge(&self) -> f32 {
        self.page.width as f32 - self.settings.right_gutter
    }

    /// Width a word occupies before noise: glyph advances plus letter spacing
    pub fn word_width(&self, word: &str, style: &HandwritingStyle) -> f32 {
        self.metrics.text_width(word, style.size)
            + word.chars().count() as f32 * style.letter_spacing
    }

    /// Paint the paper layer. Must precede any layout on the same surface.
    pub fn draw_paper(&mut self, surface: &mut PageSurface) {
        PaperCompositor::new(&self.settings).draw(surface, &self.page, &mut self.rng);
    }

    /// Lay out `text` with no markup interpretation.
    ///
    /// Returns the y position below the last line, so passes can be chained.
    pub fn render_text(
        &mut self,
        surface: &mut PageSurface,
        text: &str,
        style: &HandwritingStyle,
        start_x: f32,
        start_y: f32,
    ) -> Result<f32> {
        self.page.validate()?;
        style.validate()?;
        let line_advance = style.line_advance();
        let pen = Pen::plain(style);
        let mut cursor = Cursor::new(start_x, start_y);

        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                cursor.y += line_advance * 0.5;
                continue;
            }
            cursor.x = start_x;
            self.place_words(surface, paragraph, &pen, &mut cursor);
            self.new_line(&mut cursor, line_advance);
        }

        Ok(cursor.y)
    }

    /// Lay out `text` with list markers, bold, italic and math runs.
    ///
    /// Returns the y position below the last line. Fails with
    /// [`crate::LayoutError::Cancelled`] when `ticket` is superseded while a
    /// math run is being typeset; nothing from the math result is applied.
    pub async fn render_rich_text(
        &mut self,
        surface: &mut PageSurface,
        text: &str,
        style: &HandwritingStyle,
        start_x: f32,
        start_y: f32,
        ticket: &RenderTicket,
    ) -> Result<f32> {
        self.page.validate()?;
        style.validate()?;
        ticket.ensure_current()?;

        let line_advance = style.line_advance();
        let mut cursor = Cursor::new(start_x, start_y);

        for line in text.split('\n') {
            if line.trim().is_empty() {
                cursor.y += line_advance * 0.5;
                continue;
            }

            cursor.line_start = start_x;
            let content = match split_list_item(line) {
                Some((marker, rest)) => {
                    self.draw_list_marker(surface, &marker, style, start_x, cursor.y);
                    cursor.line_start = start_x + self.settings.list_indent;
                    rest
                }
                None => line,
            };
            cursor.x = cursor.line_start;

            for token in tokenize(content) {
                match &token {
                    Token::Plain(run) => {
                        self.place_words(surface, run, &Pen::plain(style), &mut cursor)
                    }
                    Token::Bold(run) => self.place_words(surface, run, &Pen::bold(style), &mut cursor),
                    Token::Italic(run) => {
                        self.place_words(surface, run, &Pen::italic(style), &mut cursor)
                    }
                    Token::InlineMath(expr) => {
                        let measured = self.typeset(expr, false, style, ticket).await?;
                        if let Some(math_box) = measured {
                            self.place_inline_math(surface, expr, math_box, style, &mut cursor);
                        }
                    }
                    Token::BlockMath(expr) => {
                        let measured = self.typeset(expr, true, style, ticket).await?;
                        if let Some(math_box) = measured {
                            self.place_block_math(surface, expr, math_box, style, &mut cursor);
                        }
                    }
                }
            }

            cursor.line_start = start_x;
            self.new_line(&mut cursor, line_advance);
        }

        Ok(cursor.y)
    }

    /// Paint a freehand stroke onto the page
    pub fn draw_stroke(&self, surface: &mut PageSurface, points: Vec<Point>, color: Color, width: f32) {
        if points.len() < 2 {
            return;
        }
        surface.paint(
            RenderItem::Stroke(StrokeItem {
                points,
                color,
                width,
            }),
            None,
        );
    }

    /// Paint items produced outside the engine, such as a diagram overlay
    pub fn paint_items(&mut self, surface: &mut PageSurface, items: Vec<RenderItem>) {
        surface.paint_all(items, self.glyphs.as_mut());
    }

    fn new_line(&mut self, cursor: &mut Cursor, line_advance: f32) {
        cursor.x = cursor.line_start;
        cursor.y += line_advance;
        self.line += 1;
    }

    fn draw_list_marker(
        &mut self,
        surface: &mut PageSurface,
        marker: &ListMarker,
        style: &HandwritingStyle,
        start_x: f32,
        y: f32,
    ) {
        match marker.label() {
            None => surface.paint(
                RenderItem::Dot(DotItem {
                    center: Point::new(start_x + 10.0, y - style.size / 3.0),
                    radius: style.size / 5.0,
                    color: style.color,
                }),
                None,
            ),
            Some(label) => {
                let mut marker_cursor = Cursor::new(start_x, y);
                self.place_word(surface, &label, &Pen::plain(style), &mut marker_cursor);
            }
        }
    }

    /// Typeset a math run and confirm the render is still wanted.
    ///
    /// A typesetting failure is logged and yields `None` so the run is
    /// skipped with no advance.
    async fn typeset(
        &self,
        expr: &str,
        display: bool,
        style: &HandwritingStyle,
        ticket: &RenderTicket,
    ) -> Result<Option<MathBox>> {
        let result = self.math.typeset(expr, display, style.size).await;
        ticket.ensure_current()?;
        match result {
            Ok(math_box) => Ok(Some(math_box)),
            Err(e) => {
                tracing::warn!("Skipping math run {:?}: {}", expr, e);
                Ok(None)
            }
        }
    }

    fn place_inline_math(
        &mut self,
        surface: &mut PageSurface,
        expr: &str,
        math_box: MathBox,
        style: &HandwritingStyle,
        cursor: &mut Cursor,
    ) {
        if cursor.x > cursor.line_start && cursor.x + math_box.width > self.right_edge() {
            self.new_line(cursor, style.line_advance());
        }
        let bounds = math_bounds(cursor.x, cursor.y, math_box);
        self.write_math(surface, expr, bounds, style.size, style);
        surface.paint(
            RenderItem::Math(MathItem {
                expr: expr.to_string(),
                display: false,
                bounds,
                color: style.color,
            }),
            None,
        );
        cursor.x += math_box.width + MATH_GAP;
    }

    fn place_block_math(
        &mut self,
        surface: &mut PageSurface,
        expr: &str,
        math_box: MathBox,
        style: &HandwritingStyle,
        cursor: &mut Cursor,
    ) {
        self.new_line(cursor, style.line_advance());
        let bounds = math_bounds(cursor.x, cursor.y, math_box);
        self.write_math(surface, expr, bounds, style.size * DISPLAY_MATH_SCALE, style);
        surface.paint(
            RenderItem::Math(MathItem {
                expr: expr.to_string(),
                display: true,
                bounds,
                color: style.color,
            }),
            None,
        );
        cursor.y += math_box.height + MATH_GAP;
        cursor.x = cursor.line_start;
    }

    /// Write the linear form of a math run into its box.
    ///
    /// The characters go into the raster only; the display list keeps the
    /// run as one math item. Text wider than the box is squeezed to fit.
    fn write_math(
        &mut self,
        surface: &mut PageSurface,
        expr: &str,
        bounds: Rect,
        size: f32,
        style: &HandwritingStyle,
    ) {
        let Some(glyphs) = self.glyphs.as_mut() else {
            return;
        };
        let text = linear_text(expr);
        let natural: f32 = text.chars().map(|ch| glyphs.advance(ch, size)).sum();
        let squeeze = if natural > bounds.width && natural > 0.0 {
            bounds.width / natural
        } else {
            1.0
        };

        let paint = PaintState::new(&style.font, size, style.color);
        let baseline = bounds.y + bounds.height * MATH_ASCENT;
        let mut x = bounds.x;
        for ch in text.chars() {
            let placed = Affine::translate(x, baseline).then_local(&Affine::scale(squeeze, 1.0));
            surface.ink_glyph(glyphs, ch, &paint.transformed(&placed));
            x += glyphs.advance(ch, size) * squeeze;
        }
    }

    fn place_words(&mut self, surface: &mut PageSurface, run: &str, pen: &Pen<'_>, cursor: &mut Cursor) {
        for word in run.split(' ').filter(|w| !w.is_empty()) {
            self.place_word(surface, word, pen, cursor);
            let p = pen.style.perturbation;
            cursor.x += pen.style.word_spacing + self.rng.up_to(2.0 * p);
        }
    }

    /// Place one word, wrapping first if it would cross the right boundary.
    ///
    /// Words are never split. A word wider than the whole line is placed at
    /// the line start and allowed to overflow.
    fn place_word(&mut self, surface: &mut PageSurface, word: &str, pen: &Pen<'_>, cursor: &mut Cursor) {
        let style = pen.style;
        let width = self.word_width(word, style);
        if cursor.x > cursor.line_start && cursor.x + width > self.right_edge() {
            self.new_line(cursor, style.line_advance());
        }
        self.word += 1;

        let p = style.perturbation;
        let slant = style.slant.to_radians();
        let rotation_range = style.rotation.to_radians();

        for ch in word.chars() {
            let jitter_x = self.rng.symmetric(2.0 * p);
            let jitter_y = self.rng.symmetric(2.0 * p);
            let angle = slant + self.rng.symmetric(rotation_range);
            let baseline = self.rng.symmetric(style.baseline_shift);
            let drift = (cursor.x / DRIFT_PERIOD).sin() * p;

            let mut transform = Affine::translate(
                cursor.x + jitter_x,
                cursor.y + jitter_y + baseline + drift,
            )
            .then_local(&Affine::rotate(angle));
            if pen.italic {
                transform = transform.then_local(&Affine::shear(ITALIC_SHEAR, 0.0));
            }

            surface.paint(
                RenderItem::Glyph(GlyphItem {
                    ch,
                    paint: pen.paint.transformed(&transform),
                    line: self.line,
                    word: self.word,
                }),
                self.glyphs.as_mut(),
            );

            cursor.x += self.metrics.advance(ch, style.size) + style.letter_spacing + self.rng.up_to(p);
        }
    }
}

fn math_bounds(x: f32, y: f32, math_box: MathBox) -> Rect {
    Rect::new(x, y - math_box.height * MATH_ASCENT, math_box.width, math_box.height)
}
