//! Exam Question Renderer
//!
//! Composes glyph layout passes into an exam answer: a question number left
//! of the margin, the question beside it, then the answer line by line with
//! step emphasis, an underlined final answer and the occasional crossed-out
//! mistake.

use crate::{GlyphMetrics, HandwritingEngine, RenderTicket, Result};
use math::MathTypesetter;
use render_model::{PageSurface, Point, RandomSource};
use rich_text::{plain_text, tokenize};
use serde::{Deserialize, Serialize};
use style_model::{Color, HandwritingStyle};

/// Offset of the question number to the left of the margin rule
const NUMBER_OFFSET: f32 = 45.0;
/// Gap between the margin rule and the answer text
const CONTENT_INDENT: f32 = 20.0;
/// Samples along the final-answer underline
const UNDERLINE_SAMPLES: usize = 24;
/// Sag of the underline at its midpoint
const UNDERLINE_SAG: f32 = 2.0;
/// Horizontal step of the strike-through scribble
const STRIKE_STEP: f32 = 5.0;
/// Peak-to-peak vertical scatter of the strike-through
const STRIKE_SCATTER: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamQuestion {
    /// Label drawn in the margin, e.g. "Q1"
    pub number: String,
    pub question: String,
    pub answer: String,
}

impl ExamQuestion {
    pub fn new(number: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Formatting variant of an answer line, chosen by its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFormat {
    /// "Step", "Given" or "Therefore": written in black
    Emphasized,
    /// "Final Answer": underlined
    FinalAnswer,
    Normal,
}

impl StepFormat {
    pub fn classify(line: &str) -> Self {
        if ["Step", "Given", "Therefore"].iter().any(|p| line.starts_with(p)) {
            StepFormat::Emphasized
        } else if line.starts_with("Final Answer") {
            StepFormat::FinalAnswer
        } else {
            StepFormat::Normal
        }
    }
}

/// Stacks exam questions on a page through a [`HandwritingEngine`]
pub struct ExamRenderer<'e, M> {
    engine: &'e mut HandwritingEngine<M>,
}

impl<'e, M: MathTypesetter> ExamRenderer<'e, M> {
    pub fn new(engine: &'e mut HandwritingEngine<M>) -> Self {
        Self { engine }
    }

    /// Render one question starting at `start_y`.
    ///
    /// Returns the y at which the next question should start.
    pub async fn render_question(
        &mut self,
        surface: &mut PageSurface,
        question: &ExamQuestion,
        style: &HandwritingStyle,
        start_y: f32,
        ticket: &RenderTicket,
    ) -> Result<f32> {
        let margin = self.engine.page().margin_left;
        let content_x = margin + CONTENT_INDENT;

        let number_style = HandwritingStyle {
            size: style.size * 1.1,
            color: Color::ACCENT_RED,
            ..style.clone()
        };
        self.engine
            .render_text(surface, &question.number, &number_style, margin - NUMBER_OFFSET, start_y)?;

        let mut y = self
            .engine
            .render_rich_text(
                surface,
                &format!("Ans: {}", question.question),
                &style.with_color(Color::SLATE),
                content_x,
                start_y,
                ticket,
            )
            .await?;
        y += style.size * 0.5;

        let emphasized = style.with_color(Color::BLACK);
        for line in question.answer.split('\n') {
            if self.engine.rng_mut().next() < self.engine.settings().correction_probability {
                self.simulate_correction(surface, style, content_x, y)?;
                y += style.size * 1.2;
            }

            y = match StepFormat::classify(line) {
                StepFormat::Emphasized => {
                    self.engine
                        .render_rich_text(surface, line, &emphasized, content_x, y, ticket)
                        .await?
                }
                StepFormat::FinalAnswer => {
                    let end = self
                        .engine
                        .render_rich_text(surface, line, style, content_x, y, ticket)
                        .await?;
                    self.underline(surface, line, style, content_x, end);
                    end
                }
                StepFormat::Normal => {
                    self.engine
                        .render_rich_text(surface, line, style, content_x, y, ticket)
                        .await?
                }
            };
        }

        Ok(y + self.engine.settings().question_gap)
    }

    /// Write the mistake phrase and scribble it out
    fn simulate_correction(
        &mut self,
        surface: &mut PageSurface,
        style: &HandwritingStyle,
        x: f32,
        y: f32,
    ) -> Result<()> {
        let phrase = self.engine.settings().mistake_phrase.clone();
        let width = self.engine.metrics().text_width(&phrase, style.size);
        tracing::debug!("Simulating a correction at y={}", y);
        self.engine.render_text(surface, &phrase, style, x, y)?;

        let mut points = Vec::new();
        let mut offset = 0.0;
        while offset < width {
            let scatter = self.engine.rng_mut().symmetric(STRIKE_SCATTER);
            points.push(Point::new(x + offset, y - 10.0 + scatter));
            offset += STRIKE_STEP;
        }
        self.engine.draw_stroke(surface, points, style.color, 1.5);
        Ok(())
    }

    /// Draw a slightly sagging pen line under the last rendered line.
    ///
    /// Only the written text is measured; markup delimiters take no room.
    fn underline(&mut self, surface: &mut PageSurface, line: &str, style: &HandwritingStyle, x: f32, end_y: f32) {
        let written = plain_text(&tokenize(line));
        let measured = self.engine.metrics().text_width(&written, style.size);
        let width = measured.min(self.engine.right_edge() - x).max(0.0);
        let y = end_y - style.line_advance() + style.size * 0.25;

        // Quadratic curve with its control point at the middle, pulled down
        let points: Vec<Point> = (0..=UNDERLINE_SAMPLES)
            .map(|i| {
                let t = i as f32 / UNDERLINE_SAMPLES as f32;
                let bulge = 2.0 * t * (1.0 - t) * UNDERLINE_SAG;
                Point::new(x + width * t, y + bulge)
            })
            .collect();
        self.engine.draw_stroke(surface, points, Color::PEN, 1.0);
    }
}
