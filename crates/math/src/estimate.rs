//! Metric estimation from LaTeX-like source
//!
//! Walks the expression once, counting glyphs that would be visible once
//! typeset: structural commands (`\frac`, `\left`, ...) and grouping braces
//! draw nothing, symbol commands (`\alpha`, `\times`, ...) draw one glyph,
//! and script content is drawn smaller.

use crate::{MathBox, MathResult, MathTypesetter};

/// Commands that only structure their arguments
const STRUCTURAL: &[&str] = &[
    "frac", "dfrac", "tfrac", "sqrt", "left", "right", "text", "mathrm", "mathbf", "mathit",
    "operatorname", "displaystyle", "limits", "big", "Big", "quad", "qquad",
];

/// Width of an average math glyph, in ems
const GLYPH_EM: f32 = 0.6;

/// Scale of superscript and subscript glyphs
const SCRIPT_SCALE: f32 = 0.7;

/// Display math is set this much larger than inline math
const DISPLAY_SCALE: f32 = 1.2;

/// Shape summary of an expression
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MathShape {
    /// Visible glyphs, with script glyphs weighted by their scale
    pub glyph_ems: f32,
    /// Number of stacked fractions
    pub fractions: usize,
    /// Whether any superscript or subscript appears
    pub has_scripts: bool,
}

/// Summarize an expression's visible content
pub fn measure_shape(expr: &str) -> MathShape {
    let mut shape = MathShape::default();
    let mut chars = expr.chars().peekable();
    // Scale of the glyphs currently being read, one entry per open group
    let mut scales: Vec<f32> = vec![1.0];
    let mut pending_script = false;

    while let Some(ch) = chars.next() {
        let scale = scales.last().copied().unwrap_or(1.0);
        match ch {
            '\\' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    // Escaped symbol such as `\{` or `\,`
                    if chars.next().is_some() {
                        shape.glyph_ems += scale;
                    }
                } else if name.starts_with("frac") || name.ends_with("frac") {
                    shape.fractions += 1;
                } else if !STRUCTURAL.contains(&name.as_str()) {
                    shape.glyph_ems += scale;
                }
            }
            '^' | '_' => {
                shape.has_scripts = true;
                pending_script = true;
                continue;
            }
            '{' => {
                let inner = if pending_script { scale * SCRIPT_SCALE } else { scale };
                scales.push(inner);
            }
            '}' => {
                if scales.len() > 1 {
                    scales.pop();
                }
            }
            c if c.is_whitespace() => {}
            _ => {
                let glyph = if pending_script { scale * SCRIPT_SCALE } else { scale };
                shape.glyph_ems += glyph;
            }
        }
        pending_script = false;
    }

    shape
}

/// Estimate the box an expression would occupy at `font_size`
pub fn estimate_box(expr: &str, display: bool, font_size: f32) -> MathBox {
    let shape = measure_shape(expr);
    let size = if display { font_size * DISPLAY_SCALE } else { font_size };

    let width = shape.glyph_ems * GLYPH_EM * size;
    let mut height = size * 1.2;
    if shape.fractions > 0 {
        height *= 2.0;
    }
    if shape.has_scripts {
        height += size * 0.3;
    }
    MathBox::new(width, height)
}

/// Typesetter that measures expressions from their source without drawing
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimatingTypesetter;

impl MathTypesetter for EstimatingTypesetter {
    async fn typeset(&self, expr: &str, display: bool, font_size: f32) -> MathResult<MathBox> {
        Ok(estimate_box(expr, display, font_size))
    }
}
