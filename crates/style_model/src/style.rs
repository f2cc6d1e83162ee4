//! Handwriting style parameters

use crate::{Color, Result, StyleError};
use serde::{Deserialize, Serialize};

/// Ink, spacing and "messiness" parameters of a handwriting style.
///
/// A style is immutable for the duration of a render pass. Variations (a
/// different ink for a question number, a fatigued page) are produced with the
/// `with_*` methods, which return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandwritingStyle {
    /// Font family name
    pub font: String,
    /// Base font size in pixels
    pub size: f32,
    /// Ink color
    pub color: Color,
    /// Line-height multiplier applied to `size`
    pub line_height: f32,
    /// Extra advance after each word
    pub word_spacing: f32,
    /// Extra advance after each glyph
    pub letter_spacing: f32,
    /// Positional noise amplitude per glyph
    pub perturbation: f32,
    /// Full range of random rotation per glyph, in degrees
    pub rotation: f32,
    /// Constant slant applied to every glyph, in degrees
    pub slant: f32,
    /// Amplitude of the random baseline shift
    pub baseline_shift: f32,
}

impl Default for HandwritingStyle {
    fn default() -> Self {
        Self {
            font: "Caveat".to_string(),
            size: 24.0,
            color: Color::rgb(0x1e, 0x29, 0x3b),
            line_height: 1.5,
            word_spacing: 10.0,
            letter_spacing: 0.0,
            perturbation: 0.5,
            rotation: 2.0,
            slant: 0.0,
            baseline_shift: 1.0,
        }
    }
}

impl HandwritingStyle {
    /// A perfectly regular style: no jitter, no rotation, no baseline noise
    pub fn neat() -> Self {
        Self {
            perturbation: 0.0,
            rotation: 0.0,
            baseline_shift: 0.0,
            ..Self::default()
        }
    }

    /// Check the style invariants
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.size,
            self.line_height,
            self.word_spacing,
            self.letter_spacing,
            self.perturbation,
            self.rotation,
            self.slant,
            self.baseline_shift,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(StyleError::InvalidStyle("non-finite parameter".to_string()));
        }
        if self.size <= 0.0 {
            return Err(StyleError::InvalidStyle(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if self.perturbation < 0.0 {
            return Err(StyleError::InvalidStyle(format!(
                "perturbation must be non-negative, got {}",
                self.perturbation
            )));
        }
        if self.rotation < 0.0 {
            return Err(StyleError::InvalidStyle(format!(
                "rotation range must be non-negative, got {}",
                self.rotation
            )));
        }
        Ok(())
    }

    /// Distance between consecutive baselines
    pub fn line_advance(&self) -> f32 {
        self.size * self.line_height
    }

    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn with_perturbation(&self, perturbation: f32) -> Self {
        Self {
            perturbation,
            ..self.clone()
        }
    }

    /// The style a tiring writer drifts into on the `page_index`-th page
    /// (0-based): messier strokes, a growing lean, and wider word gaps.
    pub fn fatigued(&self, page_index: usize, step: f32) -> Self {
        let i = page_index as f32;
        let multiplier = 1.0 + i * step;
        Self {
            perturbation: self.perturbation * multiplier,
            baseline_shift: self.baseline_shift * multiplier,
            slant: self.slant + i * 0.5,
            word_spacing: self.word_spacing * (1.0 + i * 0.05),
            ..self.clone()
        }
    }
}
