//! Page geometry

use crate::{Color, Result, StyleError};
use serde::{Deserialize, Serialize};

/// Kind of paper surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperType {
    Plain,
    #[default]
    Ruled,
    Grid,
    Vintage,
}

/// Pixel geometry and colors of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub paper_type: PaperType,
    pub width: u32,
    pub height: u32,
    /// X position of the vertical margin rule
    pub margin_left: f32,
    /// Baseline of the first content line
    pub margin_top: f32,
    /// Overrides the paper-type default background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_color: Option<Color>,
    /// Overrides the default red margin rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_color: Option<Color>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageConfig {
    /// A4 at 96 dpi, ruled
    pub fn a4() -> Self {
        Self {
            paper_type: PaperType::Ruled,
            width: 794,
            height: 1123,
            margin_left: 80.0,
            margin_top: 100.0,
            paper_color: None,
            margin_color: None,
        }
    }

    pub fn with_paper(&self, paper_type: PaperType) -> Self {
        Self {
            paper_type,
            ..self.clone()
        }
    }

    /// Check that margins fall inside the page
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StyleError::InvalidPage(format!(
                "page must have a non-zero size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..self.width as f32).contains(&self.margin_left) {
            return Err(StyleError::InvalidPage(format!(
                "left margin {} outside [0, {})",
                self.margin_left, self.width
            )));
        }
        if !(0.0..self.height as f32).contains(&self.margin_top) {
            return Err(StyleError::InvalidPage(format!(
                "top margin {} outside [0, {})",
                self.margin_top, self.height
            )));
        }
        Ok(())
    }

    /// Background color after applying the paper-type default
    pub fn background(&self) -> Color {
        match (self.paper_color, self.paper_type) {
            (Some(color), _) => color,
            (None, PaperType::Vintage) => Color::PARCHMENT,
            (None, _) => Color::PAPER,
        }
    }

    pub fn margin_rule_color(&self) -> Color {
        self.margin_color.unwrap_or(Color::MARGIN_RED)
    }
}
