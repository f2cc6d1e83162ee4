//! Immutable paint state

use crate::Affine;
use serde::{Deserialize, Serialize};
use style_model::Color;

/// Outline stroke drawn over a filled glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub color: Color,
    pub width: f32,
}

/// Everything needed to paint one item: ink, font and placement.
///
/// Never mutated in place; each derivation returns a new state, so a state
/// handed to a nested layout step cannot leak changes back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintState {
    pub fill: Color,
    pub outline: Option<Outline>,
    pub font_family: String,
    pub font_size: f32,
    pub transform: Affine,
}

impl PaintState {
    pub fn new(font_family: &str, font_size: f32, fill: Color) -> Self {
        Self {
            fill,
            outline: None,
            font_family: font_family.to_string(),
            font_size,
            transform: Affine::IDENTITY,
        }
    }

    pub fn with_fill(&self, fill: Color) -> Self {
        Self {
            fill,
            ..self.clone()
        }
    }

    pub fn with_outline(&self, outline: Option<Outline>) -> Self {
        Self {
            outline,
            ..self.clone()
        }
    }

    pub fn with_font_size(&self, font_size: f32) -> Self {
        Self {
            font_size,
            ..self.clone()
        }
    }

    /// Apply `local` inside the current transform
    pub fn transformed(&self, local: &Affine) -> Self {
        Self {
            transform: self.transform.then_local(local),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivations_leave_original_untouched() {
        let base = PaintState::new("Caveat", 24.0, Color::BLACK);
        let moved = base.transformed(&Affine::translate(5.0, 6.0));
        let bold = base.with_outline(Some(Outline {
            color: Color::BLACK,
            width: 1.0,
        }));

        assert_eq!(base.transform, Affine::IDENTITY);
        assert!(base.outline.is_none());
        assert_eq!(moved.transform.translation(), (5.0, 6.0));
        assert!(bold.outline.is_some());
    }

    #[test]
    fn test_transforms_compose() {
        let state = PaintState::new("Caveat", 24.0, Color::BLACK)
            .transformed(&Affine::translate(10.0, 0.0))
            .transformed(&Affine::translate(0.0, 5.0));
        assert_eq!(state.transform.translation(), (10.0, 5.0));
    }
}
