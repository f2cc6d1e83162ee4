//! Typesetter interface

use crate::{MathError, MathResult};
use serde::{Deserialize, Serialize};

/// Measured extent of a typeset expression
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MathBox {
    pub width: f32,
    pub height: f32,
}

impl MathBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Math typesetting collaborator.
///
/// Typesetting is a measurement plus render round trip, so it is async; the
/// layout engine suspends its page at each math token until the box returns.
#[trait_variant::make(Send)]
pub trait MathTypesetter: Send + Sync {
    /// Typeset `expr` at `font_size`, as a display block when `display` is set
    async fn typeset(&self, expr: &str, display: bool, font_size: f32) -> MathResult<MathBox>;
}

/// A typesetter that always fails, for pages rendered without math support
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTypesetter;

impl MathTypesetter for UnavailableTypesetter {
    async fn typeset(&self, _expr: &str, _display: bool, _font_size: f32) -> MathResult<MathBox> {
        Err(MathError::Unavailable("no math renderer attached".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_typesetter_fails() {
        let result = UnavailableTypesetter.typeset("x^2", false, 24.0).await;
        assert!(matches!(result, Err(MathError::Unavailable(_))));
    }

    #[test]
    fn test_zero_box() {
        assert_eq!(MathBox::zero(), MathBox::new(0.0, 0.0));
    }
}
