//! Render item types

use crate::PaintState;
use serde::{Deserialize, Serialize};
use style_model::Color;

/// A point in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A single handwritten character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphItem {
    pub ch: char,
    /// Ink, font and the full placement transform (origin on the baseline)
    pub paint: PaintState,
    /// Visual line within the layout pass that produced it
    pub line: u32,
    /// Word within the layout pass that produced it
    pub word: u32,
}

impl GlyphItem {
    /// Baseline origin of the glyph on the surface
    pub fn origin(&self) -> Point {
        let (x, y) = self.paint.transform.translation();
        Point::new(x, y)
    }
}

/// A typeset math expression, placed as an opaque box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathItem {
    pub expr: String,
    pub display: bool,
    pub bounds: Rect,
    pub color: Color,
}

/// A filled dot, used for list bullets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotItem {
    pub center: Point,
    pub radius: f32,
    pub color: Color,
}

/// A hand-drawn polyline (underlines, strike-throughs, sketches)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeItem {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

/// Area reserved for a diagram overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramItem {
    pub kind: String,
    pub bounds: Rect,
}

/// Render item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    Glyph(GlyphItem),
    Math(MathItem),
    Dot(DotItem),
    Stroke(StrokeItem),
    Diagram(DiagramItem),
}

impl RenderItem {
    pub fn as_glyph(&self) -> Option<&GlyphItem> {
        match self {
            RenderItem::Glyph(glyph) => Some(glyph),
            _ => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&StrokeItem> {
        match self {
            RenderItem::Stroke(stroke) => Some(stroke),
            _ => None,
        }
    }

    pub fn as_math(&self) -> Option<&MathItem> {
        match self {
            RenderItem::Math(math) => Some(math),
            _ => None,
        }
    }
}
