//! Diagram anchoring and pencil sketches
//!
//! Diagrams are supplied by a [`DiagramProvider`] collaborator; the layout
//! only decides where the overlay goes. [`PencilSketch`] is a built-in
//! provider that draws a few stock figures from wobbly pencil primitives.

use render_model::{DiagramItem, Point, RandomSource, Rect, RenderItem, StrokeItem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use style_model::{Color, PageConfig};

/// Default overlay size in pixels
pub const DIAGRAM_SIZE: (f32, f32) = (300.0, 200.0);

/// Stock figures are authored on this canvas and scaled into their bounds
const DESIGN_WIDTH: f32 = 400.0;
const DESIGN_HEIGHT: f32 = 300.0;

const PENCIL_WIDTH: f32 = 1.0;
/// Segments per pencil line pass
const LINE_STEPS: usize = 10;
/// Overlapping passes per pencil line
const LINE_PASSES: usize = 2;
/// Peak-to-peak jitter of pencil line points
const LINE_JITTER: f32 = 2.0;
/// Angular step of a pencil circle, in radians
const CIRCLE_STEP: f32 = 0.1;
/// Peak-to-peak radial wobble of a pencil circle
const CIRCLE_WOBBLE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Circuit,
    Graph,
    Projection,
    Mechanism,
    Freehand,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 5] = [
        DiagramKind::Circuit,
        DiagramKind::Graph,
        DiagramKind::Projection,
        DiagramKind::Mechanism,
        DiagramKind::Freehand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Circuit => "circuit",
            DiagramKind::Graph => "graph",
            DiagramKind::Projection => "projection",
            DiagramKind::Mechanism => "mechanism",
            DiagramKind::Freehand => "freehand",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DiagramKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown diagram kind: {}", s))
    }
}

/// Collaborator that draws a diagram overlay into a bounding box
pub trait DiagramProvider: Send + Sync {
    fn sketch(&self, kind: DiagramKind, bounds: Rect, rng: &mut dyn RandomSource) -> Vec<RenderItem>;
}

/// Anchor a diagram below the text cursor, kept inside the page
pub fn place_diagram(page: &PageConfig, cursor_y: f32, size: (f32, f32)) -> Rect {
    let x = page.margin_left + 20.0;
    let width = size.0.min((page.width as f32 - x).max(0.0));
    let height = size.1.min(page.height as f32);
    let y = cursor_y.min(page.height as f32 - height).max(0.0);
    Rect::new(x, y, width, height)
}

/// A hand-drawn line: two overlapping jittered passes
pub fn pencil_line(from: Point, to: Point, rng: &mut dyn RandomSource) -> Vec<StrokeItem> {
    (0..LINE_PASSES)
        .map(|_| {
            let mut points = Vec::with_capacity(LINE_STEPS + 1);
            points.push(Point::new(
                from.x + rng.symmetric(LINE_JITTER),
                from.y + rng.symmetric(LINE_JITTER),
            ));
            for j in 1..=LINE_STEPS {
                let t = j as f32 / LINE_STEPS as f32;
                points.push(Point::new(
                    from.x + (to.x - from.x) * t + rng.symmetric(LINE_JITTER),
                    from.y + (to.y - from.y) * t + rng.symmetric(LINE_JITTER),
                ));
            }
            pencil_stroke(points)
        })
        .collect()
}

/// A hand-drawn closed circle with radial wobble
pub fn pencil_circle(center: Point, radius: f32, rng: &mut dyn RandomSource) -> StrokeItem {
    let mut points = Vec::new();
    let mut angle = 0.0f32;
    while angle <= std::f32::consts::TAU {
        let r = radius + rng.symmetric(CIRCLE_WOBBLE);
        points.push(Point::new(center.x + r * angle.cos(), center.y + r * angle.sin()));
        angle += CIRCLE_STEP;
    }
    if let Some(&first) = points.first() {
        points.push(first);
    }
    pencil_stroke(points)
}

fn pencil_stroke(points: Vec<Point>) -> StrokeItem {
    StrokeItem {
        points,
        color: Color::PENCIL,
        width: PENCIL_WIDTH,
    }
}

/// Built-in provider drawing stock figures in pencil
#[derive(Debug, Default, Clone, Copy)]
pub struct PencilSketch;

/// Maps design-canvas coordinates into the target bounds
struct Canvas<'r> {
    bounds: Rect,
    rng: &'r mut dyn RandomSource,
    items: Vec<RenderItem>,
}

impl Canvas<'_> {
    fn at(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.bounds.x + x * self.bounds.width / DESIGN_WIDTH,
            self.bounds.y + y * self.bounds.height / DESIGN_HEIGHT,
        )
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (from, to) = (self.at(x1, y1), self.at(x2, y2));
        let strokes = pencil_line(from, to, &mut *self.rng);
        self.items.extend(strokes.into_iter().map(RenderItem::Stroke));
    }

    fn path(&mut self, points: &[(f32, f32)]) {
        for pair in points.windows(2) {
            self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
        }
    }

    fn rectangle(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)]);
    }

    fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        let center = self.at(cx, cy);
        let scale = (self.bounds.width / DESIGN_WIDTH).min(self.bounds.height / DESIGN_HEIGHT);
        let stroke = pencil_circle(center, radius * scale, &mut *self.rng);
        self.items.push(RenderItem::Stroke(stroke));
    }
}

impl DiagramProvider for PencilSketch {
    fn sketch(&self, kind: DiagramKind, bounds: Rect, rng: &mut dyn RandomSource) -> Vec<RenderItem> {
        let mut canvas = Canvas {
            bounds,
            rng,
            items: vec![RenderItem::Diagram(DiagramItem {
                kind: kind.to_string(),
                bounds,
            })],
        };

        match kind {
            DiagramKind::Circuit => {
                canvas.rectangle(50.0, 50.0, 300.0, 200.0);
                // Battery plates
                canvas.line(40.0, 140.0, 60.0, 140.0);
                canvas.line(30.0, 160.0, 70.0, 160.0);
                // Resistor zig-zag on the top wire
                canvas.path(&[
                    (150.0, 50.0),
                    (160.0, 40.0),
                    (180.0, 60.0),
                    (200.0, 40.0),
                    (220.0, 60.0),
                    (240.0, 40.0),
                    (250.0, 50.0),
                ]);
            }
            DiagramKind::Graph => {
                canvas.line(50.0, 250.0, 350.0, 250.0);
                canvas.line(50.0, 250.0, 50.0, 50.0);
                let curve: Vec<(f32, f32)> = std::iter::once((50.0, 200.0))
                    .chain((50..=350).step_by(30).map(|x| {
                        let x = x as f32;
                        (x, 150.0 + ((x - 50.0) / 50.0).sin() * 50.0)
                    }))
                    .collect();
                canvas.path(&curve);
            }
            DiagramKind::Projection => {
                canvas.rectangle(100.0, 100.0, 150.0, 100.0);
                canvas.rectangle(130.0, 70.0, 150.0, 100.0);
                canvas.line(100.0, 100.0, 130.0, 70.0);
                canvas.line(250.0, 100.0, 280.0, 70.0);
                canvas.line(100.0, 200.0, 130.0, 170.0);
                canvas.line(250.0, 200.0, 280.0, 170.0);
            }
            DiagramKind::Mechanism | DiagramKind::Freehand => {
                canvas.circle(100.0, 100.0, 20.0);
                canvas.line(100.0, 100.0, 250.0, 150.0);
                canvas.circle(250.0, 150.0, 10.0);
            }
        }

        canvas.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_model::{ConstantRandom, SeededRandom};

    #[test]
    fn test_kind_parsing() {
        assert_eq!("circuit".parse::<DiagramKind>().unwrap(), DiagramKind::Circuit);
        assert_eq!(" Graph ".parse::<DiagramKind>().unwrap(), DiagramKind::Graph);
        assert!("flowchart".parse::<DiagramKind>().is_err());
        for kind in DiagramKind::ALL {
            assert_eq!(kind.to_string().parse::<DiagramKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_serde_is_lowercase() {
        let json = serde_json::to_string(&DiagramKind::Mechanism).unwrap();
        assert_eq!(json, "\"mechanism\"");
    }

    #[test]
    fn test_pencil_line_shape() {
        let strokes = pencil_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &mut SeededRandom::new(4));
        assert_eq!(strokes.len(), 2);
        for stroke in &strokes {
            assert_eq!(stroke.points.len(), 11);
            assert!(stroke.points.iter().all(|p| p.y.abs() <= 1.0));
            assert!((stroke.points[10].x - 100.0).abs() <= 1.0);
            assert_eq!(stroke.color, Color::PENCIL);
        }
    }

    #[test]
    fn test_pencil_circle_wobble() {
        let center = Point::new(50.0, 50.0);
        let stroke = pencil_circle(center, 20.0, &mut SeededRandom::new(8));
        assert_eq!(stroke.points.first(), stroke.points.last());
        for p in &stroke.points {
            let r = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
            assert!((18.5 - 1e-3..=21.5 + 1e-3).contains(&r));
        }
    }

    #[test]
    fn test_sketch_stays_near_bounds() {
        let bounds = Rect::new(100.0, 200.0, 300.0, 200.0);
        for kind in DiagramKind::ALL {
            let items = PencilSketch.sketch(kind, bounds, &mut ConstantRandom(0.5));
            assert!(matches!(items[0], RenderItem::Diagram(_)));
            let strokes: Vec<&StrokeItem> = items.iter().filter_map(|i| i.as_stroke()).collect();
            assert!(!strokes.is_empty());
            for p in strokes.iter().flat_map(|s| s.points.iter()) {
                assert!(p.x >= bounds.x && p.x <= bounds.right());
                assert!(p.y >= bounds.y && p.y <= bounds.bottom());
            }
        }
    }

    #[test]
    fn test_place_diagram_clamps_to_page() {
        let page = PageConfig::a4();
        let rect = place_diagram(&page, 100.0, DIAGRAM_SIZE);
        assert_eq!(rect, Rect::new(100.0, 100.0, 300.0, 200.0));

        let low = place_diagram(&page, 2000.0, DIAGRAM_SIZE);
        assert_eq!(low.bottom(), page.height as f32);
    }
}
