//! Page renderer
//!
//! Renders every page of an [`ExamPlan`] onto its own surface: paper, subject
//! header, content, optional diagram, then an ink-flow pass over the inked
//! pixels. Later pages are written with a progressively tired hand.

use crate::{
    place_diagram, DiagramKind, DiagramProvider, ExamPlan, HandwritingEngine, PencilSketch,
    RenderTicket, Result, DIAGRAM_SIZE,
};
use math::MathTypesetter;
use render_model::{PageSurface, RandomSource};
use std::sync::Arc;
use style_model::{Color, HandwritingStyle};

/// Header sits this far above the top margin
const HEADER_RAISE: f32 = 40.0;
/// Header size relative to the body
const HEADER_SCALE: f32 = 0.8;
/// Exclusive upper bound of the ink-flow lightening per pixel
const INK_FLOW: f32 = 20.0;
/// Pixels with a red channel below this count as ink
const INK_THRESHOLD: u8 = 200;

/// One finished page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page_number: usize,
    pub surface: PageSurface,
}

pub struct PageRenderer<M> {
    engine: HandwritingEngine<M>,
    style: HandwritingStyle,
    diagrams: Arc<dyn DiagramProvider>,
}

impl<M: MathTypesetter> PageRenderer<M> {
    pub fn new(engine: HandwritingEngine<M>, style: HandwritingStyle) -> Self {
        Self {
            engine,
            style,
            diagrams: Arc::new(PencilSketch),
        }
    }

    pub fn with_diagrams(mut self, diagrams: Arc<dyn DiagramProvider>) -> Self {
        self.diagrams = diagrams;
        self
    }

    pub fn engine_mut(&mut self) -> &mut HandwritingEngine<M> {
        &mut self.engine
    }

    pub fn style(&self) -> &HandwritingStyle {
        &self.style
    }

    /// Render every page of `plan` in order.
    ///
    /// Fails with [`crate::LayoutError::Cancelled`] as soon as `ticket` is
    /// superseded; pages finished so far are discarded with it.
    pub async fn render_plan(&mut self, plan: &ExamPlan, ticket: &RenderTicket) -> Result<Vec<RenderedPage>> {
        self.engine.page().validate()?;
        tracing::info!("Rendering {} page(s) for {:?}", plan.total_pages, plan.subject);
        let mut pages = Vec::with_capacity(plan.pages.len());
        for index in 0..plan.pages.len() {
            pages.push(self.render_page(plan, index, ticket).await?);
        }
        Ok(pages)
    }

    /// Render page `index` (0-based) of `plan` onto a fresh surface
    pub async fn render_page(
        &mut self,
        plan: &ExamPlan,
        index: usize,
        ticket: &RenderTicket,
    ) -> Result<RenderedPage> {
        let Some(content) = plan.pages.get(index) else {
            return Err(crate::LayoutError::PageOutOfRange {
                index,
                total: plan.pages.len(),
            });
        };
        let page = self.engine.page().clone();
        page.validate()?;
        let style = self.style.fatigued(index, self.engine.settings().fatigue_step);

        let mut surface = PageSurface::new(page.width, page.height)?;
        self.engine.draw_paper(&mut surface);

        let header_style = HandwritingStyle {
            size: style.size * HEADER_SCALE,
            color: Color::HEADER_GRAY,
            ..style.clone()
        };
        self.engine.render_text(
            &mut surface,
            &plan.subject.to_uppercase(),
            &header_style,
            page.margin_left,
            page.margin_top - HEADER_RAISE,
        )?;

        let end_y = self
            .engine
            .render_rich_text(
                &mut surface,
                &content.content,
                &style,
                page.margin_left + 20.0,
                page.margin_top,
                ticket,
            )
            .await?;

        if content.has_diagram {
            let kind = content.diagram_type.unwrap_or(DiagramKind::Freehand);
            let bounds = place_diagram(&page, end_y, DIAGRAM_SIZE);
            let overlay = self.diagrams.sketch(kind, bounds, self.engine.rng_mut());
            self.engine.paint_items(&mut surface, overlay);
        }

        apply_ink_flow(&mut surface, self.engine.rng_mut());
        ticket.ensure_current()?;

        tracing::debug!(
            "Rendered page {} with {} ink items",
            content.page_number,
            surface.items().len()
        );
        Ok(RenderedPage {
            page_number: content.page_number,
            surface,
        })
    }
}

/// Vary ink pressure: lighten every dark pixel by its own random amount.
///
/// Runs over the finished raster, so the paper's dark rules are touched too.
/// The display list keeps the pen colors.
pub fn apply_ink_flow(surface: &mut PageSurface, rng: &mut dyn RandomSource) {
    for pixel in surface.pixels_mut().pixels_mut() {
        if pixel.0[0] >= INK_THRESHOLD {
            continue;
        }
        let amount = rng.up_to(INK_FLOW) as u8;
        for channel in pixel.0.iter_mut().take(3) {
            *channel = channel.saturating_add(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{plan_pages, LayoutError, MonospaceMetrics, RenderSession};
    use math::EstimatingTypesetter;
    use render_model::{ConstantRandom, RenderItem};
    use style_model::{EngineSettings, PageConfig, PaperType};

    fn renderer() -> PageRenderer<EstimatingTypesetter> {
        let engine = HandwritingEngine::with_page(PageConfig::a4())
            .with_random(ConstantRandom(0.5))
            .with_metrics(Arc::new(MonospaceMetrics::new(0.5)));
        PageRenderer::new(engine, HandwritingStyle::neat())
    }

    #[tokio::test]
    async fn test_header_and_content_positions() {
        let plan = plan_pages("hello", "physics", false, None);
        let pages = renderer().render_plan(&plan, &RenderTicket::detached()).await.unwrap();
        assert_eq!(pages.len(), 1);

        let glyphs: Vec<_> = pages[0].surface.glyphs().collect();
        let header: String = glyphs.iter().take(7).map(|g| g.ch).collect();
        assert_eq!(header, "PHYSICS");
        assert_eq!(glyphs[0].origin().x, 80.0);
        assert_eq!(glyphs[0].origin().y, 60.0);
        assert_eq!(glyphs[0].paint.font_size, 24.0 * 0.8);

        let h = glyphs[7];
        assert_eq!(h.ch, 'h');
        assert_eq!(h.origin().x, 100.0);
        assert_eq!(h.origin().y, 100.0);
    }

    #[test]
    fn test_ink_flow_lightens_dark_pixels() {
        let mut surface = PageSurface::new(2, 1).unwrap();
        surface.fill(Color::WHITE);
        surface.pixels_mut().get_pixel_mut(0, 0).0 = [30, 40, 80, 255];

        // ConstantRandom(0.5) lightens by 10
        apply_ink_flow(&mut surface, &mut ConstantRandom(0.5));
        assert_eq!(surface.pixels().get_pixel(0, 0).0, [40, 50, 90, 255]);
        assert_eq!(surface.pixels().get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[tokio::test]
    async fn test_ink_flow_keeps_display_list_colors() {
        let plan = plan_pages("ink", "art", false, None);
        let pages = renderer().render_plan(&plan, &RenderTicket::detached()).await.unwrap();
        let body = pages[0].surface.glyphs().find(|g| g.ch == 'i').unwrap();
        assert_eq!(body.paint.fill, HandwritingStyle::neat().color);
    }

    #[tokio::test]
    async fn test_pages_carry_ink_pixels() {
        let plan = plan_pages("Step 1: x = 2\n- so x^2 = 4", "maths", true, Some(DiagramKind::Graph));
        let mut plain = PageRenderer::new(
            HandwritingEngine::with_page(PageConfig::a4().with_paper(PaperType::Plain))
                .with_random(ConstantRandom(0.5))
                .with_settings(EngineSettings {
                    paper_noise: 0.0,
                    ..EngineSettings::default()
                }),
            HandwritingStyle::neat(),
        );
        let pages = plain.render_plan(&plan, &RenderTicket::detached()).await.unwrap();

        // Paper and margin rule are light; only ink is this dark
        let inked = pages[0].surface.pixels().pixels().filter(|p| p.0[0] < 150).count();
        // Strokes and the list dot are drawn even on a host with no fonts
        assert!(inked > 100);
        if plain.engine_mut().font().is_some() {
            assert!(inked > 1000);
        }
    }

    #[tokio::test]
    async fn test_invalid_page_rejected() {
        let page = PageConfig {
            margin_left: 5000.0,
            margin_top: -300.0,
            ..PageConfig::a4()
        };
        let mut renderer = PageRenderer::new(
            HandwritingEngine::with_page(page).with_random(ConstantRandom(0.5)),
            HandwritingStyle::neat(),
        );
        let plan = plan_pages("hello", "s", false, None);

        let result = renderer.render_plan(&plan, &RenderTicket::detached()).await;
        assert!(matches!(result, Err(LayoutError::Style(_))));
        let result = renderer.render_page(&plan, 0, &RenderTicket::detached()).await;
        assert!(matches!(result, Err(LayoutError::Style(_))));
    }

    #[tokio::test]
    async fn test_fatigue_grows_per_page() {
        let answer = vec!["w".repeat(700); 3].join("\n");
        let plan = plan_pages(&answer, "s", false, None);
        assert_eq!(plan.total_pages, 3);

        let mut renderer = PageRenderer::new(
            HandwritingEngine::with_page(PageConfig::a4()).with_random(ConstantRandom(0.5)),
            HandwritingStyle {
                slant: 0.0,
                ..HandwritingStyle::neat()
            },
        );
        let pages = renderer.render_plan(&plan, &RenderTicket::detached()).await.unwrap();
        let slant_of = |page: &RenderedPage| {
            let glyph = page.surface.glyphs().find(|g| g.ch == 'w').unwrap();
            glyph.paint.transform.rotation().to_degrees()
        };
        assert!(slant_of(&pages[0]).abs() < 1e-3);
        assert!((slant_of(&pages[2]) - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_diagram_overlay_on_first_page() {
        let plan = plan_pages("a\nb", "eng", true, Some(DiagramKind::Circuit));
        let pages = renderer().render_plan(&plan, &RenderTicket::detached()).await.unwrap();
        let diagram = pages[0].surface.items().iter().find_map(|i| match i {
            RenderItem::Diagram(d) => Some(d),
            _ => None,
        });
        assert_eq!(diagram.map(|d| d.kind.as_str()), Some("circuit"));
    }

    #[tokio::test]
    async fn test_superseded_render_fails() {
        let plan = plan_pages("a", "s", false, None);
        let session = RenderSession::new();
        let ticket = session.begin();
        session.begin();
        let result = renderer().render_plan(&plan, &ticket).await;
        assert!(matches!(result, Err(LayoutError::Cancelled)));
    }

    #[tokio::test]
    async fn test_page_out_of_range() {
        let plan = plan_pages("a", "s", false, None);
        let result = renderer().render_page(&plan, 3, &RenderTicket::detached()).await;
        assert!(matches!(result, Err(LayoutError::PageOutOfRange { index: 3, total: 1 })));
    }
}
