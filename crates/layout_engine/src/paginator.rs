//! Document Paginator
//!
//! Splits a long answer into page-sized chunks under a character budget. The
//! resulting [`ExamPlan`] is the only description of how text maps to pages;
//! renderers consume it page by page.

use crate::DiagramKind;
use serde::{Deserialize, Serialize};
use style_model::EngineSettings;

/// Content of one planned page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// 1-based page number
    pub page_number: usize,
    /// Paragraphs on this page, newline separated, outer whitespace trimmed
    pub content: String,
    pub has_diagram: bool,
    pub diagram_type: Option<DiagramKind>,
}

/// How an answer is split into pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPlan {
    pub subject: String,
    pub total_pages: usize,
    pub pages: Vec<PageContent>,
}

impl ExamPlan {
    /// The page carrying the diagram, if any
    pub fn diagram_page(&self) -> Option<&PageContent> {
        self.pages.iter().find(|p| p.has_diagram)
    }
}

/// Greedy paragraph packer with a fixed per-page character budget
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    budget: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl Paginator {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.chars_per_page)
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Split `answer` into pages.
    ///
    /// A page is sealed when the next paragraph would push it past the budget
    /// and it already holds visible text, so a single oversized paragraph is
    /// never split. The plan always has at least one page. When a diagram is
    /// requested it is anchored to page 1.
    pub fn plan(
        &self,
        answer: &str,
        subject: &str,
        requires_diagram: bool,
        diagram: Option<DiagramKind>,
    ) -> ExamPlan {
        let mut pages: Vec<PageContent> = Vec::new();
        let mut buffer = String::new();
        let mut chars = 0usize;
        let mut diagram_placed = false;

        let mut seal = |buffer: &str, pages: &mut Vec<PageContent>| {
            let page_number = pages.len() + 1;
            let has_diagram = requires_diagram && !diagram_placed && page_number == 1;
            diagram_placed |= has_diagram;
            pages.push(PageContent {
                page_number,
                content: buffer.trim().to_string(),
                has_diagram,
                diagram_type: if has_diagram { diagram } else { None },
            });
        };

        for paragraph in answer.split('\n') {
            let len = paragraph.chars().count();
            if chars + len > self.budget && !buffer.trim().is_empty() {
                seal(&buffer, &mut pages);
                buffer.clear();
                chars = 0;
            }
            buffer.push_str(paragraph);
            buffer.push('\n');
            chars += len;
        }

        if !buffer.trim().is_empty() || pages.is_empty() {
            seal(&buffer, &mut pages);
        }

        tracing::debug!(
            "Planned {} page(s) for {:?} ({} chars, budget {})",
            pages.len(),
            subject,
            answer.chars().count(),
            self.budget
        );

        ExamPlan {
            subject: subject.to_string(),
            total_pages: pages.len(),
            pages,
        }
    }
}

/// Plan pages with the default 1200-character budget
pub fn plan_pages(
    answer: &str,
    subject: &str,
    requires_diagram: bool,
    diagram: Option<DiagramKind>,
) -> ExamPlan {
    Paginator::default().plan(answer, subject, requires_diagram, diagram)
}
