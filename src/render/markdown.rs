//! Markdown rendering of segmentation results.

use crate::model::Section;
use crate::segment::SegmentationResult;

use super::RenderOptions;

/// Convert a result to Markdown: one heading per section.
pub fn to_markdown(result: &SegmentationResult, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(result)
}

/// Markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a segmentation result.
    pub fn render(&self, result: &SegmentationResult) -> String {
        let mut output = String::new();

        if self.options.include_frontmatter {
            let frontmatter = result.metadata.to_yaml_frontmatter();
            output.push_str(frontmatter.strip_suffix("---\n").unwrap_or(&frontmatter));
            output.push_str(&format!("strategy: {}\n---\n\n", result.strategy));
        }

        for section in &result.sections {
            if self.options.extractable_only && !section.category.is_extractable() {
                continue;
            }
            self.render_section(&mut output, section);
        }

        output.trim().to_string()
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        let title = section.title.trim();
        output.push_str(&"#".repeat(self.options.heading_level as usize));
        output.push(' ');
        output.push_str(if title.is_empty() { "(untitled)" } else { title });
        output.push_str("\n\n");

        if self.options.show_category {
            output.push_str(&format!("*Category: {}*\n\n", section.category));
        }

        output.push_str(&section.text);
        output.push_str("\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::PageAnnotations;
    use crate::model::{Category, Metadata};
    use crate::segment::StrategyKind;

    fn result() -> SegmentationResult {
        let mut metadata = Metadata::with_version("1.7");
        metadata.title = Some("Pliego".into());
        metadata.page_count = 2;
        SegmentationResult {
            sections: vec![
                Section::new("INTRODUCTION", Category::General, "Convocatoria publica"),
                Section::new(
                    "ANEXO FINANCIERO",
                    Category::Financiero,
                    "[TABLE DETECTED]:\n| Indicador | Valor |\n| --- | --- |\n| Liquidez | 1.2 |",
                ),
            ],
            strategy: StrategyKind::Heuristic,
            metadata,
            page_count: 2,
            degraded_pages: Vec::new(),
            annotations: PageAnnotations::new(),
        }
    }

    #[test]
    fn test_sections_as_headings() {
        let md = to_markdown(&result(), &RenderOptions::default());
        assert!(md.starts_with("## INTRODUCTION\n\n*Category: GENERAL*\n\nConvocatoria publica"));
        assert!(md.contains("## ANEXO FINANCIERO"));
        assert!(md.contains("| Liquidez | 1.2 |"));
    }

    #[test]
    fn test_frontmatter_and_filter() {
        let options = RenderOptions::new()
            .with_frontmatter(true)
            .with_category(false)
            .extractable_only();
        let md = to_markdown(&result(), &options);
        assert!(md.starts_with("---\ntitle: \"Pliego\""));
        assert!(md.contains("pages: 2\nstrategy: heuristic\n---\n\n## ANEXO FINANCIERO"));
        assert!(!md.contains("INTRODUCTION"));
        assert!(!md.contains("*Category"));
    }
}
