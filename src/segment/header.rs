//! Typographic heading detection.
//!
//! A span is a heading when its text looks numbered and is emphasized, when
//! it is both large and bold, or when it is all upper case and names one of
//! the usual tender document parts.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::TextSpan;
use crate::text;

/// Thresholds and word lists used by [`HeaderClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRules {
    /// Shortest heading, in characters after stripping
    pub min_chars: usize,
    /// Longest heading, in characters after stripping
    pub max_chars: usize,
    /// A span is large when its size exceeds the page baseline by this factor
    pub size_factor: f32,
    /// Case-insensitive font-name fragments that mark a bold face
    pub bold_markers: Vec<String>,
    /// Pattern anchored at the start of the text for numbered headings
    pub numbering_pattern: String,
    /// Folded keywords that mark an upper-case line as a heading
    pub keywords: Vec<String>,
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 300,
            size_factor: 1.10,
            bold_markers: vec!["bold".to_string(), "black".to_string()],
            numbering_pattern: r"^\d+(\.\d+)*".to_string(),
            keywords: [
                "ANEXO",
                "CAPITULO",
                "FICHA",
                "PRESUPUESTO",
                "EXPERIENCIA",
                "HABILITANTE",
                "JURIDIC",
                "FINANCIER",
                "ESPECIFICACION",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

impl HeaderRules {
    /// Create the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size factor over the page baseline.
    pub fn with_size_factor(mut self, factor: f32) -> Self {
        self.size_factor = factor;
        self
    }

    /// Replace the keyword list. Keywords are folded before use.
    pub fn with_keywords<S: AsRef<str>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(|k| text::fold(k.as_ref())).collect();
        self
    }

    /// Replace the numbering pattern.
    pub fn with_numbering_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.numbering_pattern = pattern.into();
        self
    }
}

/// The individual signals behind a heading decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeaderSignals {
    /// Stripped length is within the allowed range
    pub length_ok: bool,
    /// Font size exceeds the page baseline by the configured factor
    pub is_large: bool,
    /// Font name marks a bold face
    pub is_bold: bool,
    /// At least one cased letter and no lower-case letter
    pub is_upper: bool,
    /// Text starts with section numbering
    pub has_numbering: bool,
    /// Folded text contains a heading keyword
    pub has_keyword: bool,
}

impl HeaderSignals {
    /// Combine the signals into the heading decision.
    pub fn is_header(&self) -> bool {
        self.length_ok
            && ((self.has_numbering && (self.is_bold || self.is_upper))
                || (self.is_large && self.is_bold)
                || (self.is_upper && self.has_keyword))
    }
}

/// Decides whether a text span is a section heading.
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    rules: HeaderRules,
    numbering: Regex,
    bold_markers: Vec<String>,
    keywords: Vec<String>,
}

impl HeaderClassifier {
    /// Build a classifier, compiling the numbering pattern.
    pub fn new(rules: HeaderRules) -> Result<Self> {
        let numbering = Regex::new(&rules.numbering_pattern).map_err(|e| {
            Error::Config(format!(
                "numbering pattern {:?}: {}",
                rules.numbering_pattern, e
            ))
        })?;
        let bold_markers = rules.bold_markers.iter().map(|m| m.to_lowercase()).collect();
        let keywords = rules.keywords.iter().map(|k| text::fold(k)).collect();

        Ok(Self {
            rules,
            numbering,
            bold_markers,
            keywords,
        })
    }

    /// The rules this classifier was built from.
    pub fn rules(&self) -> &HeaderRules {
        &self.rules
    }

    /// Compute every signal for a span of text.
    pub fn signals(&self, text: &str, font_size: f32, font_name: &str, baseline: f32) -> HeaderSignals {
        let text = text.trim();
        let len = text.chars().count();
        let font_name = font_name.to_lowercase();

        HeaderSignals {
            length_ok: len >= self.rules.min_chars && len <= self.rules.max_chars,
            is_large: font_size > baseline * self.rules.size_factor,
            is_bold: self.bold_markers.iter().any(|m| font_name.contains(m.as_str())),
            is_upper: text::is_all_upper(text),
            has_numbering: self.numbering.is_match(text),
            has_keyword: {
                let folded = text::fold(text);
                self.keywords.iter().any(|k| folded.contains(k.as_str()))
            },
        }
    }

    /// Whether `span` is a heading on a page with the given baseline size.
    pub fn is_header(&self, span: &TextSpan, baseline: f32) -> bool {
        self.signals(&span.text, span.font_size, &span.font_name, baseline)
            .is_header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeaderClassifier {
        HeaderClassifier::new(HeaderRules::default()).unwrap()
    }

    fn span(text: &str, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text, 72.0, 700.0, size, font)
    }

    #[test]
    fn test_numbered_bold_heading() {
        let c = classifier();
        assert!(c.is_header(&span("3.2 Alcance del objeto", 11.0, "Arial-BoldMT"), 11.0));
    }

    #[test]
    fn test_numbered_upper_heading() {
        let c = classifier();
        assert!(c.is_header(&span("1. OBJETO", 11.0, "Arial"), 11.0));
    }

    #[test]
    fn test_numbered_plain_text_is_not_heading() {
        let c = classifier();
        assert!(!c.is_header(&span("2024 fue un buen año", 11.0, "Arial"), 11.0));
    }

    #[test]
    fn test_large_bold_heading() {
        let c = classifier();
        assert!(c.is_header(&span("Condiciones generales", 14.0, "Helvetica-Bold"), 10.0));
        // Bold alone is not enough
        assert!(!c.is_header(&span("Condiciones generales", 10.0, "Helvetica-Bold"), 10.0));
        // Exactly at the threshold is not large
        assert!(!c.is_header(&span("Condiciones generales", 11.0, "Helvetica-Bold"), 10.0));
    }

    #[test]
    fn test_upper_keyword_heading_with_accents() {
        let c = classifier();
        assert!(c.is_header(&span("CAPÍTULO II", 10.0, "Times"), 10.0));
        assert!(c.is_header(&span("ANEXO 3 FINANCIERO", 10.0, "Times"), 10.0));
        // Upper case without a keyword
        assert!(!c.is_header(&span("NOTA IMPORTANTE", 10.0, "Times"), 10.0));
    }

    #[test]
    fn test_black_font_counts_as_bold() {
        let c = classifier();
        assert!(c.is_header(&span("Resumen", 16.0, "Arial-Black"), 10.0));
    }

    #[test]
    fn test_length_bounds() {
        let c = classifier();
        assert!(!c.is_header(&span("1.", 20.0, "Arial-Bold"), 10.0));
        assert!(!c.is_header(&span("  A1  ", 20.0, "Arial-Bold"), 10.0));
        let long = format!("1. {}", "A".repeat(400));
        assert!(!c.is_header(&span(&long, 20.0, "Arial-Bold"), 10.0));
    }

    #[test]
    fn test_signals_breakdown() {
        let c = classifier();
        let signals = c.signals("ANEXO TÉCNICO", 12.0, "Verdana", 10.0);
        assert!(signals.is_large);
        assert!(!signals.is_bold);
        assert!(signals.is_upper);
        assert!(signals.has_keyword);
        assert!(!signals.has_numbering);
        assert!(signals.is_header());
    }

    #[test]
    fn test_custom_keywords_are_folded() {
        let rules = HeaderRules::new().with_keywords(["Capítulo", "pliego"]);
        assert_eq!(rules.keywords, vec!["CAPITULO", "PLIEGO"]);

        let c = HeaderClassifier::new(rules).unwrap();
        assert!(c.is_header(&span("CAPITULO II", 10.0, "Times"), 10.0));
        assert!(c.is_header(&span("PLIEGO DE CONDICIONES", 10.0, "Times"), 10.0));
        // The default keywords were replaced
        assert!(!c.is_header(&span("ANEXO 3", 10.0, "Times"), 10.0));
    }

    #[test]
    fn test_size_factor_moves_the_large_threshold() {
        let heading = span("Condiciones generales", 14.0, "Helvetica-Bold");
        assert!(classifier().is_header(&heading, 10.0));

        let strict = HeaderClassifier::new(HeaderRules::new().with_size_factor(1.5)).unwrap();
        assert!(!strict.is_header(&heading, 10.0));
        assert!(strict.is_header(&span("Condiciones generales", 16.0, "Helvetica-Bold"), 10.0));
    }

    #[test]
    fn test_length_is_judged_on_trimmed_text() {
        let c = classifier();
        let signals = c.signals("   1.   ", 20.0, "Arial-Bold", 10.0);
        assert!(!signals.length_ok);
        assert!(!c.is_header(&span("   1.   ", 20.0, "Arial-Bold"), 10.0));
    }

    #[test]
    fn test_invalid_numbering_pattern() {
        let rules = HeaderRules::default().with_numbering_pattern("(unclosed");
        assert!(matches!(HeaderClassifier::new(rules), Err(Error::Config(_))));
    }
}
