//! Keyword-based section categorization.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::model::{Category, Section};
use crate::text;

/// Characters of the body considered after the title.
pub const DEFAULT_BODY_WINDOW: usize = 200;

/// Ordered keyword table; the first category with a matching keyword wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    /// `(category, keywords)` in priority order
    pub rules: Vec<(Category, Vec<String>)>,
    /// Category assigned when nothing matches
    pub fallback: Category,
    /// Number of body characters inspected after the title
    pub body_window: usize,
}

impl Default for CategoryRules {
    fn default() -> Self {
        default_rules().clone()
    }
}

fn default_rules() -> &'static CategoryRules {
    static RULES: OnceLock<CategoryRules> = OnceLock::new();
    RULES.get_or_init(|| {
        let table: [(Category, &[&str]); 4] = [
            (
                Category::Financiero,
                &["LIQUIDEZ", "PATRIMONIO", "CAPITAL", "ENDEUDAMIENTO"],
            ),
            (
                Category::Juridico,
                &["RUP", "JURIDIC", "CONSTITUCION", "REPRESENTA"],
            ),
            (
                Category::Tecnico,
                &["TECNIC", "ESPECIFICACION", "ALCANCE", "MEMORIA"],
            ),
            (Category::Experiencia, &["EXPERIENCIA", "CONTRATOS"]),
        ];

        CategoryRules {
            rules: table
                .iter()
                .map(|(cat, words)| (*cat, words.iter().map(|w| w.to_string()).collect()))
                .collect(),
            fallback: Category::General,
            body_window: DEFAULT_BODY_WINDOW,
        }
    })
}

impl CategoryRules {
    /// Create the default table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many body characters are inspected.
    pub fn with_body_window(mut self, chars: usize) -> Self {
        self.body_window = chars;
        self
    }

    /// Append a rule after the existing ones.
    pub fn with_rule<S: AsRef<str>>(
        mut self,
        category: Category,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.rules.push((
            category,
            keywords.into_iter().map(|k| text::fold(k.as_ref())).collect(),
        ));
        self
    }
}

/// Assigns a [`Category`] to a section from its title and the start of its body.
#[derive(Debug, Clone)]
pub struct SectionCategorizer {
    rules: Vec<(Category, Vec<String>)>,
    fallback: Category,
    body_window: usize,
}

impl Default for SectionCategorizer {
    fn default() -> Self {
        Self::new(CategoryRules::default())
    }
}

impl SectionCategorizer {
    /// Build a categorizer from a rule table. Keywords are folded once here.
    pub fn new(rules: CategoryRules) -> Self {
        Self {
            rules: rules
                .rules
                .into_iter()
                .map(|(cat, words)| (cat, words.iter().map(|w| text::fold(w)).collect()))
                .collect(),
            fallback: rules.fallback,
            body_window: rules.body_window,
        }
    }

    /// Categorize from `title` plus the first characters of `body`.
    pub fn categorize(&self, title: &str, body: &str) -> Category {
        let window = text::truncate_chars(body, self.body_window);
        let combined = text::fold(&format!("{} {}", title, window));

        self.rules
            .iter()
            .find(|(_, words)| words.iter().any(|w| combined.contains(w.as_str())))
            .map(|(cat, _)| *cat)
            .unwrap_or(self.fallback)
    }
}

/// Number of sections per category, in category order.
pub fn count_by_category(sections: &[Section]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for section in sections {
        *counts.entry(section.category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_indicators() {
        let c = SectionCategorizer::default();
        assert_eq!(
            c.categorize("ANEXO FINANCIERO", "Liquidez >= 1.2; Endeudamiento <= 0.7"),
            Category::Financiero
        );
    }

    #[test]
    fn test_first_match_wins() {
        let c = SectionCategorizer::default();
        // Mentions both legal and technical keywords; legal comes first
        assert_eq!(
            c.categorize("Requisitos", "Certificado RUP vigente y especificaciones tecnicas"),
            Category::Juridico
        );
    }

    #[test]
    fn test_accent_folding() {
        let c = SectionCategorizer::default();
        assert_eq!(c.categorize("Capacidad Jurídica", ""), Category::Juridico);
        assert_eq!(c.categorize("Especificación técnica", ""), Category::Tecnico);
        assert_eq!(c.categorize("Constitución de la sociedad", ""), Category::Juridico);
    }

    #[test]
    fn test_experience() {
        let c = SectionCategorizer::default();
        assert_eq!(
            c.categorize("Experiencia del proponente", "Se acreditara mediante contratos"),
            Category::Experiencia
        );
    }

    #[test]
    fn test_body_window() {
        let c = SectionCategorizer::default();
        let body = format!("{} liquidez", "x".repeat(250));
        assert_eq!(c.categorize("Generalidades", &body), Category::General);

        let wide = SectionCategorizer::new(CategoryRules::default().with_body_window(300));
        assert_eq!(wide.categorize("Generalidades", &body), Category::Financiero);
    }

    #[test]
    fn test_total_and_deterministic() {
        let c = SectionCategorizer::default();
        for (title, body) in [("", ""), ("???", "12345"), ("Cronograma", "fechas")] {
            let first = c.categorize(title, body);
            assert_eq!(first, c.categorize(title, body));
            assert!(Category::ALL.contains(&first));
        }
        assert_eq!(c.categorize("", ""), Category::General);
    }

    #[test]
    fn test_custom_rule() {
        let rules = CategoryRules::default().with_rule(Category::Tecnico, ["cronograma"]);
        let c = SectionCategorizer::new(rules);
        assert_eq!(c.categorize("Cronograma de obra", ""), Category::Tecnico);
    }

    #[test]
    fn test_count_by_category() {
        let sections = vec![
            Section::new("a", Category::Tecnico, "x"),
            Section::new("b", Category::General, "y"),
            Section::new("c", Category::Tecnico, "z"),
        ];
        let counts = count_by_category(&sections);
        assert_eq!(counts.get(&Category::Tecnico), Some(&2));
        assert_eq!(counts.get(&Category::General), Some(&1));
        assert_eq!(counts.get(&Category::Financiero), None);
    }
}
