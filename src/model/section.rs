//! Segmentation output types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A titled, categorized span of extracted text.
///
/// Serializes as `{"title": ..., "category": ..., "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title (outline title or detected heading)
    pub title: String,
    /// Topical category, assigned once
    pub category: Category,
    /// Whitespace-normalized body text, tables inline as marked Markdown
    pub text: String,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, category: Category, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category,
            text: text.into(),
        }
    }
}

/// Coarse topical category of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Financial capacity requirements
    Financiero,
    /// Legal requirements
    Juridico,
    /// Technical specifications and scope
    Tecnico,
    /// Experience requirements
    Experiencia,
    /// Anything else
    #[serde(alias = "OTRO")]
    General,
}

impl Category {
    /// All categories in rule priority order.
    pub const ALL: [Category; 5] = [
        Category::Financiero,
        Category::Juridico,
        Category::Tecnico,
        Category::Experiencia,
        Category::General,
    ];

    /// Upper-case label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Financiero => "FINANCIERO",
            Category::Juridico => "JURIDICO",
            Category::Tecnico => "TECNICO",
            Category::Experiencia => "EXPERIENCIA",
            Category::General => "GENERAL",
        }
    }

    /// Whether sections of this category go to requirement extraction.
    pub fn is_extractable(&self) -> bool {
        !matches!(self, Category::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FINANCIERO" => Ok(Category::Financiero),
            "JURIDICO" => Ok(Category::Juridico),
            "TECNICO" => Ok(Category::Tecnico),
            "EXPERIENCIA" => Ok(Category::Experiencia),
            "GENERAL" | "OTRO" => Ok(Category::General),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}
