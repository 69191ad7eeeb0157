//! Rendering options.

/// Options for rendering a segmentation result as Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Include YAML frontmatter with document metadata
    pub include_frontmatter: bool,

    /// Print each section's category under its heading
    pub show_category: bool,

    /// Render only sections routed to requirement extraction
    pub extractable_only: bool,

    /// Heading level used for section titles (1-6)
    pub heading_level: u8,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the category line.
    pub fn with_category(mut self, show: bool) -> Self {
        self.show_category = show;
        self
    }

    /// Skip GENERAL sections.
    pub fn extractable_only(mut self) -> Self {
        self.extractable_only = true;
        self
    }

    /// Set the heading level of section titles.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            show_category: true,
            extractable_only: false,
            heading_level: 2,
        }
    }
}
