//! Page access for the segmenters.
//!
//! Segmenters read documents only through [`PageSource`], so the same code
//! runs over a lopdf-backed [`PdfParser`](crate::parser::PdfParser) that lays
//! pages out on demand and over an in-memory [`Document`].

use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Outline, Page};

/// A paginated document the segmenters can read.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Flattened outline in document order; empty when the document has none.
    fn outline(&self) -> Outline;

    /// Document metadata.
    fn metadata(&self) -> Metadata;

    /// Lay out page `number` (1-indexed).
    ///
    /// A page that exists but cannot be read fails with [`Error::Page`].
    fn load_page(&self, number: u32) -> Result<Page>;
}

impl PageSource for Document {
    fn page_count(&self) -> u32 {
        Document::page_count(self)
    }

    fn outline(&self) -> Outline {
        self.outline.clone()
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = self.metadata.clone();
        metadata.page_count = Document::page_count(self);
        metadata
    }

    fn load_page(&self, number: u32) -> Result<Page> {
        self.get_page(number)
            .cloned()
            .ok_or(Error::PageOutOfRange(number, Document::page_count(self)))
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn outline(&self) -> Outline {
        (**self).outline()
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }

    fn load_page(&self, number: u32) -> Result<Page> {
        (**self).load_page(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutlineEntry;

    #[test]
    fn test_document_source() {
        let mut doc = Document::new();
        doc.add_page(Page::letter(1));
        doc.add_page(Page::letter(2));
        doc.outline.push(OutlineEntry::new(1, "ANEXO", 2));

        let source: &dyn PageSource = &doc;
        assert_eq!(source.page_count(), 2);
        assert_eq!(source.metadata().page_count, 2);
        assert_eq!(source.outline().len(), 1);
        assert_eq!(source.load_page(2).map(|p| p.number).ok(), Some(2));
        assert!(matches!(
            source.load_page(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }
}
