//! PDF document parser using lopdf.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Outline, OutlineEntry, Page};
use crate::source::PageSource;

use super::layout::{self, LayoutAnalyzer};
use super::options::ParseOptions;
use super::table_detector::TableDetector;

/// Name trees deeper than this are treated as malformed.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// PDF document parser.
///
/// Opening a document only loads the object graph; pages are laid out one
/// at a time by [`PageSource::load_page`].
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
    pages: BTreeMap<u32, ObjectId>,
    detector: TableDetector,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    ///
    /// Any failure is reported as [`Error::Open`] carrying the path.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        let load = || -> Result<Self> {
            detect::read_header(path)?;
            let doc = LopdfDocument::load(path)?;
            Ok(Self::new(doc, options))
        };

        load().map_err(|e| Error::open(path, e))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect::sniff(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::new(doc, options))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn new(doc: LopdfDocument, options: ParseOptions) -> Self {
        // lopdf 0.34 cannot decrypt with a user password
        if options.password.is_some() && doc.is_encrypted() {
            log::warn!("Password was provided but decryption is not supported; reading as-is");
        }

        let pages = doc.get_pages();
        let detector = TableDetector::with_config(options.table_detector.clone());
        log::debug!("Opened PDF {} with {} pages", doc.version, pages.len());

        Self {
            doc,
            options,
            pages,
            detector,
        }
    }

    /// Lay out every page into an in-memory document.
    ///
    /// Fails on the first page that cannot be read.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        document.metadata = self.metadata();
        document.outline = self.outline();

        for &page_num in self.pages.keys() {
            document.add_page(self.load_page(page_num)?);
        }

        Ok(document)
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Extract document metadata.
    fn extract_metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.resolve_dict(info));

        if let Some(info_dict) = info {
            metadata.title = self.string_value(info_dict, b"Title");
            metadata.author = self.string_value(info_dict, b"Author");
            metadata.subject = self.string_value(info_dict, b"Subject");
            metadata.keywords = self.string_value(info_dict, b"Keywords");
            metadata.creator = self.string_value(info_dict, b"Creator");
            metadata.producer = self.string_value(info_dict, b"Producer");
            metadata.created = self
                .string_value(info_dict, b"CreationDate")
                .and_then(|d| parse_pdf_date(&d));
            metadata.modified = self
                .string_value(info_dict, b"ModDate")
                .and_then(|d| parse_pdf_date(&d));
        }

        metadata.page_count = self.pages.len() as u32;
        metadata.encrypted = self.doc.is_encrypted();
        metadata
    }

    /// Lay out a single page and run table detection over it.
    fn layout_page(&self, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let (width, height) = self.page_dimensions(page_id);
        let mut page = Page::new(page_num, width, height);

        let spans = LayoutAnalyzer::new(&self.doc).extract_page_spans(page_id)?;
        let (tables, remaining) = if self.options.detect_tables {
            self.detector.detect(spans)
        } else {
            (Vec::new(), spans)
        };

        for block in layout::group_into_blocks(remaining) {
            if !block.is_empty() {
                page.add_block(block);
            }
        }

        // Table text stays on the page as row blocks inside the table's
        // box so it still counts toward the page's typography.
        for detected in &tables {
            log::debug!(
                "Page {}: table with {} rows at {:?}",
                page_num,
                detected.rows.len(),
                detected.bbox
            );
            for block in detected.row_blocks() {
                page.add_block(block);
            }
            page.add_table(self.detector.to_table_model(detected));
        }

        Ok(page)
    }

    /// Page size from the (possibly inherited) MediaBox; Letter by default.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        let mut current = self.doc.get_dictionary(page_id).ok();
        let mut visited = HashSet::new();

        while let Some(dict) = current {
            if let Some(media_box) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|mb| self.resolve(mb))
                .and_then(|mb| mb.as_array().ok())
            {
                if media_box.len() >= 4 {
                    let coords: Vec<f32> = media_box.iter().filter_map(number).collect();
                    if coords.len() >= 4 {
                        return ((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs());
                    }
                }
            }

            current = match dict.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent) if visited.insert(parent) => self.doc.get_dictionary(parent).ok(),
                _ => None,
            };
        }

        (612.0, 792.0)
    }

    /// Extract the outline flattened depth-first, levels starting at 1.
    fn extract_outline(&self) -> Outline {
        let mut outline = Outline::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.resolve_dict(outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            let page_numbers: HashMap<ObjectId, u32> =
                self.pages.iter().map(|(num, id)| (*id, *num)).collect();
            let mut visited = HashSet::new();
            self.collect_outline_items(first, 1, &page_numbers, &mut visited, &mut outline);
        }

        outline
    }

    /// Walk an outline level: each item, then its children, then its next sibling.
    fn collect_outline_items(
        &self,
        first: ObjectId,
        level: u8,
        page_numbers: &HashMap<ObjectId, u32>,
        visited: &mut HashSet<ObjectId>,
        outline: &mut Outline,
    ) {
        let mut current = Some(first);

        while let Some(item_ref) = current {
            if !visited.insert(item_ref) {
                log::warn!("Outline cycle at object {:?}", item_ref);
                break;
            }
            let Ok(item_dict) = self.doc.get_dictionary(item_ref) else {
                break;
            };

            let title = self.string_value(item_dict, b"Title").unwrap_or_default();
            match self.outline_destination(item_dict, page_numbers) {
                Some(page) => outline.push(OutlineEntry::new(level, title, page)),
                None => log::debug!("Dropping outline entry without a page: {:?}", title),
            }

            if let Ok(child) = item_dict.get(b"First").and_then(Object::as_reference) {
                self.collect_outline_items(
                    child,
                    level.saturating_add(1),
                    page_numbers,
                    visited,
                    outline,
                );
            }

            current = item_dict.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Destination page of an outline item, from `/Dest` or a GoTo `/A` action.
    fn outline_destination(
        &self,
        item_dict: &Dictionary,
        page_numbers: &HashMap<ObjectId, u32>,
    ) -> Option<u32> {
        if let Ok(dest) = item_dict.get(b"Dest") {
            return self.resolve_destination(dest, page_numbers);
        }

        let action = item_dict.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
        let dest = action.get(b"D").ok()?;
        self.resolve_destination(dest, page_numbers)
    }

    /// Resolve an explicit or named destination to a page number.
    fn resolve_destination(
        &self,
        dest: &Object,
        page_numbers: &HashMap<ObjectId, u32>,
    ) -> Option<u32> {
        match self.resolve(dest)? {
            Object::Name(name) | Object::String(name, _) => {
                let target = self.lookup_named_destination(name)?;
                self.explicit_destination(target, page_numbers)
            }
            explicit => self.explicit_destination(explicit, page_numbers),
        }
    }

    /// Page of an explicit destination array, or of a `/D` entry wrapping one.
    fn explicit_destination(
        &self,
        dest: &Object,
        page_numbers: &HashMap<ObjectId, u32>,
    ) -> Option<u32> {
        let dest = match self.resolve(dest)? {
            Object::Dictionary(dict) => self.resolve(dict.get(b"D").ok()?)?,
            other => other,
        };

        match dest.as_array().ok()?.first()? {
            Object::Reference(page_ref) => page_numbers.get(page_ref).copied(),
            // Remote-style destinations carry a 0-based page index
            Object::Integer(index) => u32::try_from(*index)
                .ok()
                .map(|i| i + 1)
                .filter(|n| self.pages.contains_key(n)),
            _ => None,
        }
    }

    /// Look a destination name up in the catalog `/Dests` dictionary or the
    /// `/Names /Dests` name tree.
    fn lookup_named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        let from_dests = catalog
            .get(b"Dests")
            .ok()
            .and_then(|d| self.resolve_dict(d))
            .and_then(|dests| dests.get(name).ok());
        if from_dests.is_some() {
            return from_dests;
        }

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|n| self.resolve_dict(n))
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|d| self.resolve_dict(d))?;
        self.lookup_name_tree(tree, name, 0)
    }

    fn lookup_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        name: &[u8],
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Some(names) = node
            .get(b"Names")
            .ok()
            .and_then(|n| self.resolve(n))
            .and_then(|n| n.as_array().ok())
        {
            for pair in names.chunks_exact(2) {
                if let Object::String(key, _) = &pair[0] {
                    if key.as_slice() == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        let kids = node
            .get(b"Kids")
            .ok()
            .and_then(|k| self.resolve(k))
            .and_then(|k| k.as_array().ok())?;
        kids.iter()
            .filter_map(|kid| self.resolve_dict(kid))
            .find_map(|kid| self.lookup_name_tree(kid, name, depth + 1))
    }

    /// Follow a reference to the object it points to.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).and_then(|o| o.as_dict().ok())
    }

    /// Text string value of `key`, following an indirect reference.
    fn string_value(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        dict.get(key)
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(decode_text_string)
    }
}

impl PageSource for PdfParser {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn outline(&self) -> Outline {
        self.extract_outline()
    }

    fn metadata(&self) -> Metadata {
        self.extract_metadata()
    }

    fn load_page(&self, number: u32) -> Result<Page> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))?;

        self.layout_page(number, page_id).map_err(|e| match e {
            Error::Page { .. } => e,
            other => Error::Page {
                page: number,
                reason: other.to_string(),
            },
        })
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or Latin-1).
fn decode_text_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_pdf_date_minimal() {
        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_decode_text_string() {
        let utf16 = Object::String(vec![0xFE, 0xFF, 0x00, 0xC1, 0x00, 0x62], lopdf::StringFormat::Literal);
        assert_eq!(decode_text_string(&utf16).as_deref(), Some("Áb"));

        let latin1 = Object::String(vec![b'J', b'u', b'r', 0xED, b'd'], lopdf::StringFormat::Literal);
        assert_eq!(decode_text_string(&latin1).as_deref(), Some("Juríd"));

        assert!(decode_text_string(&Object::Integer(3)).is_none());
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = PdfParser::from_bytes(b"PK\x03\x04 not a pdf").err();
        assert!(matches!(err, Some(Error::UnknownFormat)));
    }

    #[test]
    fn test_open_missing_file_is_open_error() {
        let err = PdfParser::open("/nonexistent/pliego.pdf").err();
        assert!(matches!(err, Some(Error::Open { .. })));
    }

    #[test]
    fn test_from_reader_sniffs_like_bytes() {
        let err = PdfParser::from_reader(std::io::Cursor::new(b"<html></html>".to_vec())).err();
        assert!(matches!(err, Some(Error::UnknownFormat)));
    }
}

