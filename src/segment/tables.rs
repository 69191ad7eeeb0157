//! Table serialization and containment.
//!
//! Tables are emitted once, as marked Markdown, ahead of the page's plain
//! text. Blocks that lie inside a table rectangle are then skipped so no
//! table text reaches a section twice.

use crate::model::{Page, Rect, TableRegion, TextBlock};

/// Marker line that introduces every serialized table.
pub const TABLE_MARKER: &str = "[TABLE DETECTED]";

/// Serialize every table on `page`.
///
/// Returns the concatenated marked Markdown and the rectangles of the
/// tables that produced it. A page without tables yields an empty string
/// and an empty list.
pub fn extract_tables(page: &Page) -> (String, Vec<Rect>) {
    let regions = table_regions(page);
    let mut text = String::new();
    let mut rects = Vec::with_capacity(regions.len());

    for region in regions {
        text.push_str(&format!("\n\n{}:\n{}\n\n", TABLE_MARKER, region.markdown));
        rects.push(region.bbox);
    }

    (text, rects)
}

/// Tables on `page` that serialize to a non-empty Markdown body.
pub fn table_regions(page: &Page) -> Vec<TableRegion> {
    page.tables
        .iter()
        .filter_map(|table| {
            let markdown = table.to_markdown();
            let markdown = markdown.trim_end();
            if markdown.is_empty() {
                return None;
            }
            log::debug!(
                "page {}: table {}x{} at ({:.1}, {:.1})",
                page.number,
                table.row_count(),
                table.column_count(),
                table.bbox.x0,
                table.bbox.y0
            );
            Some(TableRegion {
                bbox: table.bbox,
                markdown: markdown.to_string(),
            })
        })
        .collect()
}

/// Whether `rect` lies inside any of `tables` on all four edges.
pub fn is_inside_table(rect: &Rect, tables: &[Rect]) -> bool {
    tables.iter().any(|table| table.contains(rect))
}

/// Blocks of `page` that are not covered by any of `tables`, in reading order.
pub fn free_blocks<'a>(page: &'a Page, tables: &'a [Rect]) -> impl Iterator<Item = &'a TextBlock> {
    page.blocks
        .iter()
        .filter(move |block| !is_inside_table(&block.bbox, tables))
}
