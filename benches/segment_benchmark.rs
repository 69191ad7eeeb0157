//! Benchmarks for tenderseg segmentation.
//!
//! Run with: cargo bench
//!
//! Documents are built in memory so the numbers measure segmentation and
//! categorization, not PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tenderseg::model::{TextBlock, TextSpan};
use tenderseg::{Document, OutlineEntry, Page, SegmentOptions, Segmenter};

const HEADINGS: [&str; 4] = [
    "CAPACIDAD FINANCIERA",
    "CAPACIDAD JURIDICA",
    "ESPECIFICACIONES TECNICAS",
    "EXPERIENCIA DEL PROPONENTE",
];

/// A synthetic tender: every page opens with a bold heading followed by
/// body lines in the regular font.
fn create_test_document(page_count: u32, with_outline: bool) -> Document {
    let mut doc = Document::new();

    for number in 1..=page_count {
        let mut page = Page::a4(number);
        let heading = format!("{}. {}", number, HEADINGS[(number as usize) % HEADINGS.len()]);
        let mut spans = vec![TextSpan::new(heading.clone(), 72.0, 780.0, 14.0, "Helvetica-Bold")];
        for line in 0..30 {
            spans.push(TextSpan::new(
                format!("Linea {} del numeral {} con indice de liquidez y patrimonio", line, number),
                72.0,
                760.0 - line as f32 * 12.0,
                10.0,
                "Helvetica",
            ));
        }
        page.add_block(TextBlock::from_spans(spans));
        doc.add_page(page);

        if with_outline {
            doc.outline.push(OutlineEntry::new(1, heading, number));
        }
    }

    doc
}

/// Benchmark heading-driven segmentation at various sizes.
fn bench_heuristic(c: &mut Criterion) {
    let segmenter = Segmenter::new(SegmentOptions::default()).unwrap();
    let mut group = c.benchmark_group("heuristic");

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_document(*page_count, false);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| segmenter.segment(black_box(&doc)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark outline-driven segmentation at various sizes.
fn bench_bookmark(c: &mut Criterion) {
    let segmenter = Segmenter::new(SegmentOptions::default()).unwrap();
    let mut group = c.benchmark_group("bookmark");

    for page_count in [10, 50].iter() {
        let doc = create_test_document(*page_count, true);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| segmenter.segment(black_box(&doc)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark keyword categorization on its own.
fn bench_categorize(c: &mut Criterion) {
    let segmenter = Segmenter::new(SegmentOptions::default()).unwrap();
    let body = "El proponente debera acreditar experiencia en contratos similares ".repeat(10);

    c.bench_function("categorize", |b| {
        b.iter(|| segmenter.categorize(black_box("4.2 REQUISITOS HABILITANTES"), black_box(&body)));
    });
}

criterion_group!(benches, bench_heuristic, bench_bookmark, bench_categorize);
criterion_main!(benches);
