//! Integration tests for structural outline extraction.

use sectrank::error::Result;
use sectrank::extract::{Bookmark, SpanSource};
use sectrank::model::{BoundingBox, HeadingLevel, TextSpan};
use sectrank::outline::{
    detect_body_style, sectionize, BlockReconstructor, HeadingClassifier, HierarchyAssigner,
    OutlineExtractor,
};
use sectrank::OutlineConfig;

/// Synthetic span source built from in-memory pages.
struct SyntheticSource {
    pages: Vec<Vec<TextSpan>>,
    title: Option<String>,
}

impl SyntheticSource {
    fn new(pages: Vec<Vec<TextSpan>>) -> Self {
        Self { pages, title: None }
    }
}

impl SpanSource for SyntheticSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_spans(&self, page: u32) -> Result<Vec<TextSpan>> {
        Ok(self.pages[(page - 1) as usize].clone())
    }

    fn page_height(&self, _page: u32) -> f32 {
        792.0
    }

    fn metadata_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        Vec::new()
    }
}

fn span(text: &str, font: &str, size: f32, page: u32, y: f32) -> TextSpan {
    let width = text.chars().count() as f32 * size * 0.5;
    TextSpan::new(
        text,
        font,
        size,
        page,
        BoundingBox::new(72.0, y - size, 72.0 + width, y),
    )
}

fn body(text: &str, page: u32, y: f32) -> TextSpan {
    span(text, "Times-Roman", 11.0, page, y)
}

fn heading(text: &str, size: f32, page: u32, y: f32) -> TextSpan {
    span(text, "Helvetica-Bold", size, page, y)
}

/// A small report: title, three headings, paragraphs under each.
fn report_pages() -> Vec<Vec<TextSpan>> {
    vec![
        vec![
            heading("Regional Flood Study", 24.0, 1, 740.0),
            heading("Introduction", 16.0, 1, 680.0),
            body("This report surveys flood events across the region.", 1, 660.0),
            body("It was commissioned after the spring floods of last year.", 1, 646.0),
            heading("Methodology", 16.0, 1, 600.0),
            body("Rainfall and river gauge data were collected monthly.", 1, 580.0),
        ],
        vec![
            heading("Results", 16.0, 2, 740.0),
            body("Mitigation spending reduced downstream losses materially.", 2, 720.0),
            body("Levee reinforcement proved the most effective measure.", 2, 706.0),
        ],
    ]
}

#[test]
fn test_partition_law_every_block_in_one_section() {
    let config = OutlineConfig::default();
    let source = SyntheticSource::new(report_pages());

    let (outline, sections) = OutlineExtractor::new(&config)
        .document_sections(&source)
        .unwrap();
    assert!(!outline.is_empty());

    let reconstructed = BlockReconstructor::new(&config).reconstruct(&report_pages());
    let partitioned: usize = sections.iter().map(|s| s.blocks.len()).sum();
    assert_eq!(partitioned, reconstructed.len());

    // Contiguous, never overlapping: concatenating section blocks
    // reproduces the block sequence exactly.
    let from_sections: Vec<String> = sections
        .iter()
        .flat_map(|s| s.blocks.iter().map(|b| b.text.clone()))
        .collect();
    let original: Vec<String> = reconstructed.iter().map(|b| b.text.clone()).collect();
    assert_eq!(from_sections, original);
}

#[test]
fn test_outline_levels_and_document_order() {
    let config = OutlineConfig::default();
    let source = SyntheticSource::new(report_pages());

    let (outline, _) = OutlineExtractor::new(&config)
        .document_sections(&source)
        .unwrap();

    assert_eq!(outline.title, "Regional Flood Study");
    let flat = outline.flatten();
    let texts: Vec<&str> = flat.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Introduction", "Methodology", "Results"]);

    // Document-order traversal has strictly increasing position keys.
    let keys: Vec<(u32, i64)> = flat.iter().map(|h| (h.page, -(h.y as i64))).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys.len(), sorted.len());
    assert_eq!(keys, sorted);
}

#[test]
fn test_body_style_word_mass_beats_block_count() {
    let config = OutlineConfig::default();
    // Many short large-font blocks, few long small-font paragraphs.
    let mut page = Vec::new();
    let mut y = 740.0;
    for i in 0..8 {
        page.push(span(&format!("Label {i}"), "Helvetica-Bold", 18.0, 1, y));
        y -= 40.0;
    }
    page.push(body(
        "A genuinely long paragraph that carries far more words than all of the labels combined across the page.",
        1,
        y - 10.0,
    ));

    let blocks = BlockReconstructor::new(&config).reconstruct(&[page]);
    let body_style = detect_body_style(&blocks).unwrap();
    assert_eq!(body_style.family, "Times-Roman");
    assert_eq!(body_style.size(), 11.0);
}

#[test]
fn test_numbering_overrides_font_size() {
    let config = OutlineConfig::default();
    let pages = vec![vec![
        heading("Handbook of Defences", 24.0, 1, 740.0),
        // Parent set SMALLER than its child: numbering must still nest
        // "1.1" one level under "1".
        heading("1 Intro", 14.0, 1, 680.0),
        body("Opening remarks about the programme and its goals.", 1, 660.0),
        heading("1.1 Background", 18.0, 1, 600.0),
        body("Historic flood levels shaped the current design rules.", 1, 580.0),
    ]];
    let source = SyntheticSource::new(pages);

    let (outline, _) = OutlineExtractor::new(&config)
        .document_sections(&source)
        .unwrap();

    let flat = outline.flatten();
    let intro = flat.iter().find(|h| h.text == "1 Intro").unwrap();
    let background = flat.iter().find(|h| h.text == "1.1 Background").unwrap();
    assert_eq!(intro.level, HeadingLevel::H1);
    assert_eq!(background.level, HeadingLevel::H2);

    // And the tree nests the child under its parent.
    let root = outline
        .roots
        .iter()
        .find(|n| n.text == "1 Intro")
        .expect("numbered parent is a root");
    assert!(root.children.iter().any(|c| c.text == "1.1 Background"));
}

#[test]
fn test_running_headers_never_become_headings() {
    let config = OutlineConfig::default();
    let pages: Vec<Vec<TextSpan>> = (1..=4)
        .map(|p| {
            vec![
                heading("Regional Flood Study", 14.0, p, 780.0),
                heading(&format!("Chapter {p}"), 16.0, p, 700.0),
                body("Body content long enough to anchor the body style.", p, 680.0),
            ]
        })
        .collect();
    let source = SyntheticSource {
        pages,
        title: Some("Regional Flood Study".into()),
    };

    let (outline, _) = OutlineExtractor::new(&config)
        .document_sections(&source)
        .unwrap();

    let flattened = outline.flatten();
    let texts: Vec<&str> = flattened.iter().map(|h| h.text.as_str()).collect();
    assert!(texts.iter().all(|t| *t != "Regional Flood Study"));
    assert_eq!(texts.len(), 4, "the four chapter headings survive");
}

#[test]
fn test_classifier_and_assigner_compose() {
    let config = OutlineConfig::default();
    let blocks = BlockReconstructor::new(&config).reconstruct(&report_pages());
    let body_style = detect_body_style(&blocks).unwrap();

    let candidates = HeadingClassifier::new(body_style, &config).classify(&blocks);
    assert_eq!(candidates.len(), 4, "title plus three headings");

    let outline = HierarchyAssigner::new().assign(&candidates, None);
    assert_eq!(outline.len(), 3);

    let sections = sectionize(&outline, &blocks);
    // Title block becomes the preamble; each heading owns one section.
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[0].level, Some(HeadingLevel::Title));
}

#[test]
fn test_whole_document_fallback_without_styles() {
    let config = OutlineConfig::default();
    // Uniform typography: nothing diverges, no headings.
    let pages = vec![vec![
        body("Everything in this document is set in one face.", 1, 700.0),
        body("So the outline stays empty and one section remains.", 1, 660.0),
    ]];
    let source = SyntheticSource::new(pages);

    let (outline, sections) = OutlineExtractor::new(&config)
        .document_sections(&source)
        .unwrap();

    assert!(outline.is_empty());
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].blocks.len(), 2);
}
