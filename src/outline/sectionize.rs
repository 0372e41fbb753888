//! Section partitioning at finest granularity.

use crate::model::{DocumentOutline, Heading, HeadingLevel, LogicalBlock, Section};

/// Partition a document's blocks into ordered sections.
///
/// Every heading of any level starts a section; a section owns all blocks
/// from its heading up to the next heading. Blocks preceding the first
/// heading form a preamble section carrying the document title. The result
/// partitions the blocks exactly once, contiguous and document-ordered;
/// with no outline the whole document is one section.
pub fn sectionize(outline: &DocumentOutline, blocks: &[LogicalBlock]) -> Vec<Section> {
    let headings = outline.flatten();
    if headings.is_empty() {
        return vec![whole_document_section(outline, blocks)];
    }

    let mut preamble: Vec<LogicalBlock> = Vec::new();
    let mut open: Vec<(Heading, Vec<LogicalBlock>)> = Vec::new();
    let mut next = 0usize;

    for block in blocks {
        let key = position_key(block.page, block.top());
        while next < headings.len() && position_key(headings[next].page, headings[next].y) <= key {
            open.push((headings[next].clone(), Vec::new()));
            next += 1;
        }
        match open.last_mut() {
            Some((_, section_blocks)) => section_blocks.push(block.clone()),
            None => preamble.push(block.clone()),
        }
    }
    // Trailing headings with no blocks after them still get (empty)
    // sections; they rank at the bottom rather than erroring.
    while next < headings.len() {
        open.push((headings[next].clone(), Vec::new()));
        next += 1;
    }

    let mut sections = Vec::new();
    if !preamble.is_empty() {
        sections.push(preamble_section(outline, preamble));
    }
    for (heading, section_blocks) in open {
        sections.push(heading_section(heading, section_blocks));
    }
    for (order, section) in sections.iter_mut().enumerate() {
        section.order = order;
    }
    sections
}

fn position_key(page: u32, y: f32) -> (u32, i64) {
    (page, -((y * 100.0) as i64))
}

fn join_blocks(blocks: &[LogicalBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn whole_document_section(outline: &DocumentOutline, blocks: &[LogicalBlock]) -> Section {
    let title = (!outline.title.is_empty()).then(|| outline.title.clone());
    Section {
        document: String::new(),
        level: title.as_ref().map(|_| HeadingLevel::Title),
        title,
        page: blocks.first().map(|b| b.page).unwrap_or(1),
        text: join_blocks(blocks),
        blocks: blocks.to_vec(),
        order: 0,
    }
}

fn preamble_section(outline: &DocumentOutline, blocks: Vec<LogicalBlock>) -> Section {
    let title = (!outline.title.is_empty()).then(|| outline.title.clone());
    Section {
        document: String::new(),
        level: title.as_ref().map(|_| HeadingLevel::Title),
        title,
        page: blocks.first().map(|b| b.page).unwrap_or(1),
        text: join_blocks(&blocks),
        blocks,
        order: 0,
    }
}

fn heading_section(heading: Heading, blocks: Vec<LogicalBlock>) -> Section {
    let body = join_blocks(&blocks);
    // A heuristic heading owns its own block, so the body already starts
    // with the heading line; a bookmark-derived heading does not.
    let first_matches = blocks
        .first()
        .map(|b| normalized(&b.text) == normalized(&heading.text))
        .unwrap_or(false);
    let text = if first_matches {
        body
    } else if body.is_empty() {
        heading.text.clone()
    } else {
        format!("{}\n{}", heading.text, body)
    };

    Section {
        document: String::new(),
        title: Some(heading.text),
        level: Some(heading.level),
        page: heading.page,
        blocks,
        text,
        order: 0,
    }
}

fn normalized(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
