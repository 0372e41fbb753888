//! Heading levels and the document outline tree.

use serde::{Deserialize, Serialize};

/// Level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title
    Title,
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
    /// Fourth-level heading; deeper structure collapses here
    H4,
}

impl HeadingLevel {
    /// Nesting depth: Title = 0, H1 = 1, ..., H4 = 4.
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Level for a nesting depth; depths beyond 4 collapse into H4.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 => HeadingLevel::Title,
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            _ => HeadingLevel::H4,
        }
    }

    /// Display label ("Title", "H1", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
        }
    }
}

/// A flattened outline entry with its document position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// Entry level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge of the heading block on its page (PDF y, grows upward)
    pub y: f32,
}

impl Heading {
    /// Document-position sort key: page ascending, then top-of-page first.
    /// PDF y grows upward, so larger y comes earlier on a page.
    fn position_key(&self) -> (u32, i64) {
        (self.page, -((self.y * 100.0) as i64))
    }
}

/// An outline tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Entry level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge on the page
    pub y: f32,
    /// Child headings, in document order
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn from_heading(h: &Heading) -> Self {
        Self {
            level: h.level,
            text: h.text.clone(),
            page: h.page,
            y: h.y,
            children: Vec::new(),
        }
    }
}

/// The structural outline of one document: a title plus a heading tree
/// ordered by document position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title ("" when none could be determined)
    pub title: String,
    /// Top-level outline nodes in document order
    pub roots: Vec<OutlineNode>,
}

impl DocumentOutline {
    /// Build the tree from flat headings. The headings are sorted into
    /// document order first; nesting follows level depth, with a deeper
    /// entry attaching to the most recent shallower one.
    pub fn from_headings(title: impl Into<String>, mut headings: Vec<Heading>) -> Self {
        headings.sort_by_key(|h| h.position_key());

        let mut roots: Vec<OutlineNode> = Vec::new();
        // Stack of (depth, path index) into the tree under construction.
        let mut stack: Vec<(u8, usize)> = Vec::new();

        for heading in &headings {
            let depth = heading.level.depth().max(1);
            while let Some(&(d, _)) = stack.last() {
                if d >= depth {
                    stack.pop();
                } else {
                    break;
                }
            }

            let node = OutlineNode::from_heading(heading);
            if stack.is_empty() {
                roots.push(node);
                stack.push((depth, roots.len() - 1));
            } else {
                let parent = Self::node_at(&mut roots, &stack);
                parent.children.push(node);
                let idx = parent.children.len() - 1;
                stack.push((depth, idx));
            }
        }

        Self {
            title: title.into(),
            roots,
        }
    }

    fn node_at<'a>(roots: &'a mut Vec<OutlineNode>, stack: &[(u8, usize)]) -> &'a mut OutlineNode {
        let mut node = &mut roots[stack[0].1];
        for &(_, idx) in &stack[1..] {
            node = &mut node.children[idx];
        }
        node
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of headings in the tree.
    pub fn len(&self) -> usize {
        fn count(nodes: &[OutlineNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }

    /// Flatten the tree back into document-ordered headings.
    pub fn flatten(&self) -> Vec<Heading> {
        fn walk(nodes: &[OutlineNode], out: &mut Vec<Heading>) {
            for node in nodes {
                out.push(Heading {
                    level: node.level,
                    text: node.text.clone(),
                    page: node.page,
                    y: node.y,
                });
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: HeadingLevel, text: &str, page: u32, y: f32) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            page,
            y,
        }
    }

    #[test]
    fn test_level_depth_round_trip() {
        assert_eq!(HeadingLevel::from_depth(2), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_depth(9), HeadingLevel::H4);
        assert_eq!(HeadingLevel::H3.depth(), 3);
    }

    #[test]
    fn test_tree_nesting() {
        let outline = DocumentOutline::from_headings(
            "Doc",
            vec![
                heading(HeadingLevel::H1, "Intro", 1, 700.0),
                heading(HeadingLevel::H2, "Background", 1, 600.0),
                heading(HeadingLevel::H2, "Goals", 2, 700.0),
                heading(HeadingLevel::H1, "Methods", 3, 700.0),
            ],
        );

        assert_eq!(outline.roots.len(), 2);
        assert_eq!(outline.roots[0].children.len(), 2);
        assert_eq!(outline.roots[0].children[1].text, "Goals");
        assert_eq!(outline.len(), 4);
    }

    #[test]
    fn test_flatten_is_document_ordered() {
        let outline = DocumentOutline::from_headings(
            "Doc",
            vec![
                // Intentionally shuffled input
                heading(HeadingLevel::H1, "Methods", 3, 700.0),
                heading(HeadingLevel::H2, "Background", 1, 600.0),
                heading(HeadingLevel::H1, "Intro", 1, 700.0),
            ],
        );

        let flat = outline.flatten();
        let keys: Vec<(u32, i64)> = flat.iter().map(|h| (h.page, -(h.y as i64))).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(flat[0].text, "Intro");
    }

    #[test]
    fn test_orphan_deep_heading_becomes_root() {
        // An H3 with no preceding H1/H2 still lands in the tree.
        let outline = DocumentOutline::from_headings(
            "Doc",
            vec![heading(HeadingLevel::H3, "Detail", 1, 700.0)],
        );
        assert_eq!(outline.roots.len(), 1);
        assert_eq!(outline.roots[0].level, HeadingLevel::H3);
    }
}
