//! Rendered HTML to a flat list of typed blocks.
//!
//! Only the direct element children of the fragment root are inspected.
//! Text is taken the way the DOM's `textContent` does it: every descendant
//! text node concatenated, markup discarded.

use scraper::{ElementRef, Html};

/// One top-level block of a rendered pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `<h1>`..`<h4>`; `level` is 1..=4.
    Heading { level: u8, text: String },
    Paragraph(String),
    /// Text of each direct `<li>` child, in order.
    UnorderedList(Vec<String>),
    /// Text of each direct `<li>` child, in order. Source numbering is ignored.
    OrderedList(Vec<String>),
    BlockQuote(String),
    /// Anything else (tables, code blocks, rules, `<h5>`, ...).
    Unsupported { tag: String },
}

/// Visitor over the closed set of [`Block`] variants.
pub trait BlockVisitor {
    fn heading(&mut self, level: u8, text: &str);
    fn paragraph(&mut self, text: &str);
    fn unordered_list(&mut self, items: &[String]);
    fn ordered_list(&mut self, items: &[String]);
    fn block_quote(&mut self, text: &str);
    fn unsupported(&mut self, tag: &str);
}

impl Block {
    pub fn accept<V: BlockVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Block::Heading { level, text } => visitor.heading(*level, text),
            Block::Paragraph(text) => visitor.paragraph(text),
            Block::UnorderedList(items) => visitor.unordered_list(items),
            Block::OrderedList(items) => visitor.ordered_list(items),
            Block::BlockQuote(text) => visitor.block_quote(text),
            Block::Unsupported { tag } => visitor.unsupported(tag),
        }
    }
}

/// Parse an HTML fragment into its top-level blocks.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .map(classify)
        .collect()
}

fn classify(element: ElementRef<'_>) -> Block {
    match element.value().name() {
        "h1" => heading(1, element),
        "h2" => heading(2, element),
        "h3" => heading(3, element),
        "h4" => heading(4, element),
        "p" => Block::Paragraph(text_content(element)),
        "ul" => Block::UnorderedList(list_items(element)),
        "ol" => Block::OrderedList(list_items(element)),
        "blockquote" => Block::BlockQuote(text_content(element)),
        other => Block::Unsupported {
            tag: other.to_string(),
        },
    }
}

fn heading(level: u8, element: ElementRef<'_>) -> Block {
    Block::Heading {
        level,
        text: text_content(element),
    }
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Items are the direct `<li>` children only. A nested list contributes its
/// text to the enclosing item instead of producing lines of its own.
fn list_items(list: ElementRef<'_>) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(text_content)
        .collect()
}
