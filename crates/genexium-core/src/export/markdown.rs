//! Blocks back to a constrained markdown subset.

use std::fmt::Write as _;

use tracing::debug;

use super::ExportOptions;
use super::blocks::BlockVisitor;

/// Accumulates markdown for a sequence of blocks.
///
/// Output is emitted verbatim per block with no trailing normalization, so a
/// document ending in a list ends in a blank line.
pub struct MarkdownWriter {
    out: String,
    options: ExportOptions,
}

impl MarkdownWriter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    /// Title line at the top of every export.
    pub fn title(&mut self, gene: &str, content_type: &str) {
        let _ = write!(self.out, "# {gene} {content_type}\n\n");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl BlockVisitor for MarkdownWriter {
    fn heading(&mut self, level: u8, text: &str) {
        let hashes = "#".repeat(usize::from(level));
        let _ = write!(self.out, "{hashes} {text}\n\n");
    }

    fn paragraph(&mut self, text: &str) {
        let _ = write!(self.out, "{text}\n\n");
    }

    fn unordered_list(&mut self, items: &[String]) {
        for item in items {
            let _ = writeln!(self.out, "- {item}");
        }
        self.out.push('\n');
    }

    fn ordered_list(&mut self, items: &[String]) {
        for (i, item) in items.iter().enumerate() {
            let _ = writeln!(self.out, "{}. {item}", i + 1);
        }
        self.out.push('\n');
    }

    fn block_quote(&mut self, text: &str) {
        let _ = write!(self.out, "> {text}\n\n");
    }

    fn unsupported(&mut self, tag: &str) {
        debug!(tag, "skipping block the export format cannot express");
        if self.options.mark_unsupported {
            let _ = write!(self.out, "<!-- unsupported: {tag} -->\n\n");
        }
    }
}
