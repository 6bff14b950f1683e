//! "Download as markdown": rendered result panes back to a `.md` file.
//!
//! The converter is deliberately lossy. It reads only the top-level blocks of
//! a rendered pane (headings 1-4, paragraphs, flat lists, block quotes) and
//! reduces each to plain text; tables, code blocks, images and inline
//! formatting do not survive.

pub mod blocks;
pub mod markdown;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use blocks::parse_blocks;
use markdown::MarkdownWriter;

/// MIME type of exported documents.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// The three result panes, one per tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultTab {
    Training,
    Research,
    DailyWorkout,
}

impl ResultTab {
    pub const ALL: [ResultTab; 3] = [ResultTab::Training, ResultTab::Research, ResultTab::DailyWorkout];

    /// Human-readable content type, used in the export title.
    pub fn content_type(self) -> &'static str {
        match self {
            ResultTab::Training => "Training Plan",
            ResultTab::Research => "Research Report",
            ResultTab::DailyWorkout => "Daily Workout",
        }
    }

    /// File-name suffix.
    pub fn slug(self) -> &'static str {
        match self {
            ResultTab::Training => "training_plan",
            ResultTab::Research => "research_report",
            ResultTab::DailyWorkout => "daily_workout",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ResultTab::Training => ResultTab::Research,
            ResultTab::Research => ResultTab::DailyWorkout,
            ResultTab::DailyWorkout => ResultTab::Training,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ResultTab::Training => ResultTab::DailyWorkout,
            ResultTab::Research => ResultTab::Training,
            ResultTab::DailyWorkout => ResultTab::Research,
        }
    }
}

impl fmt::Display for ResultTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

impl std::str::FromStr for ResultTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "training" | "training_plan" | "training-plan" => Ok(ResultTab::Training),
            "research" | "research_report" | "research-report" => Ok(ResultTab::Research),
            "workout" | "daily_workout" | "daily-workout" => Ok(ResultTab::DailyWorkout),
            other => Err(format!(
                "unknown content type {other:?} (expected training, research or workout)"
            )),
        }
    }
}

/// Knobs for the converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Emit an HTML comment for every block that had to be dropped.
    pub mark_unsupported: bool,
}

/// Errors that can occur while exporting a pane.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no result tab is active")]
    NoActiveTab,

    #[error("there are no results to export yet")]
    NoResults,

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A converted pane, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

impl ExportDocument {
    /// `<gene>_<slug>.md`, lower-cased.
    pub fn file_name_for(gene: &str, tab: ResultTab) -> String {
        format!("{}_{}.md", gene.to_lowercase(), tab.slug())
    }

    /// Write the document into `dir`, replacing any file of the same name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        std::fs::write(&path, self.contents.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), mime = self.mime, bytes = self.contents.len(), "export written");
        Ok(path)
    }
}

/// Convert a rendered pane to markdown, title line included.
pub fn convert(gene: &str, tab: ResultTab, html: &str, options: ExportOptions) -> String {
    let mut writer = MarkdownWriter::new(options);
    writer.title(gene, tab.content_type());
    for block in parse_blocks(html) {
        block.accept(&mut writer);
    }
    writer.finish()
}

/// Convert a rendered pane and package it as a downloadable document.
pub fn export_pane(gene: &str, tab: ResultTab, html: &str, options: ExportOptions) -> ExportDocument {
    ExportDocument {
        file_name: ExportDocument::file_name_for(gene, tab),
        mime: MARKDOWN_MIME,
        contents: convert(gene, tab, html, options),
    }
}
