//! `genexium export`: convert a markdown file the way the dashboard's
//! download action does, plus the save helper the other commands share.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use genexium_core::controller::AppState;
use genexium_core::export::{self, ExportOptions, ResultTab};
use genexium_core::render::MarkdownRenderer;

/// Render `input` to HTML, run it through the exporter and write the result
/// into `dir` (or to `out` when `to_stdout` is set).
pub fn run_export(
    input: &Path,
    gene: &str,
    tab: ResultTab,
    dir: &Path,
    options: ExportOptions,
    to_stdout: bool,
    out: &mut dyn Write,
) -> Result<Option<PathBuf>> {
    let markdown = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read input file: {}", input.display()))?;
    let html = MarkdownRenderer::default().to_html(&markdown);
    let doc = export::export_pane(&gene.to_uppercase(), tab, &html, options);

    if to_stdout {
        out.write_all(doc.contents.as_bytes())?;
        return Ok(None);
    }

    let path = doc.save_to(dir)?;
    writeln!(out, "Exported {} to {}", tab, path.display())?;
    Ok(Some(path))
}

/// Export the active tab of `state` into `dir` and report where it went.
pub fn save_active(
    state: &AppState,
    dir: &Path,
    options: ExportOptions,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    let doc = state.export_active(options)?;
    let path = doc.save_to(dir)?;
    writeln!(out, "Saved {}", path.display())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_file_into_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("plan.md");
        std::fs::write(&input, "## Week 1\n\n- Run\n- Rest\n").unwrap();
        let out_dir = tmp.path().join("exports");

        let mut out = Vec::new();
        let path = run_export(
            &input,
            "brca1",
            ResultTab::Training,
            &out_dir,
            ExportOptions::default(),
            false,
            &mut out,
        )
        .unwrap()
        .unwrap();

        assert_eq!(path, out_dir.join("brca1_training_plan.md"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# BRCA1 Training Plan\n\n## Week 1\n\n- Run\n- Rest\n\n"
        );
        assert!(String::from_utf8(out).unwrap().starts_with("Exported Training Plan to "));
    }

    #[test]
    fn stdout_mode_writes_nothing_to_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("report.md");
        std::fs::write(&input, "| a |\n|---|\n| b |\n\nSummary\n").unwrap();

        let mut out = Vec::new();
        let path = run_export(
            &input,
            "nos3",
            ResultTab::Research,
            tmp.path(),
            ExportOptions { mark_unsupported: true },
            true,
            &mut out,
        )
        .unwrap();

        assert!(path.is_none());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# NOS3 Research Report\n\n<!-- unsupported: table -->\n\nSummary\n\n"
        );
        assert!(!tmp.path().join("nos3_research_report.md").exists());
    }

    #[test]
    fn missing_input_names_the_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = run_export(
            &tmp.path().join("absent.md"),
            "actn3",
            ResultTab::Training,
            tmp.path(),
            ExportOptions::default(),
            true,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.md"), "unexpected error: {err}");
    }
}
