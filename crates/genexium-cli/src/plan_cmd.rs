//! `genexium plan`: generate a training plan and research report.

use std::io::Write;
use std::path::Path;

use anyhow::{Result, bail};

use genexium_core::api::PlanApi;
use genexium_core::controller::{AppState, PlanForm};
use genexium_core::export::{ExportOptions, ResultTab};
use genexium_core::view::ViewState;

use crate::{export_cmd, session};

/// Where the command's side effects go.
pub struct PlanOutput<'a> {
    /// Stored plan file, replaced on success.
    pub plan_path: &'a Path,
    /// Also export both panes into this directory.
    pub save_dir: Option<&'a Path>,
    pub export_options: ExportOptions,
}

pub async fn run_plan(
    api: &dyn PlanApi,
    form: &PlanForm,
    output: &PlanOutput<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut state = AppState::default();
    state.submit_plan(api, form).await?;

    if let ViewState::Error { message } = state.view() {
        bail!("{message}");
    }
    let (Some(results), Some(plan)) = (state.results(), state.current_plan()) else {
        bail!("no results were produced");
    };

    writeln!(out, "Gene: {}", results.gene_label)?;
    writeln!(out)?;
    writeln!(out, "=== {} ===", ResultTab::Training)?;
    writeln!(out, "{}", results.training.markdown.trim_end())?;
    writeln!(out)?;
    writeln!(out, "=== {} ===", ResultTab::Research)?;
    writeln!(out, "{}", results.research.markdown.trim_end())?;

    session::save_plan(plan, output.plan_path)?;

    if let Some(dir) = output.save_dir {
        for tab in [ResultTab::Training, ResultTab::Research] {
            state.select_tab(tab);
            export_cmd::save_active(&state, dir, output.export_options, out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use genexium_core::api::{ClientConfig, HttpPlanClient};
    use genexium_test_utils::{MockBackend, Reply};

    #[tokio::test]
    async fn prints_panes_and_stores_plan() {
        let backend = MockBackend::start().await;
        backend.enqueue_plan(Reply::plan("actn3", "# Plan\n\n- Sprint", "# Report\n\nFast twitch"));
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();

        let tmp = tempfile::TempDir::new().unwrap();
        let plan_path = tmp.path().join("last_plan.json");
        let export_dir = tmp.path().join("out");
        let output = PlanOutput {
            plan_path: &plan_path,
            save_dir: Some(&export_dir),
            export_options: ExportOptions::default(),
        };

        let mut out = Vec::new();
        run_plan(&client, &PlanForm::new("actn3", "sprint"), &output, &mut out)
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Gene: ACTN3\n"));
        assert!(printed.contains("=== Training Plan ===\n# Plan\n\n- Sprint\n"));
        assert!(printed.contains("=== Research Report ===\n# Report\n\nFast twitch\n"));

        let stored = session::load_plan(&plan_path).unwrap().unwrap();
        assert_eq!(stored.training_plan, "# Plan\n\n- Sprint");
        assert_eq!(
            std::fs::read_to_string(export_dir.join("actn3_research_report.md")).unwrap(),
            "# ACTN3 Research Report\n\n# Report\n\nFast twitch\n\n"
        );
        assert!(export_dir.join("actn3_training_plan.md").exists());
    }

    #[tokio::test]
    async fn server_error_becomes_command_error() {
        let backend = MockBackend::start().await;
        backend.enqueue_plan(Reply::error(400, "Invalid gene selected"));
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();

        let tmp = tempfile::TempDir::new().unwrap();
        let plan_path = tmp.path().join("last_plan.json");
        let output = PlanOutput {
            plan_path: &plan_path,
            save_dir: None,
            export_options: ExportOptions::default(),
        };

        let err = run_plan(&client, &PlanForm::new("brca2", "x"), &output, &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid gene selected");
        assert!(!plan_path.exists(), "failed generation must not replace the stored plan");
    }

    #[tokio::test]
    async fn blank_goal_is_rejected_before_sending() {
        let backend = MockBackend::start().await;
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();
        let tmp = tempfile::TempDir::new().unwrap();
        let plan_path = tmp.path().join("last_plan.json");
        let output = PlanOutput {
            plan_path: &plan_path,
            save_dir: None,
            export_options: ExportOptions::default(),
        };

        let err = run_plan(&client, &PlanForm::new("nos3", " "), &output, &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a gene and enter your fitness goal.");
        assert!(backend.requests().is_empty());
    }
}
