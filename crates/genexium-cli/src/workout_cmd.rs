//! `genexium workout`: generate a daily workout from the stored plan.

use std::io::Write;
use std::path::Path;

use anyhow::{Result, bail};

use genexium_core::api::PlanApi;
use genexium_core::controller::{AppState, StoredPlan, WorkoutForm};
use genexium_core::export::ExportOptions;
use genexium_core::view::ViewState;

use crate::export_cmd;

pub async fn run_workout(
    api: &dyn PlanApi,
    plan: Option<StoredPlan>,
    form: &WorkoutForm,
    save_dir: Option<&Path>,
    export_options: ExportOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let mut state = AppState::default();
    if let Some(plan) = plan {
        state.restore_plan(plan);
    }
    state.submit_workout(api, form).await?;

    if let ViewState::Error { message } = state.view() {
        bail!("{message}");
    }
    let Some(pane) = state.results().and_then(|r| r.daily_workout.as_ref()) else {
        bail!("no workout was produced");
    };

    writeln!(out, "{}", pane.markdown.trim_end())?;
    if let Some(toast) = state.notifications.visible().next() {
        writeln!(out)?;
        writeln!(out, "{}", toast.message)?;
    }

    if let Some(dir) = save_dir {
        export_cmd::save_active(&state, dir, export_options, out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use genexium_core::api::{ClientConfig, HttpPlanClient};
    use genexium_test_utils::{MockBackend, Reply};

    fn plan() -> StoredPlan {
        StoredPlan {
            gene: "adrb2".to_string(),
            goal: Some("5k PR".to_string()),
            training_plan: "# Twelve weeks".to_string(),
            generated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn prints_workout_and_confirmation() {
        let backend = MockBackend::start().await;
        backend.enqueue_workout(Reply::workout("## Intervals\n\n1. 6x400m"));
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();

        let tmp = tempfile::TempDir::new().unwrap();
        let mut out = Vec::new();
        run_workout(
            &client,
            Some(plan()),
            &WorkoutForm::new("2", "Thursday"),
            Some(tmp.path()),
            ExportOptions::default(),
            &mut out,
        )
        .await
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("## Intervals\n\n1. 6x400m\n\nDaily workout generated for Week 2, Thursday!\n"));
        assert_eq!(backend.requests()[0].body["training_plan"], "# Twelve weeks");
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("adrb2_daily_workout.md")).unwrap(),
            "# ADRB2 Daily Workout\n\n## Intervals\n\n1. 6x400m\n\n"
        );
    }

    #[tokio::test]
    async fn without_plan_reports_missing_plan() {
        let backend = MockBackend::start().await;
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();

        let err = run_workout(
            &client,
            None,
            &WorkoutForm::new("1", "Monday"),
            None,
            ExportOptions::default(),
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Please generate a training plan first.");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn server_failure_without_message_uses_fallback() {
        let backend = MockBackend::start().await;
        backend.enqueue_workout(Reply::json(500, serde_json::json!({})));
        let client = HttpPlanClient::new(ClientConfig::new(backend.base_url())).unwrap();

        let err = run_workout(
            &client,
            Some(plan()),
            &WorkoutForm::new("1", "Monday"),
            None,
            ExportOptions::default(),
            &mut Vec::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred while generating your daily workout."
        );
    }
}
