//! Application state and the two request/response handlers.
//!
//! Each handler is split in two so an event loop can keep drawing while the
//! request is pending:
//!
//! - `begin_*` validates the form, enters the loading/disabled state and
//!   returns the request body to send;
//! - `finish_*` applies the outcome (results, or an error message).
//!
//! [`AppState::submit_plan`] and [`AppState::submit_workout`] chain both
//! around an injected [`PlanApi`] for callers that can simply await.
//!
//! Error messages follow a fixed taxonomy: validation errors show their own
//! text, server-reported failures show the server's message (or a per-form
//! fallback), and transport failures show a generic connectivity message
//! while the underlying error goes to the log.

pub mod forms;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::api::{ApiError, DailyWorkoutRequest, DailyWorkoutResponse, GeneratePlanRequest, PlanApi, PlanResponse};
use crate::export::{self, ExportDocument, ExportError, ExportOptions, ResultTab};
use crate::notify::{Level, NotificationCenter};
use crate::render::{MarkdownRenderer, RenderedPane};
use crate::view::ViewState;

pub use forms::{DAYS_OF_WEEK, KNOWN_GENES, PLAN_WEEKS, PlanForm, ValidationError, WorkoutForm};

pub const PLAN_FALLBACK_ERROR: &str = "An error occurred while generating your training plan.";
pub const WORKOUT_FALLBACK_ERROR: &str = "An error occurred while generating your daily workout.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";

/// The last successfully generated plan, input to daily workouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub gene: String,
    pub goal: Option<String>,
    pub training_plan: String,
    pub generated_at: DateTime<Utc>,
}

/// Everything the results section shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResults {
    /// Gene as displayed: the server's gene, upper-cased.
    pub gene_label: String,
    pub training: RenderedPane,
    pub research: RenderedPane,
    /// Empty until a daily workout has been generated for this plan.
    pub daily_workout: Option<RenderedPane>,
}

impl PlanResults {
    pub fn pane(&self, tab: ResultTab) -> Option<&RenderedPane> {
        match tab {
            ResultTab::Training => Some(&self.training),
            ResultTab::Research => Some(&self.research),
            ResultTab::DailyWorkout => self.daily_workout.as_ref(),
        }
    }
}

/// Why a submission did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// The form failed validation; the error view is showing.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The form's button is disabled while its previous request is pending.
    #[error("a request from this form is already in flight")]
    InFlight,
}

/// All mutable client state, owned by whoever drives the UI.
#[derive(Debug)]
pub struct AppState {
    renderer: MarkdownRenderer,
    view: ViewState,
    current_plan: Option<StoredPlan>,
    results: Option<PlanResults>,
    active_tab: Option<ResultTab>,
    plan_in_flight: bool,
    workout_in_flight: bool,
    workout_form_visible: bool,
    pub notifications: NotificationCenter,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MarkdownRenderer::default())
    }
}

impl AppState {
    pub fn new(renderer: MarkdownRenderer) -> Self {
        Self {
            renderer,
            view: ViewState::Empty,
            current_plan: None,
            results: None,
            active_tab: None,
            plan_in_flight: false,
            workout_in_flight: false,
            workout_form_visible: false,
            notifications: NotificationCenter::new(),
        }
    }

    // -- Accessors --

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn current_plan(&self) -> Option<&StoredPlan> {
        self.current_plan.as_ref()
    }

    pub fn results(&self) -> Option<&PlanResults> {
        self.results.as_ref()
    }

    pub fn active_tab(&self) -> Option<ResultTab> {
        self.active_tab
    }

    pub fn plan_in_flight(&self) -> bool {
        self.plan_in_flight
    }

    pub fn workout_in_flight(&self) -> bool {
        self.workout_in_flight
    }

    pub fn workout_form_visible(&self) -> bool {
        self.workout_form_visible
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    // -- View --

    /// Switch the visible section.
    pub fn show(&mut self, view: ViewState) {
        self.view = view;
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.show(ViewState::error(message));
    }

    /// Activate a result tab. Ignored while there are no results.
    pub fn select_tab(&mut self, tab: ResultTab) {
        if self.results.is_some() {
            self.active_tab = Some(tab);
        }
    }

    // -- Training plan --

    pub fn begin_plan(&mut self, form: &PlanForm) -> Result<GeneratePlanRequest, SubmitRejected> {
        if self.plan_in_flight {
            return Err(SubmitRejected::InFlight);
        }
        let request = form.validate().inspect_err(|e| self.show_error(e.to_string()))?;

        self.show(ViewState::Loading);
        self.plan_in_flight = true;
        info!(gene = %request.gene, "requesting training plan");
        Ok(request)
    }

    pub fn finish_plan(&mut self, outcome: Result<PlanResponse, ApiError>) {
        self.plan_in_flight = false;
        match outcome {
            Ok(response) => self.apply_plan(response),
            Err(err) => {
                let message = failure_message(&err, PLAN_FALLBACK_ERROR);
                self.show_error(message);
            }
        }
    }

    fn apply_plan(&mut self, response: PlanResponse) {
        let training = RenderedPane::render(&self.renderer, response.training_plan.as_str());
        let research = RenderedPane::render(&self.renderer, response.research_report);

        self.results = Some(PlanResults {
            gene_label: response.gene.to_uppercase(),
            training,
            research,
            daily_workout: None,
        });
        self.active_tab.get_or_insert(ResultTab::Training);
        self.workout_form_visible = true;
        self.current_plan = Some(StoredPlan {
            gene: response.gene,
            goal: response.goal,
            training_plan: response.training_plan,
            generated_at: Utc::now(),
        });
        self.show(ViewState::Results);
        info!("training plan received");
    }

    /// Resume from a plan generated in an earlier session.
    ///
    /// The training pane is re-rendered from the stored markdown; the
    /// research report is not kept across sessions and stays empty.
    pub fn restore_plan(&mut self, plan: StoredPlan) {
        self.results = Some(PlanResults {
            gene_label: plan.gene.to_uppercase(),
            training: RenderedPane::render(&self.renderer, plan.training_plan.as_str()),
            research: RenderedPane::default(),
            daily_workout: None,
        });
        self.active_tab = Some(ResultTab::Training);
        self.workout_form_visible = true;
        self.current_plan = Some(plan);
        self.show(ViewState::Results);
    }

    pub async fn submit_plan(&mut self, api: &dyn PlanApi, form: &PlanForm) -> Result<(), SubmitRejected> {
        let request = self.begin_plan(form)?;
        let outcome = api.generate_plan(&request).await;
        self.finish_plan(outcome);
        Ok(())
    }

    // -- Daily workout --

    pub fn begin_workout(&mut self, form: &WorkoutForm) -> Result<DailyWorkoutRequest, SubmitRejected> {
        if self.workout_in_flight {
            return Err(SubmitRejected::InFlight);
        }
        let request = form
            .validate(self.current_plan.as_ref())
            .inspect_err(|e| self.show_error(e.to_string()))?;

        self.workout_in_flight = true;
        info!(week = %request.week_number, day = %request.day_of_week, "requesting daily workout");
        Ok(request)
    }

    pub fn finish_workout(
        &mut self,
        request: &DailyWorkoutRequest,
        outcome: Result<DailyWorkoutResponse, ApiError>,
    ) {
        self.workout_in_flight = false;
        match outcome {
            Ok(response) => {
                let pane = RenderedPane::render(&self.renderer, response.daily_workout);
                if let Some(results) = self.results.as_mut() {
                    results.daily_workout = Some(pane);
                }
                self.active_tab = Some(ResultTab::DailyWorkout);
                self.show(ViewState::Results);
                self.notifications.push(
                    Level::Success,
                    format!(
                        "Daily workout generated for Week {}, {}!",
                        request.week_number, request.day_of_week
                    ),
                );
            }
            Err(err) => {
                let message = failure_message(&err, WORKOUT_FALLBACK_ERROR);
                self.show_error(message);
            }
        }
    }

    pub async fn submit_workout(&mut self, api: &dyn PlanApi, form: &WorkoutForm) -> Result<(), SubmitRejected> {
        let request = self.begin_workout(form)?;
        let outcome = api.generate_daily_workout(&request).await;
        self.finish_workout(&request, outcome);
        Ok(())
    }

    // -- Export --

    /// Convert the active result tab to a downloadable markdown document.
    ///
    /// A tab that has no content yet exports as the title line alone.
    pub fn export_active(&self, options: ExportOptions) -> Result<ExportDocument, ExportError> {
        let results = self.results.as_ref().ok_or(ExportError::NoResults)?;
        let tab = self.active_tab.ok_or(ExportError::NoActiveTab)?;
        let html = results.pane(tab).map(|p| p.html.as_str()).unwrap_or("");
        Ok(export::export_pane(&results.gene_label, tab, html, options))
    }
}

/// User-facing text for a failed request.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    if err.is_connectivity() {
        error!(error = %err, "request failed");
        NETWORK_ERROR.to_string()
    } else {
        warn!(error = %err, "server reported failure");
        err.server_message().unwrap_or(fallback).to_string()
    }
}
