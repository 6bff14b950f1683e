//! Wire types for the two generation endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /generate_plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratePlanRequest {
    pub gene: String,
    pub goal: String,
}

/// Successful payload of `POST /generate_plan`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanResponse {
    /// Gene identifier as the server knows it (usually lower case).
    pub gene: String,
    /// Multi-week plan, markdown.
    pub training_plan: String,
    /// Research summary the plan was derived from, markdown.
    pub research_report: String,
    /// Echo of the submitted goal. Older servers omit it.
    #[serde(default)]
    pub goal: Option<String>,
}

/// Body of `POST /generate_daily_workout`.
///
/// Week and day are sent as the literal form values. The three physiological
/// metrics are optional and serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWorkoutRequest {
    pub training_plan: String,
    pub week_number: String,
    pub day_of_week: String,
    pub hrv: Option<String>,
    pub resting_heart_rate: Option<String>,
    pub hours_of_sleep: Option<String>,
}

/// Successful payload of `POST /generate_daily_workout`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyWorkoutResponse {
    pub daily_workout: String,
}
