//! Form values and their client-side validation.

use crate::api::{DailyWorkoutRequest, GeneratePlanRequest};

use super::StoredPlan;

/// Genes the backend accepts.
pub const KNOWN_GENES: [&str; 4] = ["actn3", "ppargc1a", "adrb2", "nos3"];

/// Choices offered for the day-of-week field.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Number of weeks offered for the week field.
pub const PLAN_WEEKS: u32 = 12;

/// Validation failures. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a gene and enter your fitness goal.")]
    MissingGeneOrGoal,

    #[error("Please select both week number and day of week.")]
    MissingWeekOrDay,

    #[error("Please generate a training plan first.")]
    NoPlan,
}

/// Values of the training-plan form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanForm {
    pub gene: String,
    pub goal: String,
}

impl PlanForm {
    pub fn new(gene: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            goal: goal.into(),
        }
    }

    /// Build the request body. The goal is trimmed; the gene is sent as chosen.
    pub fn validate(&self) -> Result<GeneratePlanRequest, ValidationError> {
        let goal = self.goal.trim();
        if self.gene.is_empty() || goal.is_empty() {
            return Err(ValidationError::MissingGeneOrGoal);
        }
        Ok(GeneratePlanRequest {
            gene: self.gene.clone(),
            goal: goal.to_string(),
        })
    }
}

/// Values of the daily-workout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutForm {
    pub week_number: String,
    pub day_of_week: String,
    pub hrv: String,
    pub resting_heart_rate: String,
    pub hours_of_sleep: String,
}

impl WorkoutForm {
    pub fn new(week_number: impl Into<String>, day_of_week: impl Into<String>) -> Self {
        Self {
            week_number: week_number.into(),
            day_of_week: day_of_week.into(),
            ..Self::default()
        }
    }

    /// Build the request body against the currently stored plan.
    ///
    /// Week and day are checked before the plan, so an incomplete form is
    /// reported as such even when no plan exists yet.
    pub fn validate(&self, plan: Option<&StoredPlan>) -> Result<DailyWorkoutRequest, ValidationError> {
        if self.week_number.is_empty() || self.day_of_week.is_empty() {
            return Err(ValidationError::MissingWeekOrDay);
        }
        let plan = plan
            .filter(|p| !p.training_plan.is_empty())
            .ok_or(ValidationError::NoPlan)?;

        Ok(DailyWorkoutRequest {
            training_plan: plan.training_plan.clone(),
            week_number: self.week_number.clone(),
            day_of_week: self.day_of_week.clone(),
            hrv: optional(&self.hrv),
            resting_heart_rate: optional(&self.resting_heart_rate),
            hours_of_sleep: optional(&self.hours_of_sleep),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
