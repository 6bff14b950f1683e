//! TUI application state: form fields, focus and key handling.
//!
//! Network calls never happen here. A submit key produces a [`Dispatch`]
//! that the event loop sends off on a background task; its result comes
//! back as a [`Completion`] and is applied with [`App::apply`].

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use genexium_core::api::{ApiError, DailyWorkoutRequest, DailyWorkoutResponse, GeneratePlanRequest, PlanResponse};
use genexium_core::controller::{AppState, DAYS_OF_WEEK, KNOWN_GENES, PLAN_WEEKS, PlanForm, WorkoutForm};
use genexium_core::export::ExportOptions;
use genexium_core::notify::Level;

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Gene,
    Goal,
    Week,
    Day,
    Hrv,
    RestingHeartRate,
    Sleep,
    Results,
}

impl Focus {
    const PLAN: [Focus; 2] = [Focus::Gene, Focus::Goal];
    const WORKOUT: [Focus; 5] = [
        Focus::Week,
        Focus::Day,
        Focus::Hrv,
        Focus::RestingHeartRate,
        Focus::Sleep,
    ];

    /// Free-text inputs swallow character keys.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Focus::Goal | Focus::Hrv | Focus::RestingHeartRate | Focus::Sleep
        )
    }

    fn is_numeric(self) -> bool {
        matches!(self, Focus::Hrv | Focus::RestingHeartRate | Focus::Sleep)
    }

    fn in_plan_form(self) -> bool {
        Self::PLAN.contains(&self)
    }

    fn in_workout_form(self) -> bool {
        Self::WORKOUT.contains(&self)
    }
}

/// A request the event loop should send.
#[derive(Debug)]
pub enum Dispatch {
    Plan(GeneratePlanRequest),
    Workout(DailyWorkoutRequest),
}

/// A settled request, sent back to the event loop.
#[derive(Debug)]
pub enum Completion {
    Plan(Result<PlanResponse, ApiError>),
    Workout(DailyWorkoutRequest, Result<DailyWorkoutResponse, ApiError>),
}

/// Application state for the TUI.
pub struct App {
    pub state: AppState,
    pub plan_form: PlanForm,
    pub workout_form: WorkoutForm,
    pub focus: Focus,
    pub show_help: bool,
    /// Vertical scroll of the result pane.
    pub scroll: u16,
    pub server_url: String,
    pub export_dir: PathBuf,
    pub export_options: ExportOptions,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(server_url: String, export_dir: PathBuf, export_options: ExportOptions) -> Self {
        Self {
            state: AppState::default(),
            plan_form: PlanForm::default(),
            workout_form: WorkoutForm::default(),
            focus: Focus::Gene,
            show_help: false,
            scroll: 0,
            server_url,
            export_dir,
            export_options,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
        }
    }

    // -- Focus --

    /// Focusable controls in Tab order. The workout form and result pane
    /// only join once a plan exists.
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = Focus::PLAN.to_vec();
        if self.state.workout_form_visible() {
            order.extend(Focus::WORKOUT);
        }
        if self.state.results().is_some() {
            order.push(Focus::Results);
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + order.len() - 1) % order.len()];
    }

    // -- Field editing --

    fn text_field(&mut self, focus: Focus) -> Option<&mut String> {
        match focus {
            Focus::Goal => Some(&mut self.plan_form.goal),
            Focus::Hrv => Some(&mut self.workout_form.hrv),
            Focus::RestingHeartRate => Some(&mut self.workout_form.resting_heart_rate),
            Focus::Sleep => Some(&mut self.workout_form.hours_of_sleep),
            _ => None,
        }
    }

    fn type_char(&mut self, c: char) {
        let focus = self.focus;
        if focus.is_numeric() && !(c.is_ascii_digit() || c == '.') {
            return;
        }
        if let Some(field) = self.text_field(focus) {
            field.push(c);
        }
    }

    fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(field) = self.text_field(focus) {
            field.pop();
        }
    }

    /// Step a select control through its options. The first option is the
    /// empty placeholder.
    fn cycle_select(&mut self, forward: bool) {
        match self.focus {
            Focus::Gene => {
                let options: Vec<String> = std::iter::once(String::new())
                    .chain(KNOWN_GENES.iter().map(|g| g.to_string()))
                    .collect();
                self.plan_form.gene = step(&options, &self.plan_form.gene, forward);
            }
            Focus::Week => {
                let options: Vec<String> = std::iter::once(String::new())
                    .chain((1..=PLAN_WEEKS).map(|w| w.to_string()))
                    .collect();
                self.workout_form.week_number = step(&options, &self.workout_form.week_number, forward);
            }
            Focus::Day => {
                let options: Vec<String> = std::iter::once(String::new())
                    .chain(DAYS_OF_WEEK.iter().map(|d| d.to_string()))
                    .collect();
                self.workout_form.day_of_week = step(&options, &self.workout_form.day_of_week, forward);
            }
            _ => {}
        }
    }

    // -- Results --

    fn switch_tab(&mut self, forward: bool) {
        if let Some(tab) = self.state.active_tab() {
            self.state.select_tab(if forward { tab.next() } else { tab.prev() });
            self.scroll = 0;
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }

    /// Write the active tab to the export directory.
    pub fn download(&mut self) {
        let saved = self
            .state
            .export_active(self.export_options)
            .and_then(|doc| doc.save_to(&self.export_dir));
        match saved {
            Ok(path) => {
                self.state
                    .notifications
                    .push(Level::Info, format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.state.notifications.push(Level::Danger, format!("Export failed: {e}"));
            }
        }
    }

    // -- Submission --

    fn submit(&mut self) -> Option<Dispatch> {
        if self.focus.in_plan_form() {
            self.state.begin_plan(&self.plan_form).ok().map(Dispatch::Plan)
        } else if self.focus.in_workout_form() {
            self.state.begin_workout(&self.workout_form).ok().map(Dispatch::Workout)
        } else {
            None
        }
    }

    /// Apply a finished request. Returns true when a new plan was stored.
    pub fn apply(&mut self, completion: Completion) -> bool {
        self.scroll = 0;
        match completion {
            Completion::Plan(outcome) => {
                let ok = outcome.is_ok();
                self.state.finish_plan(outcome);
                ok
            }
            Completion::Workout(request, outcome) => {
                self.state.finish_workout(&request, outcome);
                false
            }
        }
    }

    /// Periodic housekeeping between key presses.
    pub fn tick(&mut self) {
        self.state.notifications.tick();
    }

    // -- Keys --

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Dispatch> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if self.focus == Focus::Results {
                    self.switch_tab(forward);
                } else {
                    self.cycle_select(forward);
                }
            }
            KeyCode::Up if self.focus == Focus::Results => self.scroll_by(-1),
            KeyCode::Down if self.focus == Focus::Results => self.scroll_by(1),
            KeyCode::PageUp if self.focus == Focus::Results => self.scroll_by(-10),
            KeyCode::PageDown if self.focus == Focus::Results => self.scroll_by(10),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if self.focus.is_text() => self.type_char(c),
            KeyCode::Char('d') => self.download(),
            KeyCode::Char('x') => {
                self.state.notifications.dismiss_latest();
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        None
    }
}

fn step(options: &[String], current: &str, forward: bool) -> String {
    let len = options.len();
    let i = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
    options[next].clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
