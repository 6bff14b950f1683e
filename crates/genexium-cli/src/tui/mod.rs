//! Interactive TUI dashboard: both forms, the result tabs and notifications.

pub mod app;
mod markdown;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use genexium_core::api::{HttpPlanClient, PlanApi};
use genexium_core::controller::StoredPlan;
use genexium_core::export::ExportOptions;

use crate::config::GenexiumConfig;
use crate::session;
use app::{App, Completion, Dispatch};

/// Launch the interactive TUI dashboard.
///
/// `resume` seeds the dashboard with a plan from an earlier run. Every new
/// plan is written to `plan_path` so `genexium workout` can pick it up.
pub async fn run_dashboard(
    config: GenexiumConfig,
    resume: Option<StoredPlan>,
    plan_path: PathBuf,
) -> Result<()> {
    let server_url = config.client.base_url.clone();
    let api: Arc<dyn PlanApi> = Arc::new(HttpPlanClient::new(config.client)?);

    let mut app = App::new(
        server_url,
        config.export_dir,
        ExportOptions {
            mark_unsupported: config.mark_unsupported,
        },
    );
    if let Some(plan) = resume {
        app.state.restore_plan(plan);
        app.status_message = Some("Resumed last plan".to_string());
    }

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, api, &plan_path).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: Arc<dyn PlanApi>,
    plan_path: &std::path::Path,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let tick_rate = app.tick_rate;

    loop {
        // Render.
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with a timeout matching the tick rate.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.status_message = None;
                    if let Some(dispatch) = app.on_key(key) {
                        spawn_request(dispatch, api.clone(), tx.clone());
                    }
                }
            }
        }

        // Apply whatever settled since the last pass.
        while let Ok(completion) = rx.try_recv() {
            if app.apply(completion) {
                if let Some(plan) = app.state.current_plan() {
                    if let Err(e) = session::save_plan(plan, plan_path) {
                        tracing::warn!(error = %e, "could not store plan");
                        app.status_message = Some("Plan not saved for later sessions".to_string());
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Send one request on a background task and report back over `tx`.
fn spawn_request(dispatch: Dispatch, api: Arc<dyn PlanApi>, tx: mpsc::UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let completion = match dispatch {
            Dispatch::Plan(request) => Completion::Plan(api.generate_plan(&request).await),
            Dispatch::Workout(request) => {
                let outcome = api.generate_daily_workout(&request).await;
                Completion::Workout(request, outcome)
            }
        };
        // The receiver is gone only after the dashboard exited.
        let _ = tx.send(completion);
    });
}
