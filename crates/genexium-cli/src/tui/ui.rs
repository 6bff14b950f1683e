//! TUI rendering using ratatui.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use genexium_core::export::ResultTab;
use genexium_core::notify::{Level, Notification};
use genexium_core::view::ViewState;

use super::app::{App, Focus};
use super::markdown;

const FORM_WIDTH: u16 = 44;
const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 4;
const MAX_VISIBLE_TOASTS: usize = 3;

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
        .split(chunks[0]);

    render_forms(f, app, body[0]);
    if app.show_help {
        render_help(f, body[1]);
    } else {
        render_section(f, app, body[1]);
    }
    render_status_bar(f, app, chunks[1]);
    render_toasts(f, app, chunks[0]);
}

// -- Forms --

fn render_forms(f: &mut Frame, app: &App, area: Rect) {
    let workout_height = if app.state.workout_form_visible() { 9 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(workout_height),
            Constraint::Min(0),
        ])
        .split(area);

    let plan_lines = vec![
        field_line(app, Focus::Gene, "Gene", select_value(&app.plan_form.gene, "Select a gene")),
        field_line(app, Focus::Goal, "Goal", text_value(&app.plan_form.goal, app.focus == Focus::Goal)),
        Line::from(""),
        button_line(app.state.plan_in_flight(), "Generate Training Plan"),
    ];
    let plan = Paragraph::new(plan_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Training Plan "),
    );
    f.render_widget(plan, chunks[0]);

    if !app.state.workout_form_visible() {
        return;
    }

    let w = &app.workout_form;
    let workout_lines = vec![
        field_line(app, Focus::Week, "Week", select_value(&w.week_number, "Select week")),
        field_line(app, Focus::Day, "Day", select_value(&w.day_of_week, "Select day")),
        field_line(app, Focus::Hrv, "HRV", text_value(&w.hrv, app.focus == Focus::Hrv)),
        field_line(
            app,
            Focus::RestingHeartRate,
            "Resting HR",
            text_value(&w.resting_heart_rate, app.focus == Focus::RestingHeartRate),
        ),
        field_line(app, Focus::Sleep, "Sleep (h)", text_value(&w.hours_of_sleep, app.focus == Focus::Sleep)),
        Line::from(""),
        button_line(app.state.workout_in_flight(), "Generate Daily Workout"),
    ];
    let workout = Paragraph::new(workout_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Daily Workout "),
    );
    f.render_widget(workout, chunks[1]);
}

fn field_line(app: &App, focus: Focus, label: &str, value: Span<'static>) -> Line<'static> {
    let label_style = if app.focus == focus {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![Span::styled(format!(" {label:<11}"), label_style), value])
}

fn select_value(value: &str, placeholder: &str) -> Span<'static> {
    if value.is_empty() {
        Span::styled(format!("‹ {placeholder} ›"), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("‹ {} ›", value.to_uppercase()))
    }
}

fn text_value(value: &str, focused: bool) -> Span<'static> {
    let cursor = if focused { "▏" } else { "" };
    Span::raw(format!("{value}{cursor}"))
}

fn button_line(in_flight: bool, label: &str) -> Line<'static> {
    if in_flight {
        Line::styled("   Generating...", Style::default().fg(Color::DarkGray))
    } else {
        Line::styled(
            format!("   [ {label} ]"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    }
}

// -- Sections --

fn render_section(f: &mut Frame, app: &App, area: Rect) {
    match app.state.view() {
        ViewState::Empty => {
            let text = vec![
                Line::from(""),
                Line::styled("  Ready when you are.", Style::default().add_modifier(Modifier::BOLD)),
                Line::from(""),
                Line::from("  Select a gene and describe your fitness goal, then press Enter"),
                Line::from("  to generate a personalized training plan."),
            ];
            let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" GeneXium "));
            f.render_widget(p, area);
        }
        ViewState::Loading => {
            let text = vec![
                Line::from(""),
                Line::styled("  Generating your training plan...", Style::default().fg(Color::Cyan)),
                Line::from(""),
                Line::styled(
                    "  Reviewing research for your gene. This can take a few minutes.",
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Working "));
            f.render_widget(p, area);
        }
        ViewState::Error { message } => {
            let p = Paragraph::new(vec![
                Line::from(""),
                Line::styled(format!("  {message}"), Style::default().fg(Color::Red)),
            ])
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error "),
            );
            f.render_widget(p, area);
        }
        ViewState::Results => render_results(f, app, area),
    }
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let Some(results) = app.state.results() else {
        return;
    };
    let active = app.state.active_tab().unwrap_or(ResultTab::Training);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let selected = ResultTab::ALL.iter().position(|t| *t == active).unwrap_or(0);
    let tabs = Tabs::new(ResultTab::ALL.iter().map(|t| t.content_type()))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", results.gene_label)),
        );
    f.render_widget(tabs, chunks[0]);

    let lines = match results.pane(active) {
        Some(pane) if !pane.is_empty() => markdown::to_lines(&pane.markdown),
        _ => vec![Line::styled(
            "  Nothing here yet.",
            Style::default().fg(Color::DarkGray),
        )],
    };
    let border = if app.focus == Focus::Results {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let pane = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" d:download "),
        );
    f.render_widget(pane, chunks[1]);
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("  Forms", heading)),
        Line::from("    Tab/S-Tab   Next / previous field"),
        Line::from("    ←/→         Change selection"),
        Line::from("    Enter       Submit the focused form"),
        Line::from(""),
        Line::from(Span::styled("  Results", heading)),
        Line::from("    ←/→         Switch tab"),
        Line::from("    ↑/↓ PgUp/Dn Scroll"),
        Line::from("    d           Download active tab as markdown"),
        Line::from(""),
        Line::from(Span::styled("  Other", heading)),
        Line::from("    x           Dismiss newest notification"),
        Line::from("    ?           Toggle this help"),
        Line::from("    Esc/Ctrl-C  Quit"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help "),
    );
    f.render_widget(help, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let section = app.state.view().section();
    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {section} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(app.server_url.clone(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(status_msg.to_string(), Style::default().fg(Color::Green)),
        Span::raw("  Esc:quit  ?:help  Tab:next field"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Toasts --

fn level_style(level: Level) -> (Color, &'static str) {
    match level {
        Level::Success => (Color::Green, "✓"),
        Level::Info => (Color::Cyan, "ℹ"),
        Level::Warning => (Color::Yellow, "!"),
        Level::Danger => (Color::Red, "✗"),
    }
}

/// Stack live notifications in the top-right corner, newest on top.
fn render_toasts(f: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let ttl = app.state.notifications.ttl();
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);

    for (i, toast) in app
        .state
        .notifications
        .visible()
        .take(MAX_VISIBLE_TOASTS)
        .enumerate()
    {
        let y = area.y + 1 + i as u16 * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        render_toast(f, Rect::new(x, y, width, TOAST_HEIGHT), toast, toast.remaining_at(now, ttl));
    }
}

fn render_toast(f: &mut Frame, area: Rect, toast: &Notification, remaining: f32) {
    let (color, icon) = level_style(toast.level);
    let inner = area.width.saturating_sub(2) as usize;
    let filled = (inner as f32 * remaining) as usize;
    let progress = Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(color)),
        Span::styled("─".repeat(inner - filled.min(inner)), Style::default().fg(Color::DarkGray)),
    ]);

    let body = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::raw(toast.message.clone()),
        ]),
        progress,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    f.render_widget(Clear, area);
    f.render_widget(body, area);
}
