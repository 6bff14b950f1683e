mod config;
mod export_cmd;
mod plan_cmd;
mod session;
mod tui;
mod workout_cmd;

#[cfg(test)]
mod test_util;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use genexium_core::api::{ClientConfig, HttpPlanClient};
use genexium_core::controller::{PlanForm, StoredPlan, WorkoutForm};
use genexium_core::export::{ExportOptions, ResultTab};

use config::GenexiumConfig;

#[derive(Parser)]
#[command(
    name = "genexium",
    version,
    about = "Gene-informed training plans and daily workouts from the terminal"
)]
struct Cli {
    /// Backend URL (overrides GENEXIUM_SERVER_URL env var)
    #[arg(long, global = true)]
    server_url: Option<String>,

    /// Directory exports are written to (overrides GENEXIUM_EXPORT_DIR env var)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a genexium config file
    Init {
        /// Backend URL to store
        #[arg(long, default_value = ClientConfig::DEFAULT_URL)]
        url: String,
        /// Basic-auth username
        #[arg(long, default_value = config::DEFAULT_USERNAME)]
        username: String,
        /// Basic-auth password (omit to leave requests unauthenticated)
        #[arg(long)]
        password: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a training plan and research report
    Plan {
        /// Gene to build the plan around (actn3, ppargc1a, adrb2, nos3)
        #[arg(long)]
        gene: String,
        /// Fitness goal in your own words
        #[arg(long)]
        goal: String,
        /// Also export both panes as markdown into the export directory
        #[arg(long)]
        save: bool,
    },
    /// Generate a daily workout from the last generated plan
    Workout {
        /// Week of the plan (1-12)
        #[arg(long)]
        week: String,
        /// Day of the week, e.g. Monday
        #[arg(long)]
        day: String,
        /// Heart-rate variability in ms
        #[arg(long)]
        hrv: Option<String>,
        /// Resting heart rate in bpm
        #[arg(long)]
        resting_heart_rate: Option<String>,
        /// Hours slept last night
        #[arg(long)]
        hours_of_sleep: Option<String>,
        /// Use this markdown file as the training plan instead of the stored one
        #[arg(long, requires = "gene")]
        plan_file: Option<PathBuf>,
        /// Gene the plan file was generated for
        #[arg(long, requires = "plan_file")]
        gene: Option<String>,
        /// Also export the workout as markdown into the export directory
        #[arg(long)]
        save: bool,
    },
    /// Convert a markdown file with the dashboard's download rules
    Export {
        /// Markdown file to convert
        input: PathBuf,
        /// Gene used in the title and file name
        #[arg(long)]
        gene: String,
        /// Content type: training, research or workout
        #[arg(long, default_value = "training")]
        tab: ResultTab,
        /// Leave a comment where a block could not be converted
        #[arg(long)]
        mark_unsupported: bool,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Launch interactive TUI dashboard
    Dashboard {
        /// Start from the last generated plan
        #[arg(long)]
        resume: bool,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

/// Execute the `genexium init` command: write config file.
fn cmd_init(url: &str, username: &str, password: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        server: config::ServerSection {
            url: url.to_string(),
        },
        auth: config::AuthSection {
            username: Some(username.to_string()),
            password: password.map(str::to_string),
        },
        export: config::ExportSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server.url = {url}");
    println!("  auth.username = {username}");
    println!(
        "  auth.password = {}",
        if password.is_some() { "<set>" } else { "<none>" }
    );

    Ok(())
}

/// Log to stderr, or to a file while the dashboard owns the terminal.
fn init_tracing(to_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match to_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = matches!(cli.command, Commands::Dashboard { .. }).then(config::log_path);
    init_tracing(log_file.as_deref())?;

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Init {
            url,
            username,
            password,
            force,
        } => {
            cmd_init(&url, &username, password.as_deref(), force)?;
        }
        Commands::Plan { gene, goal, save } => {
            let resolved = GenexiumConfig::resolve(cli.server_url.as_deref(), cli.export_dir.as_deref())?;
            let client = HttpPlanClient::new(resolved.client)?;
            let plan_path = session::last_plan_path();
            let output = plan_cmd::PlanOutput {
                plan_path: &plan_path,
                save_dir: save.then_some(resolved.export_dir.as_path()),
                export_options: ExportOptions {
                    mark_unsupported: resolved.mark_unsupported,
                },
            };
            plan_cmd::run_plan(&client, &PlanForm::new(gene, goal), &output, &mut out).await?;
        }
        Commands::Workout {
            week,
            day,
            hrv,
            resting_heart_rate,
            hours_of_sleep,
            plan_file,
            gene,
            save,
        } => {
            let resolved = GenexiumConfig::resolve(cli.server_url.as_deref(), cli.export_dir.as_deref())?;
            let client = HttpPlanClient::new(resolved.client)?;

            let plan = match plan_file.zip(gene) {
                Some((path, gene)) => {
                    let training_plan = std::fs::read_to_string(&path)
                        .with_context(|| format!("cannot read plan file: {}", path.display()))?;
                    Some(StoredPlan {
                        gene,
                        goal: None,
                        training_plan,
                        generated_at: chrono::Utc::now(),
                    })
                }
                None => session::load_plan(&session::last_plan_path())?,
            };

            let form = WorkoutForm {
                week_number: week,
                day_of_week: day,
                hrv: hrv.unwrap_or_default(),
                resting_heart_rate: resting_heart_rate.unwrap_or_default(),
                hours_of_sleep: hours_of_sleep.unwrap_or_default(),
            };
            workout_cmd::run_workout(
                &client,
                plan,
                &form,
                save.then_some(resolved.export_dir.as_path()),
                ExportOptions {
                    mark_unsupported: resolved.mark_unsupported,
                },
                &mut out,
            )
            .await?;
        }
        Commands::Export {
            input,
            gene,
            tab,
            mark_unsupported,
            stdout,
        } => {
            let resolved = GenexiumConfig::resolve(cli.server_url.as_deref(), cli.export_dir.as_deref())?;
            let options = ExportOptions {
                mark_unsupported: mark_unsupported || resolved.mark_unsupported,
            };
            export_cmd::run_export(&input, &gene, tab, &resolved.export_dir, options, stdout, &mut out)?;
        }
        Commands::Dashboard { resume } => {
            let resolved = GenexiumConfig::resolve(cli.server_url.as_deref(), cli.export_dir.as_deref())?;
            let plan_path = session::last_plan_path();
            let plan = if resume {
                session::load_plan(&plan_path)?
            } else {
                None
            };
            drop(out);
            tui::run_dashboard(resolved, plan, plan_path).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "genexium", &mut out);
        }
    }

    Ok(())
}
