use clap::{Parser, Subcommand};
use crate::admin::{run_drop_table, TableName};
use crate::cli::changes::{save_changes, undo_changes, ChangeRecorder};
use crate::cli::error::{
    parse_mode_arg, parse_scale_arg, parse_status_arg, user_error, validate_date_range, validate_project_id,
    validate_stage_id, Reported,
};
use crate::cli::output::{format_pending_changes, format_stages_table, get_terminal_width, is_tty};
use crate::client::{HttpStagesClient, QueryClient, RetryPolicy};
use crate::config::{AppConfig, DbConfig};
use crate::models::{ProjectId, ScheduleMode, StageStatus, TimelineScale};
use crate::store::{LocalStore, PendingChangeRepo, PreferenceRepo};
use crate::utils::parse_date_expr;
use crate::view::{TimelineRoute, TimelineView, ViewState};
use crate::widget::{GanttOptions, JsonGantt, RowFilter, TerminalGantt, TimelineEvents, TimelineWidget};
use anyhow::{Context, Result};
use std::io;

#[derive(Parser)]
#[command(name = "pcq")]
#[command(about = "Project Cost & Quality - stage overviews and Gantt timelines from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the Gantt timeline of a project
    Timeline {
        /// Project ID or route path (/projects/<id>/timeline-interactive)
        target: String,
        /// Which dates to plot: estimate (planned) or actual
        #[arg(long, value_parser = parse_mode_arg, default_value = "estimate")]
        mode: ScheduleMode,
        /// Time scale: day, week, month or year (defaults to the saved scale)
        #[arg(long, value_parser = parse_scale_arg)]
        scale: Option<TimelineScale>,
        /// Only show stages with this status (repeatable): good, warning, at-risk
        #[arg(long = "status", value_parser = parse_status_arg)]
        statuses: Vec<StageStatus>,
        /// Output Gantt task records as JSON
        #[arg(long)]
        json: bool,
        /// Chart width in characters (defaults to the terminal width)
        #[arg(long)]
        width: Option<usize>,
    },
    /// List the stages overview of a project
    Stages {
        /// Project ID
        project: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Set the default timeline scale
    Scale {
        /// day, week, month or year
        #[arg(value_parser = parse_scale_arg)]
        scale: TimelineScale,
    },
    /// Record new dates for a stage (sent with `changes save`)
    Move {
        /// Project ID
        project: String,
        /// Stage ID
        stage: String,
        /// Start date (YYYY-MM-DD, today, tomorrow, +3d, ...)
        start: String,
        /// End date
        end: String,
        /// Move the actual dates instead of the planned ones
        #[arg(long)]
        actual: bool,
    },
    /// Pending stage date changes
    Changes {
        #[command(subcommand)]
        subcommand: ChangesCommands,
    },
    /// Database maintenance (PostgreSQL, configured through DB_* variables)
    Admin {
        #[command(subcommand)]
        subcommand: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum ChangesCommands {
    /// List pending changes
    List {
        /// Project ID
        project: String,
    },
    /// Send pending changes to the server
    Save {
        /// Project ID
        project: String,
    },
    /// Discard pending changes
    Undo {
        /// Project ID
        project: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Drop a table (and dependent objects) if it exists
    DropTable {
        /// Table name, optionally schema-qualified
        #[arg(long, default_value = "members")]
        table: String,
    },
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout with success; usage errors are user errors
            e.print()?;
            if e.use_stderr() {
                return Err(Reported::user().into());
            }
            return Ok(());
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Timeline { target, mode, scale, statuses, json, width } => {
            handle_timeline(&load_config()?, &target, mode, scale, statuses, json, width)
        }
        Commands::Stages { project, json } => handle_stages(&load_config()?, &project, json),
        Commands::Scale { scale } => handle_scale(&load_config()?, scale),
        Commands::Move { project, stage, start, end, actual } => {
            handle_move(&load_config()?, &project, &stage, &start, &end, actual)
        }
        Commands::Changes { subcommand } => handle_changes(&load_config()?, subcommand),
        // DB_* only; the client config is not needed
        Commands::Admin { subcommand } => match subcommand {
            AdminCommands::DropTable { table } => handle_admin_drop_table(&table),
        },
    }
}

fn load_config() -> Result<AppConfig> {
    AppConfig::load().context("Failed to load configuration")
}

fn query_client(config: &AppConfig) -> Result<QueryClient<HttpStagesClient>> {
    let api = HttpStagesClient::new(&config.api)?;
    let retry = RetryPolicy {
        retries: config.api.retries,
        ..RetryPolicy::default()
    };
    Ok(QueryClient::new(api).with_retry(retry))
}

fn project_arg(value: &str) -> ProjectId {
    validate_project_id(value).unwrap_or_else(|e| user_error(&e))
}

fn handle_timeline(
    config: &AppConfig,
    target: &str,
    mode: ScheduleMode,
    scale: Option<TimelineScale>,
    statuses: Vec<StageStatus>,
    json: bool,
    width: Option<usize>,
) -> Result<()> {
    let route = TimelineRoute::parse(target)?;
    let mut view = TimelineView::mount(&route.project_param);

    let stderr = io::stderr();
    let mut status = stderr.lock();
    let filter = RowFilter { mode, statuses };

    let mut widget: Box<dyn TimelineWidget> = if json {
        Box::new(JsonGantt::new(io::stdout(), filter))
    } else {
        let scale = match scale {
            Some(scale) => scale,
            None => {
                let conn = LocalStore::connect(&config.data_location)?;
                PreferenceRepo::timeline_scale(&conn)?
            }
        };
        let options = GanttOptions {
            scale,
            filter,
            width: width.unwrap_or_else(get_terminal_width),
            color: is_tty(),
            ..GanttOptions::default()
        };
        Box::new(TerminalGantt::new(io::stdout(), options))
    };

    if view.fetch_enabled() {
        view.render(widget.as_mut(), &mut status)?;
        let mut client = query_client(config)?;
        view.load(&mut client);
    }
    view.render(widget.as_mut(), &mut status)?;

    match view.state() {
        ViewState::Ready(_) => {
            if let Some(project) = view.project() {
                report_pending(config, project)?;
            }
            Ok(())
        }
        ViewState::Invalid(_) => Err(Reported::user().into()),
        ViewState::Error(_) | ViewState::Loading => Err(Reported::internal().into()),
    }
}

// Unsent edits are not part of the server's overview; point at them
fn report_pending(config: &AppConfig, project: ProjectId) -> Result<()> {
    if !config.data_location.exists() {
        return Ok(());
    }
    let conn = LocalStore::connect(&config.data_location)?;
    let pending = PendingChangeRepo::list(&conn, project)?;
    if !pending.is_empty() {
        eprintln!(
            "{} unsaved change(s) for project {}. Run 'pcq changes save {}' to send them.",
            pending.len(),
            project,
            project
        );
    }
    Ok(())
}

fn handle_stages(config: &AppConfig, project: &str, json: bool) -> Result<()> {
    let project = project_arg(project);
    let mut client = query_client(config)?;
    let stages = client
        .stages_overview(project)
        .with_context(|| format!("Failed to load stages for project {}", project))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stages)?);
        return Ok(());
    }

    if stages.is_empty() {
        println!("No stages found for project {}.", project);
        return Ok(());
    }

    print!("{}", format_stages_table(&stages, is_tty()));
    Ok(())
}

fn handle_scale(config: &AppConfig, scale: TimelineScale) -> Result<()> {
    let conn = LocalStore::connect(&config.data_location)?;
    PreferenceRepo::set_timeline_scale(&conn, scale)?;
    println!("Default timeline scale set to {}.", scale.as_str());
    Ok(())
}

fn handle_move(config: &AppConfig, project: &str, stage: &str, start: &str, end: &str, actual: bool) -> Result<()> {
    let project = project_arg(project);
    validate_stage_id(stage).unwrap_or_else(|e| user_error(&e));
    let start = parse_date_expr(start).unwrap_or_else(|e| user_error(&e.to_string()));
    let end = parse_date_expr(end).unwrap_or_else(|e| user_error(&e.to_string()));
    validate_date_range(start, end).unwrap_or_else(|e| user_error(&e));

    let mut client = query_client(config)?;
    let stages = client
        .stages_overview(project)
        .with_context(|| format!("Failed to load stages for project {}", project))?;
    let stage = match stages.iter().find(|s| s.id.as_str() == stage.trim()) {
        Some(stage) => stage,
        None => user_error(&format!("Stage {} not found in project {}", stage.trim(), project)),
    };

    let mode = if actual { ScheduleMode::Actual } else { ScheduleMode::Estimate };
    let conn = LocalStore::connect(&config.data_location)?;
    let mut recorder = ChangeRecorder::new(&conn, project, mode);
    recorder.on_date_change(stage, start, end)?;

    println!(
        "Recorded {} dates for stage {} ({}): {} .. {}.",
        mode.as_str(),
        stage.id,
        stage.name,
        start,
        end
    );
    println!("Run 'pcq changes save {}' to send them.", project);
    Ok(())
}

fn handle_changes(config: &AppConfig, cmd: ChangesCommands) -> Result<()> {
    let conn = LocalStore::connect(&config.data_location)?;
    match cmd {
        ChangesCommands::List { project } => {
            let project = project_arg(&project);
            let changes = PendingChangeRepo::list(&conn, project)?;
            if changes.is_empty() {
                println!("No pending changes for project {}.", project);
            } else {
                print!("{}", format_pending_changes(&changes));
            }
            Ok(())
        }
        ChangesCommands::Save { project } => {
            let project = project_arg(&project);
            let mut client = query_client(config)?;
            let outcome = save_changes(&conn, &mut client, project)?;
            if outcome.saved.is_empty() && outcome.failed.is_empty() {
                println!("No pending changes for project {}.", project);
                return Ok(());
            }
            for stage in &outcome.saved {
                println!("Saved stage {}.", stage);
            }
            for (stage, err) in &outcome.failed {
                eprintln!("Failed to save stage {}: {}", stage, err);
            }
            if !outcome.failed.is_empty() {
                eprintln!("{} change(s) kept for the next save.", outcome.failed.len());
                return Err(Reported::internal().into());
            }
            Ok(())
        }
        ChangesCommands::Undo { project } => {
            let project = project_arg(&project);
            let mut client = query_client(config)?;
            let removed = undo_changes(&conn, &mut client, project)?;
            println!("Discarded {} pending change(s) for project {}.", removed, project);
            Ok(())
        }
    }
}

fn handle_admin_drop_table(table: &str) -> Result<()> {
    let table = TableName::parse(table)?;
    dotenvy::dotenv().ok();
    let config = DbConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime.block_on(run_drop_table(&config, &table, &mut out))?;
    Ok(())
}
