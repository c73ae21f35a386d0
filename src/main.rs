use clap::{Arg, ArgMatches, Command};
use color_eyre::Result;
use std::{fmt::Display, str::FromStr, sync::Arc, time::Duration};

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{
    api::{HttpTaskRepository, TaskApiClient},
    config::FileConfigStore,
    tui::{run_tui, App},
};
use application::{StateManager, TaskService};
use domain::{today, NewTask, Priority, TaskFilter, TaskId, TaskStatus};
use ports::{AppConfig, ConfigStore};

fn build_cli() -> Command {
    Command::new("task-manager-cli")
        .version("0.1.0")
        .about("A terminal client for a task manager REST API")
        .long_about(
            "Create, filter, cycle and delete tasks stored behind a task manager REST API.\n\n\
             Run without a subcommand to open the interactive interface.",
        )
        .arg(
            Arg::new("api-base")
                .long("api-base")
                .value_name("URL")
                .env("TASK_API_BASE")
                .help("Base URL of the task API (overrides the config file)")
                .global(true),
        )
        .subcommand(
            Command::new("tasks")
                .about("Task operations")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List tasks as JSON")
                        .arg(
                            Arg::new("filter")
                                .long("filter")
                                .short('f')
                                .value_name("FILTER")
                                .value_parser(TaskFilter::ALL.map(TaskFilter::as_str))
                                .help("Only show tasks matching this filter"),
                        ),
                )
                .subcommand(
                    Command::new("add")
                        .about("Create a task")
                        .arg(
                            Arg::new("title")
                                .long("title")
                                .short('t')
                                .value_name("TITLE")
                                .required(true),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .value_name("TEXT"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .value_parser(TaskStatus::ALL.map(TaskStatus::as_str))
                                .default_value("pending"),
                        )
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .value_parser(Priority::ALL.map(Priority::as_str))
                                .default_value("medium"),
                        )
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .value_name("YYYY-MM-DD")
                                .help("Due date"),
                        ),
                )
                .subcommand(
                    Command::new("cycle")
                        .about("Advance a task's status: pending → in_progress → done → pending")
                        .arg(
                            Arg::new("task_id")
                                .help("Task ID")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a task")
                        .arg(
                            Arg::new("task_id")
                                .help("Task ID")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("stats").about("Show total, completed and progress as JSON"),
                ),
        )
}

/// `--api-base` (or `TASK_API_BASE`, via clap) wins over the config file.
fn resolve_config(mut config: AppConfig, matches: &ArgMatches) -> AppConfig {
    if let Some(api_base) = matches.get_one::<String>("api-base") {
        config.api_base = api_base.clone();
    }
    config
}

fn init_logging(config: &AppConfig) -> Result<()> {
    // Log to a file so the TUI owns the terminal.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let level = tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(level)
        .init();

    Ok(())
}

fn fail(context: &str, error: impl Display) -> ! {
    eprintln!("❌ {context}: {error}");
    std::process::exit(1);
}

fn parse_or_fail<T: FromStr>(context: &str, raw: &str) -> T
where
    T::Err: Display,
{
    raw.parse::<T>().unwrap_or_else(|e| fail(context, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let matches = build_cli().get_matches();

    // Load configuration
    let config_store = FileConfigStore::new()?;
    let config = config_store.load_config().await?;

    init_logging(&config)?;

    if let Err(e) = config_store.init_defaults().await {
        tracing::warn!(
            "Failed to write default config to {}: {}",
            config_store.path().display(),
            e
        );
    }

    let config = resolve_config(config, &matches);
    tracing::info!("Using task API at {}", config.api_base);

    // Create dependencies
    let api_client = TaskApiClient::new(
        config.api_base.clone(),
        config.request_timeout_secs.map(Duration::from_secs),
    )?;
    let task_repo = Arc::new(HttpTaskRepository::new(api_client));
    let task_service = Arc::new(TaskService::new(task_repo));
    let state_manager = Arc::new(
        StateManager::new(task_service, config.api_base.clone()).with_filter(config.default_filter),
    );

    match matches.subcommand() {
        Some(("tasks", tasks_matches)) => match tasks_matches.subcommand() {
            Some(("list", list_matches)) => {
                if let Some(filter) = list_matches.get_one::<String>("filter") {
                    state_manager
                        .set_filter(parse_or_fail::<TaskFilter>("Invalid filter", filter))
                        .await;
                }
                if let Err(e) = state_manager.load_tasks().await {
                    fail(&state_manager.load_failed_message(), e);
                }

                let tasks = state_manager.visible_tasks(today()).await;
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            }
            Some(("add", add_matches)) => {
                let get = |name: &str| {
                    add_matches
                        .get_one::<String>(name)
                        .map(String::as_str)
                        .unwrap_or_default()
                };

                let new_task = NewTask::from_form(
                    get("title"),
                    get("description"),
                    parse_or_fail::<TaskStatus>("Invalid status", get("status")),
                    parse_or_fail::<Priority>("Invalid priority", get("priority")),
                    get("due"),
                )
                .unwrap_or_else(|e| fail("Invalid task", e));

                let title = new_task.title.clone();
                if let Err(e) = state_manager.add_task(new_task).await {
                    fail("Failed to create task", e);
                }
                println!("✅ Created task {title:?}");
            }
            Some(("cycle", cycle_matches)) => {
                let raw_id = cycle_matches
                    .get_one::<String>("task_id")
                    .map(String::as_str)
                    .unwrap_or_default();
                let id = parse_or_fail::<TaskId>("Invalid task id", raw_id);

                if let Err(e) = state_manager.load_tasks().await {
                    fail(&state_manager.load_failed_message(), e);
                }
                if let Err(e) = state_manager.cycle_status(&id).await {
                    fail("Failed to update task", e);
                }

                let snapshot = state_manager.snapshot().await;
                match snapshot.iter().find(|t| t.id == id) {
                    Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
                    None => println!("✅ Updated task {id}"),
                }
            }
            Some(("delete", delete_matches)) => {
                let raw_id = delete_matches
                    .get_one::<String>("task_id")
                    .map(String::as_str)
                    .unwrap_or_default();
                let id = parse_or_fail::<TaskId>("Invalid task id", raw_id);

                if let Err(e) = state_manager.delete_task(&id).await {
                    fail("Failed to delete task", e);
                }
                println!("✅ Deleted task {id}");
            }
            Some(("stats", _)) => {
                if let Err(e) = state_manager.load_tasks().await {
                    fail(&state_manager.load_failed_message(), e);
                }
                let stats = state_manager.stats().await;
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            _ => fail("Unknown tasks subcommand", "see --help"),
        },
        None => {
            // Default behavior - run TUI
            let app = App::new(state_manager);

            if let Err(e) = run_tui(app).await {
                eprintln!("❌ Application error: {e}");
                std::process::exit(1);
            }
        }
        _ => fail("Unknown command", "see --help"),
    }

    Ok(())
}
