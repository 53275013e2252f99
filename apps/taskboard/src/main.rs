use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    BoardController, BoardEvent, BoardSnapshot, ControllerError, SelectOutcome,
};
use shared::{
    domain::TaskId,
    view::{CategoryChoice, CategoryListItem},
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_database_url, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Tasks grouped by category")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    database_url: Option<String>,
    /// Print the board as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all categories and tasks.
    Show,
    /// Show only the tasks of one category.
    Select {
        #[arg(required_unless_present = "all")]
        category: Option<String>,
        #[arg(long, conflicts_with = "category")]
        all: bool,
    },
    AddCategory {
        name: String,
    },
    /// Delete a category together with all of its tasks.
    DeleteCategory {
        name: String,
        #[arg(long)]
        yes: bool,
    },
    AddTask {
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
    UpdateTask {
        id: i64,
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
    DeleteTask {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(database_url) = &cli.database_url {
        settings.database_url = database_url.clone();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let database_url = normalize_database_url(&settings.database_url);
    info!(%database_url, policy = ?settings.filter_policy, "opening board");
    let controller = BoardController::open_sqlite(&database_url, settings.board())
        .await
        .map_err(|err| anyhow!("failed to open board: {err}"))?;
    let mut events = controller.subscribe_events();

    let result = run(&controller, cli.command).await;
    print_notices(&mut events);
    let snapshot = controller.snapshot().await;
    controller.shutdown().await;

    result?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::board(&snapshot));
    }
    Ok(())
}

async fn run(controller: &BoardController, command: Command) -> Result<()> {
    match command {
        Command::Show => {}
        Command::Select { category, all } => {
            let snapshot = controller.snapshot().await;
            let item = match category {
                Some(name) if !all => find_category(&snapshot, &name)?,
                _ => CategoryListItem::AllFilter { selected: false },
            };
            match controller.select_category(item).await.map_err(failed)? {
                SelectOutcome::Filtered(selection) => debug!(?selection, "filter applied"),
                SelectOutcome::BeginCategoryCreation => {
                    println!("Use `taskboard add-category <name>` to create a category.")
                }
            }
        }
        Command::AddCategory { name } => {
            controller.create_category(name).await.map_err(failed)?;
        }
        Command::DeleteCategory { name, yes } => {
            let item = find_category(&controller.snapshot().await, &name)?;
            if !yes {
                bail!("deleting '{name}' also deletes its tasks; pass --yes to confirm");
            }
            controller.delete_category(item).await.map_err(failed)?;
        }
        Command::AddTask { name, category } => {
            controller
                .create_task(name, CategoryChoice::from(category))
                .await
                .map_err(failed)?;
        }
        Command::UpdateTask { id, name, category } => {
            controller
                .update_task(TaskId(id), name, CategoryChoice::from(category))
                .await
                .map_err(failed)?;
        }
        Command::DeleteTask { id } => {
            let snapshot = controller.snapshot().await;
            let Some(task) = snapshot.tasks.into_iter().find(|t| t.id == TaskId(id)) else {
                bail!("no task with id {id}");
            };
            controller.delete_task(task).await.map_err(failed)?;
        }
    }
    Ok(())
}

fn find_category(snapshot: &BoardSnapshot, name: &str) -> Result<CategoryListItem> {
    snapshot
        .categories
        .find_regular(name)
        .cloned()
        .ok_or_else(|| anyhow!("no category named '{name}'"))
}

/// The notice has already been printed; keep the error short.
fn failed(err: ControllerError) -> anyhow::Error {
    match err {
        ControllerError::Validation(reason) => anyhow!("{reason}"),
        other => anyhow!(other),
    }
}

fn print_notices(events: &mut broadcast::Receiver<BoardEvent>) {
    loop {
        match events.try_recv() {
            Ok(BoardEvent::Notice(notice)) => eprintln!("{}", render::notice(&notice)),
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "missed board events"),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
