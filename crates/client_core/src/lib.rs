use std::{str::FromStr, sync::Arc};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::{
    domain::TaskId,
    gateway::PersistenceGateway,
    view::{CategoryChoice, CategoryList, CategoryListItem, Selection, TaskListItem},
};
use storage::Storage;
use tokio::{
    sync::{broadcast, mpsc, oneshot, Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{debug, info};

mod commands;
pub mod error;
pub mod events;
pub mod projection;
pub mod validation;
mod worker;

use commands::{BoardCommand, BoardRequest, Completion};
pub use error::{ControllerError, ValidationError};
pub use events::{BoardEvent, Notice, NoticeContext, NoticeKind};
use worker::BoardWorker;

const DEFAULT_QUEUE_CAPACITY: usize = 64;
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// What happens to the category filter after a task is created, updated or
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Show every task again and select ALL; the category strip is
    /// republished with ALL highlighted.
    #[default]
    ResetToAll,
    /// Keep the active filter and reload it.
    Reapply,
}

impl FromStr for FilterPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reset_to_all" | "reset" => Ok(FilterPolicy::ResetToAll),
            "reapply" | "keep" => Ok(FilterPolicy::Reapply),
            other => Err(anyhow::anyhow!(
                "unknown filter policy '{other}' (expected reset_to_all or reapply)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub filter_policy: FilterPolicy,
    pub queue_capacity: usize,
    pub event_capacity: usize,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            filter_policy: FilterPolicy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// The lists most recently published to the surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub categories: CategoryList,
    pub tasks: Vec<TaskListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The filter is applied and both lists were republished.
    Filtered(Selection),
    /// The add action was picked; the surface should ask for a new category
    /// name and call [`BoardController::create_category`].
    BeginCategoryCreation,
}

/// Owns category selection, talks to storage and publishes the category strip
/// and the visible task list.
///
/// Requests are processed one at a time by a worker task owned by the
/// controller, and each call resolves after its lists were published.
/// Dropping the controller aborts the worker; [`BoardController::shutdown`]
/// lets queued requests finish first.
pub struct BoardController {
    commands: mpsc::Sender<BoardCommand>,
    events: broadcast::Sender<BoardEvent>,
    published: Arc<RwLock<BoardSnapshot>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BoardController {
    /// Spawns the worker without loading anything. Must be called from
    /// within a tokio runtime.
    pub fn start(gateway: Arc<dyn PersistenceGateway>, settings: BoardSettings) -> Self {
        let (commands, command_rx) = mpsc::channel(settings.queue_capacity.max(1));
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        let published = Arc::new(RwLock::new(BoardSnapshot::default()));
        let worker = BoardWorker::new(gateway, settings, events.clone(), Arc::clone(&published));
        let handle = tokio::spawn(worker.run(command_rx));
        Self {
            commands,
            events,
            published,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Starts the controller and loads both lists, the way the board looks
    /// when first opened.
    pub async fn open(
        gateway: Arc<dyn PersistenceGateway>,
        settings: BoardSettings,
    ) -> Result<Self, ControllerError> {
        let controller = Self::start(gateway, settings);
        controller.load_categories().await?;
        controller.load_tasks().await?;
        Ok(controller)
    }

    pub async fn open_sqlite(
        database_url: &str,
        settings: BoardSettings,
    ) -> Result<Self, ControllerError> {
        let storage = Storage::new(database_url)
            .await
            .with_context(|| format!("failed to open board storage at '{database_url}'"))
            .map_err(ControllerError::Persistence)?;
        info!(%database_url, "board storage ready");
        Self::open(Arc::new(storage), settings).await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.published.read().await.clone()
    }

    pub async fn task_form_choices(&self) -> Vec<CategoryChoice> {
        projection::task_form_choices(&self.published.read().await.categories)
    }

    pub async fn load_categories(&self) -> Result<(), ControllerError> {
        self.request(BoardRequest::LoadCategories).await.map(drop)
    }

    pub async fn load_tasks(&self) -> Result<(), ControllerError> {
        self.request(BoardRequest::LoadTasks).await.map(drop)
    }

    pub async fn select_category(
        &self,
        item: CategoryListItem,
    ) -> Result<SelectOutcome, ControllerError> {
        match self.request(BoardRequest::SelectCategory(item)).await? {
            Completion::BeginCategoryCreation => Ok(SelectOutcome::BeginCategoryCreation),
            Completion::Filtered(selection) => Ok(SelectOutcome::Filtered(selection)),
            Completion::Done => Ok(SelectOutcome::Filtered(Selection::All)),
        }
    }

    pub async fn create_category(&self, name: impl Into<String>) -> Result<(), ControllerError> {
        self.request(BoardRequest::CreateCategory { name: name.into() })
            .await
            .map(drop)
    }

    /// Deletes the category and every task in it. Pseudo-categories are
    /// ignored. The surface is expected to have confirmed with the user.
    pub async fn delete_category(&self, item: CategoryListItem) -> Result<(), ControllerError> {
        self.request(BoardRequest::DeleteCategory(item))
            .await
            .map(drop)
    }

    pub async fn create_task(
        &self,
        name: impl Into<String>,
        category: CategoryChoice,
    ) -> Result<(), ControllerError> {
        self.request(BoardRequest::CreateTask {
            name: name.into(),
            category,
        })
        .await
        .map(drop)
    }

    pub async fn update_task(
        &self,
        id: TaskId,
        name: impl Into<String>,
        category: CategoryChoice,
    ) -> Result<(), ControllerError> {
        self.request(BoardRequest::UpdateTask {
            id,
            name: name.into(),
            category,
        })
        .await
        .map(drop)
    }

    pub async fn delete_task(&self, task: TaskListItem) -> Result<(), ControllerError> {
        self.request(BoardRequest::DeleteTask(task)).await.map(drop)
    }

    /// Lets already queued requests finish, then stops the worker. Later
    /// requests fail with [`ControllerError::Closed`].
    pub async fn shutdown(&self) {
        let Some(worker) = self.worker.lock().await.take() else {
            return;
        };
        if self.commands.send(BoardCommand::Shutdown).await.is_err() {
            debug!("board worker already stopped");
        }
        if let Err(err) = worker.await {
            debug!("board worker ended abnormally: {err}");
        }
    }

    async fn request(&self, request: BoardRequest) -> Result<Completion, ControllerError> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(BoardCommand::Request { request, reply })
            .await
            .map_err(|_| ControllerError::Closed)?;
        reply_rx.await.map_err(|_| ControllerError::Closed)?
    }
}

impl Drop for BoardController {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
