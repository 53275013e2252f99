//! The controller's worker: the single place requests are processed, one at a
//! time, so every reload sees the writes of all requests queued before it.

use std::sync::Arc;

use shared::{
    domain::{Category, Task, TaskId},
    error::{is_duplicate_category, is_not_found},
    gateway::PersistenceGateway,
    view::{CategoryChoice, CategoryListItem, Selection, TaskListItem},
};
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{BoardCommand, BoardRequest, Completion},
    error::{ControllerError, ValidationError},
    events::{BoardEvent, Notice},
    projection::{project_categories, project_tasks},
    validation::{validate_category_name, validate_task_input},
    BoardSettings, BoardSnapshot, FilterPolicy,
};

pub(crate) struct BoardWorker {
    gateway: Arc<dyn PersistenceGateway>,
    settings: BoardSettings,
    selection: Selection,
    /// Categories as of the last load; validation checks against these.
    categories: Vec<Category>,
    events: broadcast::Sender<BoardEvent>,
    published: Arc<RwLock<BoardSnapshot>>,
}

impl BoardWorker {
    pub(crate) fn new(
        gateway: Arc<dyn PersistenceGateway>,
        settings: BoardSettings,
        events: broadcast::Sender<BoardEvent>,
        published: Arc<RwLock<BoardSnapshot>>,
    ) -> Self {
        Self {
            gateway,
            settings,
            selection: Selection::All,
            categories: Vec::new(),
            events,
            published,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::Receiver<BoardCommand>) {
        debug!("board worker started");
        while let Some(command) = commands.recv().await {
            let (request, reply) = match command {
                BoardCommand::Request { request, reply } => (request, reply),
                BoardCommand::Shutdown => break,
            };

            let name = request.name();
            let context = request.context();
            debug!(request = name, "processing board request");
            let result = self.handle(request).await;

            if let Err(err) = &result {
                match err {
                    ControllerError::Validation(reason) => {
                        info!(request = name, %reason, "board request rejected")
                    }
                    _ => error!(request = name, error = %err, "board request failed"),
                }
                if let Some(notice) = Notice::from_error(context, err) {
                    let _ = self.events.send(BoardEvent::Notice(notice));
                }
            }
            if reply.send(result).is_err() {
                debug!(request = name, "requester went away before the reply");
            }
        }
        debug!("board worker stopped");
    }

    async fn handle(&mut self, request: BoardRequest) -> Result<Completion, ControllerError> {
        match request {
            BoardRequest::LoadCategories => self.load_categories().await?,
            BoardRequest::LoadTasks => self.load_tasks().await?,
            BoardRequest::SelectCategory(item) => return self.select_category(item).await,
            BoardRequest::CreateCategory { name } => self.create_category(&name).await?,
            BoardRequest::DeleteCategory(item) => self.delete_category(item).await?,
            BoardRequest::CreateTask { name, category } => {
                self.create_task(&name, &category).await?
            }
            BoardRequest::UpdateTask { id, name, category } => {
                self.update_task(id, &name, &category).await?
            }
            BoardRequest::DeleteTask(item) => self.delete_task(&item).await?,
        }
        Ok(Completion::Done)
    }

    async fn load_categories(&mut self) -> Result<(), ControllerError> {
        let categories = self
            .gateway
            .all_categories()
            .await
            .map_err(ControllerError::Persistence)?;

        if let Some(name) = self.selection.category_name() {
            if !categories.iter().any(|c| c.name == name) {
                debug!(category = name, "selected category is gone; selecting ALL");
                self.selection = Selection::All;
            }
        }
        self.categories = categories;
        self.publish_categories().await;
        Ok(())
    }

    async fn load_tasks(&mut self) -> Result<(), ControllerError> {
        let tasks = self.fetch_tasks(&Selection::All).await?;
        self.publish_tasks(&tasks).await;
        Ok(())
    }

    async fn select_category(
        &mut self,
        item: CategoryListItem,
    ) -> Result<Completion, ControllerError> {
        let Some(selection) = item.as_selection() else {
            debug!("add action picked; handing category creation to the surface");
            return Ok(Completion::BeginCategoryCreation);
        };

        if let Some(name) = selection.category_name() {
            if !self.is_known(name) {
                debug!(category = name, "category missing from the last load; resyncing");
                self.load_categories().await?;
                if !self.is_known(name) {
                    warn!(category = name, "selected category no longer exists");
                    self.reload_visible_tasks().await?;
                    return Ok(Completion::Filtered(self.selection.clone()));
                }
            }
        }

        // Nothing changes until the filtered tasks are in hand.
        let tasks = self.fetch_tasks(&selection).await?;
        self.selection = selection;
        self.publish_categories().await;
        self.publish_tasks(&tasks).await;
        Ok(Completion::Filtered(self.selection.clone()))
    }

    async fn create_category(&mut self, name: &str) -> Result<(), ControllerError> {
        let name = validate_category_name(name, &self.categories)?;

        match self.gateway.insert_category(&Category::new(&name)).await {
            Ok(()) => info!(category = %name, "category created"),
            Err(err) if is_duplicate_category(&err) => {
                // Someone else stored it since our last load.
                self.load_categories().await?;
                return Err(ValidationError::DuplicateCategory(name).into());
            }
            Err(err) => return Err(ControllerError::Persistence(err)),
        }
        self.load_categories().await
    }

    async fn delete_category(&mut self, item: CategoryListItem) -> Result<(), ControllerError> {
        let name = match item {
            CategoryListItem::Regular { name, .. } => name,
            other => {
                debug!(item = other.label(), "ignoring delete of a pseudo-category");
                return Ok(());
            }
        };

        let orphans = self
            .gateway
            .tasks_by_category(&name)
            .await
            .map_err(ControllerError::Persistence)?;
        self.gateway
            .delete_tasks(&orphans)
            .await
            .map_err(ControllerError::Persistence)?;
        match self.gateway.delete_category(&Category::new(&name)).await {
            Ok(()) => info!(category = %name, tasks = orphans.len(), "category deleted"),
            Err(err) if is_not_found(&err) => {
                debug!(category = %name, "category already gone");
            }
            Err(err) => return Err(ControllerError::Persistence(err)),
        }

        if self.settings.filter_policy == FilterPolicy::ResetToAll {
            self.selection = Selection::All;
        }
        self.load_categories().await?;
        self.reload_visible_tasks().await
    }

    async fn create_task(
        &mut self,
        name: &str,
        category: &CategoryChoice,
    ) -> Result<(), ControllerError> {
        let draft = validate_task_input(name, category, &self.categories)?;
        let task = self
            .gateway
            .insert_task(draft.into_new_task())
            .await
            .map_err(ControllerError::Persistence)?;
        info!(task_id = %task.id, category = %task.category, "task created");
        self.reload_tasks_after_mutation().await
    }

    async fn update_task(
        &mut self,
        id: TaskId,
        name: &str,
        category: &CategoryChoice,
    ) -> Result<(), ControllerError> {
        let draft = validate_task_input(name, category, &self.categories)?;
        match self.gateway.update_task(&draft.into_task(id)).await {
            Ok(()) => info!(task_id = %id, "task updated"),
            Err(err) if is_not_found(&err) => debug!(task_id = %id, "updated task is gone"),
            Err(err) => return Err(ControllerError::Persistence(err)),
        }
        self.reload_tasks_after_mutation().await
    }

    async fn delete_task(&mut self, item: &TaskListItem) -> Result<(), ControllerError> {
        match self.gateway.delete_task(&Task::from(item)).await {
            Ok(()) => info!(task_id = %item.id, "task deleted"),
            Err(err) if is_not_found(&err) => debug!(task_id = %item.id, "task already gone"),
            Err(err) => return Err(ControllerError::Persistence(err)),
        }
        self.reload_tasks_after_mutation().await
    }

    /// Task mutations return to the unfiltered list unless configured to keep
    /// the active filter.
    async fn reload_tasks_after_mutation(&mut self) -> Result<(), ControllerError> {
        if self.settings.filter_policy == FilterPolicy::ResetToAll
            && self.selection != Selection::All
        {
            self.selection = Selection::All;
            self.publish_categories().await;
        }
        self.reload_visible_tasks().await
    }

    async fn reload_visible_tasks(&mut self) -> Result<(), ControllerError> {
        let tasks = self.fetch_tasks(&self.selection).await?;
        self.publish_tasks(&tasks).await;
        Ok(())
    }

    async fn fetch_tasks(&self, selection: &Selection) -> Result<Vec<Task>, ControllerError> {
        match selection {
            Selection::All => self.gateway.all_tasks().await,
            Selection::Category(name) => self.gateway.tasks_by_category(name).await,
        }
        .map_err(ControllerError::Persistence)
    }

    fn is_known(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    async fn publish_categories(&self) {
        let list = project_categories(&self.categories, &self.selection);
        self.published.write().await.categories = list.clone();
        let _ = self.events.send(BoardEvent::CategoriesChanged(list));
    }

    async fn publish_tasks(&self, tasks: &[Task]) {
        let rows = project_tasks(tasks);
        self.published.write().await.tasks = rows.clone();
        let _ = self.events.send(BoardEvent::TasksChanged(rows));
    }
}
