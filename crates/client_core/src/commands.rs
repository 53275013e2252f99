//! Requests queued from the controller handle to its worker.

use shared::{
    domain::TaskId,
    view::{CategoryChoice, CategoryListItem, Selection, TaskListItem},
};
use tokio::sync::oneshot;

use crate::{error::ControllerError, events::NoticeContext};

pub(crate) enum BoardRequest {
    LoadCategories,
    LoadTasks,
    SelectCategory(CategoryListItem),
    CreateCategory {
        name: String,
    },
    DeleteCategory(CategoryListItem),
    CreateTask {
        name: String,
        category: CategoryChoice,
    },
    UpdateTask {
        id: TaskId,
        name: String,
        category: CategoryChoice,
    },
    DeleteTask(TaskListItem),
}

impl BoardRequest {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            BoardRequest::LoadCategories => "load_categories",
            BoardRequest::LoadTasks => "load_tasks",
            BoardRequest::SelectCategory(_) => "select_category",
            BoardRequest::CreateCategory { .. } => "create_category",
            BoardRequest::DeleteCategory(_) => "delete_category",
            BoardRequest::CreateTask { .. } => "create_task",
            BoardRequest::UpdateTask { .. } => "update_task",
            BoardRequest::DeleteTask(_) => "delete_task",
        }
    }

    pub(crate) fn context(&self) -> NoticeContext {
        match self {
            BoardRequest::LoadCategories => NoticeContext::LoadCategories,
            BoardRequest::LoadTasks => NoticeContext::LoadTasks,
            BoardRequest::SelectCategory(_) => NoticeContext::SelectCategory,
            BoardRequest::CreateCategory { .. } => NoticeContext::CreateCategory,
            BoardRequest::DeleteCategory(_) => NoticeContext::DeleteCategory,
            BoardRequest::CreateTask { .. } => NoticeContext::CreateTask,
            BoardRequest::UpdateTask { .. } => NoticeContext::UpdateTask,
            BoardRequest::DeleteTask(_) => NoticeContext::DeleteTask,
        }
    }
}

/// What a processed request asks of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Completion {
    Done,
    Filtered(Selection),
    BeginCategoryCreation,
}

pub(crate) type Reply = oneshot::Sender<Result<Completion, ControllerError>>;

pub(crate) enum BoardCommand {
    Request { request: BoardRequest, reply: Reply },
    Shutdown,
}
