//! Events published to the presentation surface, and failure notices.

use serde::Serialize;
use shared::view::{CategoryList, TaskListItem};

use crate::error::ControllerError;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    CategoriesChanged(CategoryList),
    TasksChanged(Vec<TaskListItem>),
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Shown inline next to the action that was rejected.
    Validation,
    /// Generic failure; the lists on screen stay as they were.
    Persistence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeContext {
    LoadCategories,
    LoadTasks,
    SelectCategory,
    CreateCategory,
    DeleteCategory,
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl NoticeContext {
    fn action(self) -> &'static str {
        match self {
            NoticeContext::LoadCategories => "load categories",
            NoticeContext::LoadTasks => "load tasks",
            NoticeContext::SelectCategory => "filter tasks",
            NoticeContext::CreateCategory => "create the category",
            NoticeContext::DeleteCategory => "delete the category",
            NoticeContext::CreateTask => "create the task",
            NoticeContext::UpdateTask => "update the task",
            NoticeContext::DeleteTask => "delete the task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    kind: NoticeKind,
    context: NoticeContext,
    message: String,
}

impl Notice {
    /// `None` for errors the user never sees (a closed controller has no
    /// surface left to show anything on).
    pub fn from_error(context: NoticeContext, err: &ControllerError) -> Option<Self> {
        match err {
            ControllerError::Validation(validation) => Some(Self {
                kind: NoticeKind::Validation,
                context,
                message: validation.to_string(),
            }),
            ControllerError::Persistence(_) => Some(Self {
                kind: NoticeKind::Persistence,
                context,
                message: format!("Could not {}. Please try again.", context.action()),
            }),
            ControllerError::Closed => None,
        }
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn context(&self) -> NoticeContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
