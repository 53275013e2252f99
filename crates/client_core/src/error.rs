use thiserror::Error;

/// Input rejected before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    BlankTaskName,
    #[error("please select a category")]
    MissingCategory,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("category name must not be empty")]
    BlankCategoryName,
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage failure: {0:#}")]
    Persistence(#[source] anyhow::Error),
    #[error("board controller is shut down")]
    Closed,
}

impl ControllerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ControllerError::Validation(_))
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ControllerError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
