use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category,
    Task,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Category => f.write_str("category"),
            EntityKind::Task => f.write_str("task"),
        }
    }
}

/// Typed failures a gateway attaches to its `anyhow::Error` so callers can
/// tell "already gone" and "already there" apart from backend faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
}

impl StoreError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Finds a `StoreError` anywhere in the chain, so context added on top of
    /// the typed error does not hide it.
    pub fn find(err: &anyhow::Error) -> Option<&StoreError> {
        err.chain().find_map(|cause| cause.downcast_ref::<StoreError>())
    }
}

pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(StoreError::find(err), Some(StoreError::NotFound { .. }))
}

pub fn is_duplicate_category(err: &anyhow::Error) -> bool {
    matches!(StoreError::find(err), Some(StoreError::DuplicateCategory(_)))
}
