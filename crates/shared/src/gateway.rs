//! Storage seam consumed by the board controller.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Category, NewTask, Task};

/// Durable storage for categories and tasks.
///
/// Deleting a category does not touch its tasks; cascading is the caller's
/// job. Update and delete of a missing row fail with
/// [`StoreError::NotFound`](crate::error::StoreError::NotFound), inserting an
/// existing category name fails with
/// [`StoreError::DuplicateCategory`](crate::error::StoreError::DuplicateCategory).
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// All categories, in insertion order.
    async fn all_categories(&self) -> Result<Vec<Category>>;
    async fn insert_category(&self, category: &Category) -> Result<()>;
    async fn delete_category(&self, category: &Category) -> Result<()>;
    /// All tasks, ordered by id.
    async fn all_tasks(&self) -> Result<Vec<Task>>;
    async fn tasks_by_category(&self, name: &str) -> Result<Vec<Task>>;
    async fn insert_task(&self, task: NewTask) -> Result<Task>;
    async fn update_task(&self, task: &Task) -> Result<()>;
    async fn delete_task(&self, task: &Task) -> Result<()>;
    async fn delete_tasks(&self, tasks: &[Task]) -> Result<()>;
}
