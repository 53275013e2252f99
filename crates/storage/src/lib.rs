use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{Category, NewTask, Task, TaskId},
    error::{EntityKind, StoreError},
    gateway::PersistenceGateway,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        // Every connection to an in-memory url opens its own empty database.
        let max_connections = if is_in_memory(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for Storage {
    async fn all_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT name FROM categories ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .context("failed to list categories")?;
        Ok(rows
            .into_iter()
            .map(|r| Category::new(r.get::<String, _>(0)))
            .collect())
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
        )
        .bind(&category.name)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert category '{}'", category.name))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateCategory(category.name.clone()).into());
        }
        Ok(())
    }

    async fn delete_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE name = ?")
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete category '{}'", category.name))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Category, &category.name).into());
        }
        Ok(())
    }

    async fn all_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query("SELECT id, name, category FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed to list tasks")?;
        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn tasks_by_category(&self, name: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, name, category FROM tasks WHERE category = ? ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed to list tasks for category '{name}'"))?;
        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task> {
        let rec = sqlx::query("INSERT INTO tasks (name, category) VALUES (?, ?) RETURNING id")
            .bind(&task.name)
            .bind(&task.category)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to insert task '{}'", task.name))?;
        Ok(task.with_id(TaskId(rec.get::<i64, _>(0))))
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET name = ?, category = ? WHERE id = ?")
            .bind(&task.name)
            .bind(&task.category)
            .bind(task.id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update task {}", task.id))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Task, task.id.to_string()).into());
        }
        Ok(())
    }

    async fn delete_task(&self, task: &Task) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task.id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete task {}", task.id))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Task, task.id.to_string()).into());
        }
        Ok(())
    }

    async fn delete_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for task in tasks {
            sqlx::query("DELETE FROM tasks WHERE id = ?")
                .bind(task.id.0)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to delete task {}", task.id))?;
        }
        tx.commit().await.context("failed to commit task batch delete")?;
        Ok(())
    }
}

fn task_from_row(row: &SqliteRow) -> Task {
    Task {
        id: TaskId(row.get::<i64, _>("id")),
        name: row.get::<String, _>("name"),
        category: row.get::<String, _>("category"),
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
