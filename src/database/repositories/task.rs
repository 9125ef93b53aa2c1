use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Task, TaskComment, TaskCommentView, TaskPriority, TaskStatus, TaskUpdate};

const TASK_COLUMNS: &str = r#"
    id, title, description, due_date, priority, status, assigned_to,
    assigned_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, due_date, priority, status,
                assigned_to, assigned_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(&task.priority)
        .bind(&task.status)
        .bind(task.assigned_to)
        .bind(task.assigned_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn list(
        &self,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        assigned_to: Option<Uuid>,
    ) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR priority = ?2)
              AND (?3 IS NULL OR assigned_to = ?3)
            ORDER BY due_date
            "#
        ))
        .bind(status)
        .bind(priority)
        .bind(assigned_to)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn list_for_assignee(&self, assigned_to: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE assigned_to = ?
            ORDER BY due_date
            "#
        ))
        .bind(assigned_to)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Applies every provided field; absent fields keep their value.
    pub async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<Option<Task>> {
        let existing = match self.find_by_id(id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, due_date = ?, priority = ?,
                status = ?, assigned_to = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.title.as_ref().unwrap_or(&existing.title))
        .bind(update.description.as_ref().unwrap_or(&existing.description))
        .bind(update.due_date.unwrap_or(existing.due_date))
        .bind(update.priority.as_ref().unwrap_or(&existing.priority))
        .bind(update.status.as_ref().unwrap_or(&existing.status))
        .bind(update.assigned_to.unwrap_or(existing.assigned_to))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    pub async fn update_status(&self, id: Uuid, status: &TaskStatus) -> Result<Option<Task>> {
        let now = chrono::Utc::now().naive_utc();
        sqlx::query("UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn add_comment(&self, comment: &TaskComment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO task_comments (id, task_id, user_id, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id)
        .bind(comment.task_id)
        .bind(comment.user_id)
        .bind(&comment.comment)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn comments(&self, task_id: Uuid) -> Result<Vec<TaskCommentView>> {
        let comments = sqlx::query_as::<_, TaskCommentView>(
            r#"
            SELECT c.id, c.user_id, u.name AS author_name, c.comment, c.created_at
            FROM task_comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.task_id = ?
            ORDER BY c.created_at
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
