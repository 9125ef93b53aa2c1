use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum TaskPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Overdue => "overdue",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

/// Comment joined with its author's name for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskCommentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct TaskCommentInput {
    pub comment: String,
}

impl Task {
    pub fn new(input: TaskInput, assigned_by: Uuid) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority.unwrap_or(TaskPriority::Medium),
            status: TaskStatus::Pending,
            assigned_to: input.assigned_to,
            assigned_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// A task past its due date reads as Overdue unless it was completed.
    /// Derived at read time; the stored status is never rewritten for this.
    pub fn effective_status(&self, now: NaiveDateTime) -> TaskStatus {
        if self.status != TaskStatus::Completed && self.due_date < now {
            TaskStatus::Overdue
        } else {
            self.status.clone()
        }
    }

    pub fn with_effective_status(mut self, now: NaiveDateTime) -> Self {
        self.status = self.effective_status(now);
        self
    }
}
