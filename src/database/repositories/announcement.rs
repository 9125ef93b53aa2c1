use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Announcement, AnnouncementInput, AnnouncementVisibility};

const ANNOUNCEMENT_COLUMNS: &str = r#"
    id, title, description, category, priority, visibility, scheduled_date,
    created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: SqlitePool,
}

impl AnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, announcement: &Announcement) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, description, category, priority, visibility,
                scheduled_date, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.description)
        .bind(&announcement.category)
        .bind(&announcement.priority)
        .bind(&announcement.visibility)
        .bind(announcement.scheduled_date)
        .bind(announcement.created_by)
        .bind(announcement.created_at)
        .bind(announcement.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Newest first. Non-admin callers only see rows visible to everyone.
    pub async fn list(&self, include_managers_only: bool) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            SELECT {ANNOUNCEMENT_COLUMNS}
            FROM announcements
            WHERE (?1 OR visibility = ?2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(include_managers_only)
        .bind(AnnouncementVisibility::AllEmployees)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }

    /// Case-insensitive title substring search.
    pub async fn search(&self, query: &str, include_managers_only: bool) -> Result<Vec<Announcement>> {
        let pattern = format!("%{}%", query);
        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            SELECT {ANNOUNCEMENT_COLUMNS}
            FROM announcements
            WHERE title LIKE ?1
              AND (?2 OR visibility = ?3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(pattern)
        .bind(include_managers_only)
        .bind(AnnouncementVisibility::AllEmployees)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }

    pub async fn update(&self, id: Uuid, input: AnnouncementInput) -> Result<Option<Announcement>> {
        let existing = match self.find_by_id(id).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, description = ?, category = ?, priority = ?,
                visibility = ?, scheduled_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category.unwrap_or(existing.category))
        .bind(input.priority.unwrap_or(existing.priority))
        .bind(input.visibility.unwrap_or(existing.visibility))
        .bind(input.scheduled_date.or(existing.scheduled_date))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
