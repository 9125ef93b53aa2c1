use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Meeting, MeetingInput, UserInfo};

const MEETING_COLUMNS: &str =
    "id, title, agenda, date, time, link, organizer_id, created_at, updated_at";

#[derive(Clone)]
pub struct MeetingRepository {
    pool: SqlitePool,
}

impl MeetingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, meeting: &Meeting, participants: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO meetings (id, title, agenda, date, time, link, organizer_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(meeting.id)
        .bind(&meeting.title)
        .bind(&meeting.agenda)
        .bind(meeting.date)
        .bind(&meeting.time)
        .bind(&meeting.link)
        .bind(meeting.organizer_id)
        .bind(meeting.created_at)
        .bind(meeting.updated_at)
        .execute(&mut *tx)
        .await?;

        for user_id in participants {
            sqlx::query(
                "INSERT OR IGNORE INTO meeting_participants (meeting_id, user_id) VALUES (?, ?)",
            )
            .bind(meeting.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>> {
        let meeting = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(meeting)
    }

    pub async fn participants(&self, meeting_id: Uuid) -> Result<Vec<UserInfo>> {
        let users = sqlx::query_as::<_, UserInfo>(
            r#"
            SELECT u.id, u.name, u.email, u.role
            FROM meeting_participants mp
            JOIN users u ON u.id = mp.user_id
            WHERE mp.meeting_id = ?
            ORDER BY u.name
            "#,
        )
        .bind(meeting_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Meetings the user organizes or is invited to, soonest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Meeting>> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT DISTINCT m.id, m.title, m.agenda, m.date, m.time, m.link,
                   m.organizer_id, m.created_at, m.updated_at
            FROM meetings m
            LEFT JOIN meeting_participants mp ON mp.meeting_id = m.id
            WHERE m.organizer_id = ?1 OR mp.user_id = ?1
            ORDER BY m.date, m.time
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    pub async fn list_all(&self) -> Result<Vec<Meeting>> {
        let meetings = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM meetings ORDER BY date, time"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    pub async fn update(&self, id: Uuid, input: &MeetingInput) -> Result<Option<Meeting>> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        let now = chrono::Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE meetings
            SET title = ?, agenda = ?, date = ?, time = ?, link = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.agenda)
        .bind(input.date)
        .bind(&input.time)
        .bind(&input.link)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM meeting_participants WHERE meeting_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for user_id in &input.participants {
            sqlx::query(
                "INSERT OR IGNORE INTO meeting_participants (meeting_id, user_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
