use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{NoticePeriod, NoticePeriodUpdate, NoticeStatus};

const NOTICE_COLUMNS: &str = r#"
    id, employee_id, resignation_date, notice_period_days, last_working_day,
    reason, status, early_release_requested, early_release_reason,
    handover_completed, exit_interview_scheduled, clearance_it, clearance_hr,
    clearance_finance, clearance_admin, comments, created_at, updated_at
"#;

#[derive(Clone)]
pub struct NoticePeriodRepository {
    pool: SqlitePool,
}

impl NoticePeriodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, notice: &NoticePeriod) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notice_periods (
                id, employee_id, resignation_date, notice_period_days,
                last_working_day, reason, status, early_release_requested,
                early_release_reason, handover_completed,
                exit_interview_scheduled, clearance_it, clearance_hr,
                clearance_finance, clearance_admin, comments, created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(notice.id)
        .bind(notice.employee_id)
        .bind(notice.resignation_date)
        .bind(notice.notice_period_days)
        .bind(notice.last_working_day)
        .bind(&notice.reason)
        .bind(&notice.status)
        .bind(notice.early_release_requested)
        .bind(&notice.early_release_reason)
        .bind(notice.handover_completed)
        .bind(notice.exit_interview_scheduled)
        .bind(notice.clearance_it)
        .bind(notice.clearance_hr)
        .bind(notice.clearance_finance)
        .bind(notice.clearance_admin)
        .bind(&notice.comments)
        .bind(notice.created_at)
        .bind(notice.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NoticePeriod>> {
        let notice = sqlx::query_as::<_, NoticePeriod>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notice_periods WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notice)
    }

    /// An employee has at most one notice in flight (pending or approved).
    pub async fn find_active_for_employee(&self, employee_id: Uuid) -> Result<Option<NoticePeriod>> {
        let notice = sqlx::query_as::<_, NoticePeriod>(&format!(
            r#"
            SELECT {NOTICE_COLUMNS}
            FROM notice_periods
            WHERE employee_id = ?1 AND status IN (?2, ?3)
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(employee_id)
        .bind(NoticeStatus::Pending)
        .bind(NoticeStatus::Approved)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notice)
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<NoticePeriod>> {
        let notices = sqlx::query_as::<_, NoticePeriod>(&format!(
            r#"
            SELECT {NOTICE_COLUMNS}
            FROM notice_periods
            WHERE employee_id = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notices)
    }

    pub async fn list_all(&self) -> Result<Vec<NoticePeriod>> {
        let notices = sqlx::query_as::<_, NoticePeriod>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notice_periods ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(notices)
    }

    pub async fn update(&self, id: Uuid, update: &NoticePeriodUpdate) -> Result<Option<NoticePeriod>> {
        let existing = match self.find_by_id(id).await? {
            Some(n) => n,
            None => return Ok(None),
        };

        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE notice_periods
            SET status = ?, handover_completed = ?, exit_interview_scheduled = ?,
                clearance_it = ?, clearance_hr = ?, clearance_finance = ?,
                clearance_admin = ?, comments = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.status.as_ref().unwrap_or(&existing.status))
        .bind(update.handover_completed.unwrap_or(existing.handover_completed))
        .bind(
            update
                .exit_interview_scheduled
                .unwrap_or(existing.exit_interview_scheduled),
        )
        .bind(update.clearance_it.unwrap_or(existing.clearance_it))
        .bind(update.clearance_hr.unwrap_or(existing.clearance_hr))
        .bind(update.clearance_finance.unwrap_or(existing.clearance_finance))
        .bind(update.clearance_admin.unwrap_or(existing.clearance_admin))
        .bind(update.comments.as_ref().or(existing.comments.as_ref()))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notice_periods WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
