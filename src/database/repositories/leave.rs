use anyhow::Result;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::database::models::{LeaveRequest, LeaveStatus};

const LEAVE_COLUMNS: &str = r#"
    id, employee_id, start_date, end_date, leave_type, reason, status,
    approved_by, notes, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: SqlitePool,
}

impl LeaveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, leave: &LeaveRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leave_requests (
                id, employee_id, start_date, end_date, leave_type, reason,
                status, approved_by, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(leave.id)
        .bind(leave.employee_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.leave_type)
        .bind(&leave.reason)
        .bind(&leave.status)
        .bind(leave.approved_by)
        .bind(&leave.notes)
        .bind(leave.created_at)
        .bind(leave.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }

    /// Transaction-scoped lookup, used while deciding so the decision and
    /// the ledger reconciliation see the same row.
    pub async fn find_by_id_in(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> Result<Option<LeaveRequest>> {
        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(leave)
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE employee_id = ?
            ORDER BY start_date DESC
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    pub async fn list_all(&self, status: Option<LeaveStatus>) -> Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY start_date DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    pub async fn record_decision(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        status: &LeaveStatus,
        approved_by: Uuid,
        notes: Option<&str>,
    ) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, approved_by = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(approved_by)
        .bind(notes)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(())
    }
}
