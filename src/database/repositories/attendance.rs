use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::database::models::{AttendanceRecord, AttendanceStatus, LeaveRequest};

const ATTENDANCE_COLUMNS: &str = r#"
    id, employee_id, date, clock_in, clock_out, status, working_hours,
    notes, ip_address, location, source_leave_id, created_at, updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a clock-in row. The UNIQUE (employee_id, date) index is the
    /// race guard; callers inspect the returned error for a constraint
    /// violation rather than trusting any prior lookup.
    pub async fn insert_clock_in(&self, record: &AttendanceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance (
                id, employee_id, date, clock_in, clock_out, status, working_hours,
                notes, ip_address, location, source_leave_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(record.employee_id)
        .bind(record.date)
        .bind(record.clock_in)
        .bind(record.clock_out)
        .bind(&record.status)
        .bind(record.working_hours)
        .bind(&record.notes)
        .bind(&record.ip_address)
        .bind(&record.location)
        .bind(record.source_leave_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?"
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// An open session has a clock-in and no clock-out. Leave rows carry a
    /// null clock_in and never match.
    pub async fn find_open_session(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE employee_id = ? AND date = ?
              AND clock_in IS NOT NULL AND clock_out IS NULL
            "#
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn complete_session(
        &self,
        id: Uuid,
        clock_out: NaiveDateTime,
        working_hours: f64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE attendance
            SET clock_out = ?, working_hours = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(clock_out)
        .bind(working_hours)
        .bind(&status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("attendance record {} vanished during clock-out", id))
    }

    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE employee_id = ?1
              AND (?2 IS NULL OR date >= ?2)
              AND (?3 IS NULL OR date <= ?3)
            ORDER BY date DESC
            "#
        ))
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_all(
        &self,
        employee_id: Option<Uuid>,
        status: Option<AttendanceStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE (?1 IS NULL OR employee_id = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR date >= ?3)
              AND (?4 IS NULL OR date <= ?4)
            ORDER BY date DESC
            "#
        ))
        .bind(employee_id)
        .bind(status)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Claims one day of an approved leave inside the caller's transaction.
    /// Inserts an on-leave row, or on conflict with an existing row for that
    /// day overwrites only status, notes and the leave back-reference —
    /// recorded clock times stay untouched. Re-running is a no-op change,
    /// which is what makes approval idempotent.
    pub async fn upsert_leave_day(
        &self,
        conn: &mut SqliteConnection,
        leave: &LeaveRequest,
        day: NaiveDate,
    ) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        sqlx::query(
            r#"
            INSERT INTO attendance (
                id, employee_id, date, clock_in, clock_out, status, working_hours,
                notes, ip_address, location, source_leave_id, created_at, updated_at
            )
            VALUES (?, ?, ?, NULL, NULL, ?, NULL, ?, NULL, NULL, ?, ?, ?)
            ON CONFLICT (employee_id, date) DO UPDATE SET
                status = excluded.status,
                notes = excluded.notes,
                source_leave_id = excluded.source_leave_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(leave.employee_id)
        .bind(day)
        .bind(AttendanceStatus::OnLeave)
        .bind(leave.ledger_note())
        .bind(leave.id)
        .bind(now)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Removes the on-leave rows a specific leave's approval created or
    /// claimed. Scoped by the leave back-reference, so unrelated on-leave
    /// rows in the same window survive.
    pub async fn delete_leave_days(
        &self,
        conn: &mut SqliteConnection,
        leave: &LeaveRequest,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM attendance
            WHERE employee_id = ?
              AND status = ?
              AND source_leave_id = ?
              AND date >= ? AND date <= ?
            "#,
        )
        .bind(leave.employee_id)
        .bind(AttendanceStatus::OnLeave)
        .bind(leave.id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
