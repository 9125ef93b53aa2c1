use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// One row per employee per calendar day. Rows are created either by a
/// clock-in or by leave reconciliation claiming the day; the
/// (employee_id, date) pair is unique at the schema level.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub working_hours: Option<f64>,
    pub notes: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    /// Set when leave reconciliation created or claimed this row; scopes
    /// the rollback delete to exactly that leave's rows.
    pub source_leave_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
        HalfDay => "half_day",
        OnLeave => "on_leave",
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Present
    }
}

/// A day boundary as supplied by clients: either epoch milliseconds or a
/// string (ISO-8601 datetime or plain `YYYY-MM-DD`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DayInput {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyAttendanceQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub employee_id: Option<Uuid>,
    pub status: Option<AttendanceStatus>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl AttendanceRecord {
    /// Row created by a clock-in.
    pub fn new_clock_in(
        employee_id: Uuid,
        date: NaiveDate,
        clock_in: NaiveDateTime,
        status: AttendanceStatus,
        ip_address: Option<String>,
        location: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            date,
            clock_in: Some(clock_in),
            clock_out: None,
            status,
            working_hours: None,
            notes: None,
            ip_address,
            location,
            source_leave_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
