use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attendance::DayInput;
use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
    pub status: LeaveStatus,
    pub approved_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveType {
        Sick => "sick",
        Vacation => "vacation",
        Personal => "personal",
        FamilyLeave => "family_leave",
        Bereavement => "bereavement",
        Other => "other",
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLeaveRequest {
    pub start_date: DayInput,
    pub end_date: DayInput,
    pub leave_type: LeaveType,
    pub reason: String,
}

/// Admin decision body: Approved or Rejected, with optional notes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDecisionRequest {
    pub status: LeaveStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveListQuery {
    pub status: Option<LeaveStatus>,
}

impl LeaveRequest {
    pub fn new(
        employee_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        leave_type: LeaveType,
        reason: String,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            start_date,
            end_date,
            leave_type,
            reason,
            status: LeaveStatus::Pending,
            approved_by: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The human-readable note reconciliation writes on claimed ledger days.
    pub fn ledger_note(&self) -> String {
        format!("Approved {} leave", self.leave_type)
    }
}
