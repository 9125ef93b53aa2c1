use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoticePeriod {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub resignation_date: NaiveDate,
    pub notice_period_days: i64,
    /// resignation_date + notice_period_days, fixed at creation.
    pub last_working_day: NaiveDate,
    pub reason: Option<String>,
    pub status: NoticeStatus,
    pub early_release_requested: bool,
    pub early_release_reason: Option<String>,
    pub handover_completed: bool,
    pub exit_interview_scheduled: bool,
    pub clearance_it: bool,
    pub clearance_hr: bool,
    pub clearance_finance: bool,
    pub clearance_admin: bool,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum NoticeStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Completed => "completed",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticePeriodInput {
    pub resignation_date: NaiveDate,
    pub notice_period_days: Option<i64>,
    pub reason: Option<String>,
    #[serde(default)]
    pub early_release_requested: bool,
    pub early_release_reason: Option<String>,
}

/// Admin-side updates: workflow status plus offboarding checklist flags.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticePeriodUpdate {
    pub status: Option<NoticeStatus>,
    pub handover_completed: Option<bool>,
    pub exit_interview_scheduled: Option<bool>,
    pub clearance_it: Option<bool>,
    pub clearance_hr: Option<bool>,
    pub clearance_finance: Option<bool>,
    pub clearance_admin: Option<bool>,
    pub comments: Option<String>,
}

pub const DEFAULT_NOTICE_PERIOD_DAYS: i64 = 30;

/// Last working day is the resignation date plus the notice period.
pub fn last_working_day(resignation_date: NaiveDate, notice_period_days: i64) -> NaiveDate {
    resignation_date + chrono::Duration::days(notice_period_days)
}

impl NoticePeriod {
    pub fn new(input: NoticePeriodInput, employee_id: Uuid) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let days = input
            .notice_period_days
            .unwrap_or(DEFAULT_NOTICE_PERIOD_DAYS);
        Self {
            id: Uuid::new_v4(),
            employee_id,
            resignation_date: input.resignation_date,
            notice_period_days: days,
            last_working_day: last_working_day(input.resignation_date, days),
            reason: input.reason,
            status: NoticeStatus::Pending,
            early_release_requested: input.early_release_requested,
            early_release_reason: input.early_release_reason,
            handover_completed: false,
            exit_interview_scheduled: false,
            clearance_it: false,
            clearance_hr: false,
            clearance_finance: false,
            clearance_admin: false,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}
