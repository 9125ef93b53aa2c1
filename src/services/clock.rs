use chrono::{NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::config::Config;
use crate::database::is_unique_violation;
use crate::database::models::{AttendanceRecord, AttendanceStatus};
use crate::database::repositories::AttendanceRepository;
use crate::error::AppError;
use crate::services::workday;

/// Thresholds that drive status derivation. Sourced from [`Config`] so
/// deployments can move the cutoffs without touching code.
#[derive(Debug, Clone, Copy)]
pub struct AttendancePolicy {
    /// Clocking in strictly after this time marks the day late.
    pub late_after: NaiveTime,
    /// A completed day under this many hours is downgraded to half-day.
    pub half_day_under_hours: f64,
}

impl AttendancePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            late_after: config.late_after,
            half_day_under_hours: config.half_day_under_hours,
        }
    }
}

/// Owns the daily clock-in/clock-out cycle. Status is derived here, never
/// accepted from the client: lateness at clock-in, half-day at clock-out.
#[derive(Clone)]
pub struct ClockEngine {
    attendance_repository: AttendanceRepository,
    policy: AttendancePolicy,
}

impl ClockEngine {
    pub fn new(attendance_repository: AttendanceRepository, policy: AttendancePolicy) -> Self {
        Self {
            attendance_repository,
            policy,
        }
    }

    /// Opens today's session. A day that already holds a record is
    /// rejected up front: a completed day as [`AppError::AlreadyCompleted`],
    /// an open (or on-leave) one as [`AppError::AlreadyClockedIn`]. Under
    /// concurrency the per-day uniqueness constraint is the arbiter, and a
    /// violation surfaces as [`AppError::AlreadyClockedIn`] regardless of
    /// which caller lost the race.
    pub async fn clock_in(
        &self,
        employee_id: Uuid,
        now: NaiveDateTime,
        ip_address: Option<String>,
        location: Option<String>,
    ) -> Result<AttendanceRecord, AppError> {
        let date = workday::day_key(now);

        // Fast path for the sequential retry; the insert's constraint
        // still decides concurrent races.
        if let Some(existing) = self
            .attendance_repository
            .find_by_employee_and_date(employee_id, date)
            .await?
        {
            return Err(if existing.clock_out.is_some() {
                AppError::AlreadyCompleted
            } else {
                AppError::AlreadyClockedIn
            });
        }

        let status = if workday::derive_lateness(now, self.policy.late_after) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };

        let record =
            AttendanceRecord::new_clock_in(employee_id, date, now, status, ip_address, location);

        match self.attendance_repository.insert_clock_in(&record).await {
            Ok(()) => Ok(record),
            Err(err) if is_unique_violation(&err) => Err(AppError::AlreadyClockedIn),
            Err(err) => Err(err.into()),
        }
    }

    /// Closes today's open session and derives working hours and the
    /// final status. Days filled in by leave reconciliation carry no
    /// clock-in and are never treated as open sessions.
    pub async fn clock_out(
        &self,
        employee_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, AppError> {
        let date = workday::day_key(now);

        let open = self
            .attendance_repository
            .find_open_session(employee_id, date)
            .await?
            .ok_or(AppError::NoOpenSession)?;

        let clock_in = open.clock_in.ok_or_else(|| {
            AppError::internal_server_error_message("open session has no clock-in")
        })?;

        let working_hours = workday::derive_working_hours(clock_in, now)?;
        let status = if working_hours < self.policy.half_day_under_hours {
            AttendanceStatus::HalfDay
        } else {
            open.status
        };

        let completed = self
            .attendance_repository
            .complete_session(open.id, now, working_hours, status)
            .await?;

        Ok(completed)
    }
}
