use uuid::Uuid;

use sqlx::SqlitePool;

use crate::database::models::{ApplyLeaveRequest, LeaveRequest, LeaveStatus};
use crate::database::repositories::{AttendanceRepository, LeaveRepository};
use crate::error::AppError;
use crate::services::workday;

/// Drives the leave lifecycle and keeps the attendance ledger consistent
/// with it. A decision and its ledger fallout commit together or not at
/// all: approval writes one on-leave row per covered day, rejection of a
/// previously approved leave removes exactly the rows that approval
/// claimed.
#[derive(Clone)]
pub struct LeaveReconciler {
    pool: SqlitePool,
    leave_repository: LeaveRepository,
    attendance_repository: AttendanceRepository,
}

impl LeaveReconciler {
    pub fn new(
        pool: SqlitePool,
        leave_repository: LeaveRepository,
        attendance_repository: AttendanceRepository,
    ) -> Self {
        Self {
            pool,
            leave_repository,
            attendance_repository,
        }
    }

    /// Files a new pending request. The date window is normalized and
    /// validated up front so an inverted range is rejected before anything
    /// persists.
    pub async fn apply(
        &self,
        employee_id: Uuid,
        request: ApplyLeaveRequest,
    ) -> Result<LeaveRequest, AppError> {
        let start_date = workday::normalize(&request.start_date)?;
        let end_date = workday::normalize(&request.end_date)?;
        workday::day_range(start_date, end_date)?;

        let leave = LeaveRequest::new(
            employee_id,
            start_date,
            end_date,
            request.leave_type,
            request.reason,
        );
        self.leave_repository.create(&leave).await?;

        Ok(leave)
    }

    /// Applies an admin decision and reconciles the ledger in one
    /// transaction.
    ///
    /// Allowed transitions: pending to either outcome, and approved to
    /// rejected (which rolls the claimed days back out of the ledger).
    /// Rejected is terminal, and repeating a decision already in place is
    /// reported as a conflict rather than silently re-run.
    pub async fn decide(
        &self,
        leave_id: Uuid,
        decision: LeaveStatus,
        approver_id: Uuid,
        notes: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        if decision == LeaveStatus::Pending {
            return Err(AppError::bad_request(
                "Decision must be approved or rejected",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let leave = self
            .leave_repository
            .find_by_id_in(&mut tx, leave_id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave request not found"))?;

        match (&leave.status, &decision) {
            (LeaveStatus::Pending, _) => {}
            (LeaveStatus::Approved, LeaveStatus::Rejected) => {}
            (current, _) => {
                return Err(AppError::AlreadyDecided(format!(
                    "Leave request is already {}",
                    current
                )));
            }
        }

        self.leave_repository
            .record_decision(&mut tx, leave_id, &decision, approver_id, notes.as_deref())
            .await?;

        let decided = self
            .leave_repository
            .find_by_id_in(&mut tx, leave_id)
            .await?
            .ok_or_else(|| {
                AppError::internal_server_error_message("Leave request vanished mid-decision")
            })?;

        let reconcile = if decision == LeaveStatus::Approved {
            self.claim_days(&mut tx, &decided).await
        } else {
            self.release_days(&mut tx, &decided).await
        };

        if let Err(err) = reconcile {
            log::error!(
                "Ledger reconciliation failed for leave {}, rolling decision back: {}",
                leave_id,
                err
            );
            return Err(err);
        }

        tx.commit().await?;

        Ok(decided)
    }

    async fn claim_days(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        leave: &LeaveRequest,
    ) -> Result<(), AppError> {
        let days = workday::day_range(leave.start_date, leave.end_date)?;
        for day in days {
            self.attendance_repository
                .upsert_leave_day(tx, leave, day)
                .await?;
        }
        Ok(())
    }

    async fn release_days(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        leave: &LeaveRequest,
    ) -> Result<(), AppError> {
        let released = self
            .attendance_repository
            .delete_leave_days(tx, leave)
            .await?;
        if released > 0 {
            log::info!(
                "Released {} ledger day(s) previously claimed by leave {}",
                released,
                leave.id
            );
        }
        Ok(())
    }
}
