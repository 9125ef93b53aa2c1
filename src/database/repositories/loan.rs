use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Loan, LoanStatus};

const LOAN_COLUMNS: &str = r#"
    id, employee_id, loan_type, amount, purpose, repayment_period_months,
    status, approved_by, comments, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LoanRepository {
    pool: SqlitePool,
}

impl LoanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, employee_id, loan_type, amount, purpose,
                repayment_period_months, status, approved_by, comments,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(loan.id)
        .bind(loan.employee_id)
        .bind(&loan.loan_type)
        .bind(loan.amount)
        .bind(&loan.purpose)
        .bind(loan.repayment_period_months)
        .bind(&loan.status)
        .bind(loan.approved_by)
        .bind(&loan.comments)
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    pub async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE employee_id = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    pub async fn list(&self, status: Option<LoanStatus>) -> Result<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Moves a loan between workflow states, guarded by the expected
    /// current state. Returns false when the guard does not match, so
    /// callers can distinguish "not found or already decided".
    pub async fn transition(
        &self,
        id: Uuid,
        from: &LoanStatus,
        to: &LoanStatus,
        approved_by: Option<Uuid>,
        comments: Option<&str>,
    ) -> Result<bool> {
        let now = chrono::Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET status = ?,
                approved_by = COALESCE(?, approved_by),
                comments = COALESCE(?, comments),
                updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(to)
        .bind(approved_by)
        .bind(comments)
        .bind(now)
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
