use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub loan_type: LoanType,
    pub amount: f64,
    pub purpose: String,
    pub repayment_period_months: i64,
    pub status: LoanStatus,
    pub approved_by: Option<Uuid>,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LoanType {
        Personal => "personal",
        Emergency => "emergency",
        Education => "education",
        Housing => "housing",
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LoanStatus {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
        Disbursed => "disbursed",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub loan_type: LoanType,
    pub amount: f64,
    pub purpose: String,
    pub repayment_period_months: i64,
    /// Applications normally go straight to review; a draft can be kept
    /// back and submitted later.
    #[serde(default)]
    pub save_as_draft: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDecisionRequest {
    pub status: LoanStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoanListQuery {
    pub status: Option<LoanStatus>,
}

#[derive(Debug, Deserialize)]
pub struct EmiQuery {
    pub amount: f64,
    pub period: i64,
}

/// Zero-interest repayment quote: amount split evenly over the period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuote {
    pub amount: f64,
    pub period_months: i64,
    pub monthly_installment: f64,
}

impl Loan {
    pub fn new(application: LoanApplication, employee_id: Uuid) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let status = if application.save_as_draft {
            LoanStatus::Draft
        } else {
            LoanStatus::Submitted
        };
        Self {
            id: Uuid::new_v4(),
            employee_id,
            loan_type: application.loan_type,
            amount: application.amount,
            purpose: application.purpose,
            repayment_period_months: application.repayment_period_months,
            status,
            approved_by: None,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}
