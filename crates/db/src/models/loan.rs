//! Loan entity model and DTOs.

use chrono::NaiveDate;
use emivid_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `loans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Loan {
    pub id: DbId,
    pub customer_id: DbId,
    pub loan_number: String,
    pub emi_amount: Decimal,
    pub due_date: NaiveDate,
    pub is_active: bool,
    pub bounce_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a loan.
#[derive(Debug, Deserialize)]
pub struct CreateLoan {
    pub customer_id: DbId,
    pub loan_number: String,
    pub emi_amount: Decimal,
    pub due_date: NaiveDate,
    /// Defaults to active when absent.
    pub is_active: Option<bool>,
}

/// A due loan joined with the customer fields the pipeline needs.
///
/// Produced by `LoanRepo::find_due_without_reminder`; one row per loan
/// that is due on the cycle date and has no reminder for that cycle yet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueLoan {
    pub id: DbId,
    pub customer_id: DbId,
    pub loan_number: String,
    pub emi_amount: Decimal,
    pub due_date: NaiveDate,
    pub bounce_count: i32,
    pub customer_name: String,
    pub whatsapp_number: String,
    pub preferred_language: String,
}
