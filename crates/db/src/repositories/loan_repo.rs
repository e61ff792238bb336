//! Repository for the `loans` table.

use chrono::NaiveDate;
use emivid_core::types::DbId;
use sqlx::PgPool;

use crate::models::loan::{CreateLoan, DueLoan, Loan};

/// Column list for `loans` queries.
const COLUMNS: &str = "\
    id, customer_id, loan_number, emi_amount, due_date, \
    is_active, bounce_count, created_at, updated_at";

/// Provides CRUD operations for loans.
pub struct LoanRepo;

impl LoanRepo {
    /// Insert a loan, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateLoan) -> Result<Loan, sqlx::Error> {
        let query = format!(
            "INSERT INTO loans (customer_id, loan_number, emi_amount, due_date, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Loan>(&query)
            .bind(input.customer_id)
            .bind(&input.loan_number)
            .bind(input.emi_amount)
            .bind(input.due_date)
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// Find a loan by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM loans WHERE id = $1");
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a loan by loan number (unique).
    pub async fn find_by_number(
        pool: &PgPool,
        loan_number: &str,
    ) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM loans WHERE loan_number = $1");
        sqlx::query_as::<_, Loan>(&query)
            .bind(loan_number)
            .fetch_optional(pool)
            .await
    }

    /// Increment a loan's bounce counter after a failed debit.
    pub async fn record_bounce(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE loans SET bounce_count = bounce_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Active loans due on `cycle_date` with no reminder for that cycle yet.
    ///
    /// The anti-join mirrors the uniqueness guard on
    /// `reminders (loan_id, cycle_date)`: a loan disappears from this
    /// result set the moment any run claims its cycle.
    pub async fn find_due_without_reminder(
        pool: &PgPool,
        cycle_date: NaiveDate,
    ) -> Result<Vec<DueLoan>, sqlx::Error> {
        sqlx::query_as::<_, DueLoan>(
            "SELECT l.id, l.customer_id, l.loan_number, l.emi_amount, l.due_date, \
                    l.bounce_count, \
                    c.name AS customer_name, c.whatsapp_number, c.preferred_language \
             FROM loans l \
             JOIN customers c ON c.id = l.customer_id \
             WHERE l.due_date = $1 \
               AND l.is_active \
               AND NOT EXISTS ( \
                   SELECT 1 FROM reminders r \
                   WHERE r.loan_id = l.id AND r.cycle_date = $1 \
               ) \
             ORDER BY l.id",
        )
        .bind(cycle_date)
        .fetch_all(pool)
        .await
    }
}
