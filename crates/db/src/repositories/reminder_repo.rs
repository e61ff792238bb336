//! Repository for the `reminders` table.
//!
//! Uses `ReminderStatus` from `models::status` for all status
//! transitions. Creation is claim-style: one `INSERT ... ON CONFLICT DO
//! NOTHING` both creates the row and decides which run owns the cycle,
//! so overlapping batch runs cannot double-send.

use emivid_core::types::DbId;
use sqlx::PgPool;

use crate::models::reminder::{CreateReminder, Reminder, ReminderListQuery};
use crate::models::status::ReminderStatus;

/// Column list for `reminders` queries.
const COLUMNS: &str = "\
    id, customer_id, loan_id, event_type, status_id, video_url, \
    cycle_date, created_at";

/// Maximum page size for reminder listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for reminder listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for reminders.
pub struct ReminderRepo;

impl ReminderRepo {
    /// Atomically create a reminder for a loan's due-date cycle.
    ///
    /// Returns `None` when a reminder already exists for
    /// `(loan_id, cycle_date)`, meaning another run claimed this cycle.
    /// The row is created directly in `Generating` status; there is no
    /// separate pending-to-generating transition to race on.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreateReminder,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!(
            "INSERT INTO reminders (customer_id, loan_id, event_type, status_id, cycle_date) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (loan_id, cycle_date) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reminder>(&query)
            .bind(input.customer_id)
            .bind(input.loan_id)
            .bind(&input.event_type)
            .bind(ReminderStatus::Generating.id())
            .bind(input.cycle_date)
            .fetch_optional(pool)
            .await
    }

    /// Mark a reminder sent and record where its video lives.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        video_url: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reminders SET status_id = $2, video_url = $3 WHERE id = $1")
            .bind(id)
            .bind(ReminderStatus::Sent.id())
            .bind(video_url)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a reminder failed. Any partially produced video URL is kept
    /// for debugging.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE reminders SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(ReminderStatus::Failed.id())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find a reminder by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reminders WHERE id = $1");
        sqlx::query_as::<_, Reminder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reminders with optional status/event filters and pagination.
    pub async fn list(
        pool: &PgPool,
        params: &ReminderListQuery,
    ) -> Result<Vec<Reminder>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.status_id.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }

        if params.event_type.is_some() {
            conditions.push(format!("event_type = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM reminders \
             {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Reminder>(&query);
        if let Some(sid) = params.status_id {
            q = q.bind(sid);
        }
        if let Some(event_type) = &params.event_type {
            q = q.bind(event_type);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}
