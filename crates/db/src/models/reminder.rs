//! Reminder entity model and DTOs.

use chrono::NaiveDate;
use emivid_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reminder {
    pub id: DbId,
    pub customer_id: DbId,
    pub loan_id: DbId,
    /// One of the `core::script` event type constants.
    pub event_type: String,
    pub status_id: StatusId,
    /// Absolute provider URL or media-relative path of the rendered video.
    pub video_url: Option<String>,
    /// Due-date cycle this reminder covers; `(loan_id, cycle_date)` is unique.
    pub cycle_date: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for inserting a reminder.
#[derive(Debug, Deserialize)]
pub struct CreateReminder {
    pub customer_id: DbId,
    pub loan_id: DbId,
    pub event_type: String,
    pub cycle_date: NaiveDate,
}

/// Query parameters for reminder listing.
#[derive(Debug, Default, Deserialize)]
pub struct ReminderListQuery {
    /// Filter by status ID (e.g. 3 = sent, 4 = failed).
    pub status_id: Option<StatusId>,
    /// Filter by event type (e.g. `EMI_DUE`).
    pub event_type: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
