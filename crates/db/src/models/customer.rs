//! Customer entity model and DTOs.

use emivid_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    /// E.164-style number, unique per customer.
    pub whatsapp_number: String,
    /// ISO 639-1 tag; scripts are translated when this is not `en`.
    pub preferred_language: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub whatsapp_number: String,
    /// Defaults to `en` when absent.
    pub preferred_language: Option<String>,
}
