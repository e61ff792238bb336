//! Repository for the `customers` table.

use emivid_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer};

/// Column list for `customers` queries.
const COLUMNS: &str =
    "id, name, whatsapp_number, preferred_language, created_at, updated_at";

/// Default language when a create DTO does not name one.
const DEFAULT_LANGUAGE: &str = "en";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a customer, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCustomer,
    ) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (name, whatsapp_number, preferred_language) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.whatsapp_number)
            .bind(
                input
                    .preferred_language
                    .as_deref()
                    .unwrap_or(DEFAULT_LANGUAGE),
            )
            .fetch_one(pool)
            .await
    }

    /// Find a customer by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a customer by WhatsApp number (unique).
    pub async fn find_by_whatsapp(
        pool: &PgPool,
        whatsapp_number: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM customers WHERE whatsapp_number = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(whatsapp_number)
            .fetch_optional(pool)
            .await
    }

    /// List customers ordered by creation time.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
