/// Primary key type for every table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp, stored in TIMESTAMPTZ columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
