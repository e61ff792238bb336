/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: the pool is already `Clone`, the prefix is a
/// small string cloned once per request at most.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: emivid_db::DbPool,
    /// Public prefix media-relative video paths resolve under.
    pub media_url_prefix: String,
}
