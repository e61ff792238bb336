//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod customer_repo;
pub mod loan_repo;
pub mod reminder_repo;

pub use customer_repo::CustomerRepo;
pub use loan_repo::LoanRepo;
pub use reminder_repo::ReminderRepo;
