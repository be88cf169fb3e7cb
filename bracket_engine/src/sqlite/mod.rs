//! SQLite database module for the bracket engine.
//!
//! The schema lives in `src/sqlite/migrations` and is applied with `sqlx::migrate!`.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
