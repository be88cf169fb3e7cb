//! Helpers for setting up throwaway SQLite databases in tests.
pub mod prepare_env;
