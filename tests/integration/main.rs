//! Integration tests against a live PostgreSQL instance.
//!
//! These tests are ignored by default; run them with
//! `cargo test -- --ignored` once the database from config/test.toml
//! is available.

mod helpers;

mod book_test;
mod loan_test;
mod user_test;
