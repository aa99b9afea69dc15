//! Loan entities.

pub mod model;

pub use model::{CreateLoan, Loan, LoanStats, LoanStatus};
