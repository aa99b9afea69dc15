//! Concrete repository implementations.

pub mod book;
pub mod loan;
pub mod revocation;
pub mod session;
pub mod user;

pub use book::BookRepository;
pub use loan::LoanRepository;
pub use revocation::RevocationRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
