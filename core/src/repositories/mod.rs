//! Repository interfaces for persistence operations.

pub mod request;
pub mod user;

pub use request::{AttemptOutcome, InMemoryRequestStore, RequestStore, ThrottleLedger};
pub use user::{InMemoryUserLookup, UserLookup};
