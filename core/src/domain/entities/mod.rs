//! Domain entities representing core business objects.

pub mod token;
pub mod user;
pub mod verification_request;

// Re-export commonly used types
pub use token::{Claims, TokenPair};
pub use user::User;
pub use verification_request::{RequestState, VerificationRequest};
