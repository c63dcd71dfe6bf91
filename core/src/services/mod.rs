//! Business services containing domain logic and use cases.

pub mod token;
pub mod verification;

// Re-export commonly used types
pub use token::{JwtTokenIssuer, TokenIssuer};
pub use verification::{
    CodeGenerator, DispatchGateway, GenerateOutcome, ThrottleDecision, ThrottlePolicy,
    VerificationEngine, VerifiedOutcome,
};
