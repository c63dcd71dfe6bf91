//! Token issuance module
//!
//! Session tokens are a consumed capability of the verification flow: the
//! engine exchanges a verified account for a token pair through the
//! [`TokenIssuer`] trait and never inspects signing mechanics. A JWT-backed
//! implementation is provided for deployments without a dedicated token
//! service.

mod issuer;

pub use issuer::{JwtTokenIssuer, TokenIssuer};
