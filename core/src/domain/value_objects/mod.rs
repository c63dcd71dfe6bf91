//! Value objects representing immutable domain concepts.

pub mod code_hash;
pub mod identifier;

// Re-export commonly used types
pub use code_hash::CodeHash;
pub use identifier::{Channel, Identifier};
