//! MySQL repository implementations
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE verification_requests (
//!     id CHAR(36) PRIMARY KEY,
//!     identifier VARCHAR(320) NOT NULL,
//!     channel VARCHAR(16) NOT NULL,
//!     code_hash VARCHAR(128) NOT NULL,
//!     created_at TIMESTAMP(3) NOT NULL,
//!     expires_at TIMESTAMP(3) NOT NULL,
//!     attempts_used INT UNSIGNED NOT NULL DEFAULT 0,
//!     max_attempts INT UNSIGNED NOT NULL,
//!     generation_sequence INT UNSIGNED NOT NULL,
//!     state VARCHAR(16) NOT NULL,
//!     INDEX idx_identifier_sequence (identifier, generation_sequence)
//! );
//!
//! CREATE TABLE users (
//!     id CHAR(36) PRIMARY KEY,
//!     email VARCHAR(320) NULL UNIQUE,
//!     phone_number VARCHAR(20) NULL UNIQUE,
//!     created_at TIMESTAMP(3) NOT NULL,
//!     is_verified BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! ```

pub mod request_store_impl;
pub mod user_lookup_impl;

pub use request_store_impl::MySqlRequestStore;
pub use user_lookup_impl::MySqlUserLookup;
